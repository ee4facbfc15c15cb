//! Slug-to-identity lookup for services that only need `(id, role)`.

use std::fmt::Debug;
use std::sync::Arc;

use async_trait::async_trait;

use courtside_core::result::AppResult;
use courtside_database::store::UserStore;
use courtside_entity::user::UserRef;

/// Resolve a public user slug to an identity. Inactive users resolve to
/// `None`.
#[async_trait]
pub trait UserLookup: Send + Sync + Debug {
    async fn find_by_slug(&self, slug: &str) -> AppResult<Option<UserRef>>;
}

/// [`UserLookup`] over the user store.
#[derive(Debug, Clone)]
pub struct StoreUserLookup {
    users: Arc<dyn UserStore>,
}

impl StoreUserLookup {
    pub fn new(users: Arc<dyn UserStore>) -> Self {
        Self { users }
    }
}

#[async_trait]
impl UserLookup for StoreUserLookup {
    async fn find_by_slug(&self, slug: &str) -> AppResult<Option<UserRef>> {
        Ok(self
            .users
            .find_by_slug(slug)
            .await?
            .filter(|u| u.is_active)
            .map(|u| u.to_ref()))
    }
}
