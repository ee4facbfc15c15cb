//! Shared fixtures for service tests.

use std::sync::Arc;

use chrono::{DateTime, Days, Utc};
use uuid::Uuid;

use courtside_auth::rbac::RbacEnforcer;
use courtside_core::config::SchedulingConfig;
use courtside_database::StoreSet;
use courtside_entity::pista::{CreatePista, Pista};
use courtside_entity::user::{CreateUser, UserRole};

use crate::availability::{AvailabilityEngine, SchedulingRules};
use crate::context::RequestContext;

pub(crate) struct Fixture {
    pub stores: StoreSet,
    pub rbac: Arc<RbacEnforcer>,
    pub rules: Arc<SchedulingRules>,
    pub engine: Arc<AvailabilityEngine>,
}

impl Fixture {
    pub fn new() -> Self {
        let stores = StoreSet::in_memory();
        let engine = Arc::new(AvailabilityEngine::new(
            stores.pistas.clone(),
            stores.allocations.clone(),
        ));
        Self {
            stores,
            rbac: Arc::new(RbacEnforcer::new()),
            rules: Arc::new(SchedulingRules::new(SchedulingConfig::default())),
            engine,
        }
    }

    /// Insert a user with `role` and return a context acting as them.
    pub async fn actor(&self, role: UserRole) -> RequestContext {
        let id = Uuid::new_v4().simple().to_string();
        let user = self
            .stores
            .users
            .create(&CreateUser {
                slug: format!("{role}-{id}"),
                email: format!("{id}@courtside.test"),
                password_hash: "unused".into(),
                full_name: format!("{role} {id}"),
                phone: None,
                role,
            })
            .await
            .unwrap();
        RequestContext::new(user.id, user.email, user.role, "test-device".into())
    }

    pub async fn pista(&self, base_price_cents: i64) -> Pista {
        self.stores
            .pistas
            .create(&CreatePista {
                slug: format!("pista-{}", Uuid::new_v4().simple()),
                name: "Central".into(),
                court_type: "padel".into(),
                surface: Some("glass".into()),
                location_info: None,
                base_price_cents,
            })
            .await
            .unwrap()
    }
}

/// Tomorrow at `h:m` UTC, always in the future and inside default hours.
pub(crate) fn tomorrow_at(h: u32, m: u32) -> DateTime<Utc> {
    (Utc::now().date_naive() + Days::new(1))
        .and_hms_opt(h, m, 0)
        .unwrap()
        .and_utc()
}
