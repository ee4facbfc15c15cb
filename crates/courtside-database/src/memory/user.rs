use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use courtside_core::error::{AppError, codes};
use courtside_core::result::AppResult;
use courtside_core::types::{PageRequest, PageResponse};
use courtside_entity::user::{CreateUser, User, UserRole};

use super::{MemoryStore, newest_first};
use crate::store::UserStore;

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        Ok(self.state.lock().await.users.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let state = self.state.lock().await;
        Ok(state
            .users
            .values()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn find_by_slug(&self, slug: &str) -> AppResult<Option<User>> {
        let state = self.state.lock().await;
        Ok(state.users.values().find(|u| u.slug == slug).cloned())
    }

    async fn create(&self, data: &CreateUser) -> AppResult<User> {
        let mut state = self.state.lock().await;
        if state
            .users
            .values()
            .any(|u| u.email.eq_ignore_ascii_case(&data.email))
        {
            return Err(
                AppError::conflict(format!("Email '{}' is already registered", data.email))
                    .with_code(codes::EMAIL_TAKEN),
            );
        }
        if state.users.values().any(|u| u.slug == data.slug) {
            return Err(AppError::conflict("User slug already exists").with_code(codes::SLUG_TAKEN));
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::now_v7(),
            slug: data.slug.clone(),
            email: data.email.clone(),
            password_hash: data.password_hash.clone(),
            full_name: data.full_name.clone(),
            phone: data.phone.clone(),
            role: data.role,
            is_active: true,
            session_version: 1,
            last_login_at: None,
            created_at: now,
            updated_at: now,
        };
        state.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn list(&self, page: &PageRequest) -> AppResult<PageResponse<User>> {
        let state = self.state.lock().await;
        let users = newest_first(state.users.values().cloned().collect(), |u| u.created_at);
        Ok(PageResponse::from_slice(users, page))
    }

    async fn update_role(&self, id: Uuid, role: UserRole) -> AppResult<User> {
        let mut state = self.state.lock().await;
        let user = state
            .users
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found(format!("User {id} not found")))?;
        user.role = role;
        user.updated_at = Utc::now();
        Ok(user.clone())
    }

    async fn set_active(&self, id: Uuid, active: bool) -> AppResult<User> {
        let mut state = self.state.lock().await;
        let user = state
            .users
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found(format!("User {id} not found")))?;
        user.is_active = active;
        user.updated_at = Utc::now();
        Ok(user.clone())
    }

    async fn update_profile(
        &self,
        id: Uuid,
        full_name: &str,
        phone: Option<&str>,
    ) -> AppResult<User> {
        let mut state = self.state.lock().await;
        let user = state
            .users
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found(format!("User {id} not found")))?;
        user.full_name = full_name.to_string();
        user.phone = phone.map(str::to_string);
        user.updated_at = Utc::now();
        Ok(user.clone())
    }

    async fn update_password(&self, id: Uuid, password_hash: &str) -> AppResult<()> {
        let mut state = self.state.lock().await;
        let user = state
            .users
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found(format!("User {id} not found")))?;
        user.password_hash = password_hash.to_string();
        user.updated_at = Utc::now();
        Ok(())
    }

    async fn touch_last_login(&self, id: Uuid, at: DateTime<Utc>) -> AppResult<()> {
        if let Some(user) = self.state.lock().await.users.get_mut(&id) {
            user.last_login_at = Some(at);
        }
        Ok(())
    }

    async fn bump_session_version(&self, id: Uuid) -> AppResult<i32> {
        let mut state = self.state.lock().await;
        let user = state
            .users
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found(format!("User {id} not found")))?;
        user.session_version += 1;
        user.updated_at = Utc::now();
        Ok(user.session_version)
    }
}
