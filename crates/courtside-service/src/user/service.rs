//! User registration and administration.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use courtside_auth::password::{PasswordHasher, PasswordValidator};
use courtside_auth::rbac::{Capability, RbacEnforcer};
use courtside_auth::session::SessionManager;
use courtside_core::error::AppError;
use courtside_core::result::AppResult;
use courtside_core::types::{PageRequest, PageResponse};
use courtside_database::store::UserStore;
use courtside_entity::slug::slugify;
use courtside_entity::user::{CreateUser, User, UserRole};

use crate::context::RequestContext;

/// Self-registration payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub full_name: String,
    pub phone: Option<String>,
}

/// Fields a user may change on their own account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateProfileRequest {
    pub full_name: String,
    pub phone: Option<String>,
}

/// Password change for the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

/// A role and what it may do.
#[derive(Debug, Clone, Serialize)]
pub struct RoleInfo {
    pub id: i16,
    pub name: UserRole,
    pub capabilities: Vec<Capability>,
}

/// Handles registration, profile lookup, and admin user management.
#[derive(Debug, Clone)]
pub struct UserService {
    users: Arc<dyn UserStore>,
    sessions: Arc<SessionManager>,
    hasher: Arc<PasswordHasher>,
    validator: Arc<PasswordValidator>,
    rbac: Arc<RbacEnforcer>,
}

impl UserService {
    /// Creates a new user service.
    pub fn new(
        users: Arc<dyn UserStore>,
        sessions: Arc<SessionManager>,
        hasher: Arc<PasswordHasher>,
        validator: Arc<PasswordValidator>,
        rbac: Arc<RbacEnforcer>,
    ) -> Self {
        Self {
            users,
            sessions,
            hasher,
            validator,
            rbac,
        }
    }

    /// Register a new client account.
    pub async fn register(&self, req: RegisterRequest) -> AppResult<User> {
        let user = self.create_with_role(req, UserRole::Client).await?;
        info!(user_id = %user.id, "User registered");
        Ok(user)
    }

    /// Create an admin account (used by the CLI bootstrap).
    pub async fn create_admin(&self, req: RegisterRequest) -> AppResult<User> {
        let user = self.create_with_role(req, UserRole::Admin).await?;
        info!(user_id = %user.id, "Admin account created");
        Ok(user)
    }

    async fn create_with_role(&self, req: RegisterRequest, role: UserRole) -> AppResult<User> {
        let email = self.validator.normalize_email(&req.email)?;
        self.validator.validate(&req.password)?;
        let full_name = req.full_name.trim();
        if full_name.is_empty() {
            return Err(AppError::validation("Full name is required"));
        }

        let password_hash = self.hasher.hash_password(&req.password)?;
        self.users
            .create(&CreateUser {
                slug: slugify(full_name),
                email,
                password_hash,
                full_name: full_name.to_string(),
                phone: req.phone.filter(|p| !p.trim().is_empty()),
                role,
            })
            .await
    }

    /// The caller's own account.
    pub async fn me(&self, ctx: &RequestContext) -> AppResult<User> {
        self.get(ctx.user_id).await
    }

    /// Update the caller's name and phone.
    pub async fn update_profile(
        &self,
        ctx: &RequestContext,
        req: UpdateProfileRequest,
    ) -> AppResult<User> {
        let full_name = req.full_name.trim();
        if full_name.is_empty() {
            return Err(AppError::validation("Full name is required"));
        }
        let phone = req.phone.as_deref().map(str::trim).filter(|p| !p.is_empty());

        let user = self
            .users
            .update_profile(ctx.user_id, full_name, phone)
            .await?;
        info!(user_id = %ctx.user_id, "Profile updated");
        Ok(user)
    }

    /// Change the caller's password and end every session, this one
    /// included. Returns the number of refresh sessions revoked.
    pub async fn change_password(
        &self,
        ctx: &RequestContext,
        req: ChangePasswordRequest,
    ) -> AppResult<u64> {
        let user = self.get(ctx.user_id).await?;
        if !self
            .hasher
            .verify_password(&req.current_password, &user.password_hash)?
        {
            warn!(user_id = %user.id, "Password change rejected: wrong current password");
            return Err(AppError::validation("Current password is incorrect"));
        }
        self.validator.validate(&req.new_password)?;
        if req.new_password == req.current_password {
            return Err(AppError::validation(
                "New password must differ from the current one",
            ));
        }

        let password_hash = self.hasher.hash_password(&req.new_password)?;
        self.users.update_password(user.id, &password_hash).await?;
        let revoked = self.sessions.logout_all_devices(user.id).await?;
        info!(user_id = %user.id, revoked, "Password changed");
        Ok(revoked)
    }

    /// Find a user by ID.
    pub async fn get(&self, id: Uuid) -> AppResult<User> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("User {id} not found")))
    }

    /// Page through every user.
    pub async fn list(
        &self,
        ctx: &RequestContext,
        page: &PageRequest,
    ) -> AppResult<PageResponse<User>> {
        self.rbac.require(ctx.role, Capability::ManageUsers)?;
        self.users.list(page).await
    }

    /// Change another user's role. Outstanding tokens carry the old role,
    /// so the target is logged out everywhere.
    pub async fn change_role(
        &self,
        ctx: &RequestContext,
        id: Uuid,
        role: UserRole,
    ) -> AppResult<User> {
        self.rbac.require(ctx.role, Capability::ManageUsers)?;
        if id == ctx.user_id {
            return Err(AppError::validation("You cannot change your own role"));
        }
        let current = self.get(id).await?;
        if current.role == role {
            return Ok(current);
        }

        self.users.update_role(id, role).await?;
        self.sessions.logout_all_devices(id).await?;
        info!(
            actor = %ctx.user_id,
            user_id = %id,
            from = %current.role,
            to = %role,
            "User role changed"
        );
        self.get(id).await
    }

    /// Activate or deactivate a user; deactivation logs them out everywhere.
    pub async fn set_active(
        &self,
        ctx: &RequestContext,
        id: Uuid,
        active: bool,
    ) -> AppResult<User> {
        self.rbac.require(ctx.role, Capability::ManageUsers)?;
        if id == ctx.user_id && !active {
            return Err(AppError::validation("You cannot deactivate your own account"));
        }

        let user = self.users.set_active(id, active).await?;
        if !active {
            self.sessions.logout_all_devices(id).await?;
        }
        info!(actor = %ctx.user_id, user_id = %id, active, "User activation changed");
        Ok(user)
    }

    /// Every role with its capabilities.
    pub fn roles(&self) -> Vec<RoleInfo> {
        UserRole::ALL
            .into_iter()
            .map(|role| RoleInfo {
                id: role.id(),
                name: role,
                capabilities: self.rbac.policies().capabilities_for_role(role),
            })
            .collect()
    }
}
