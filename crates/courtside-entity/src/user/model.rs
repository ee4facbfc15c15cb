//! User entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::role::UserRole;

/// A registered user.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    /// Unique user identifier.
    pub id: Uuid,
    /// Public, URL-safe identifier.
    pub slug: String,
    /// Unique email address used for login.
    pub email: String,
    /// Argon2 password hash.
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Full name.
    pub full_name: String,
    /// Contact phone.
    pub phone: Option<String>,
    /// Role (RBAC).
    pub role: UserRole,
    /// Inactive users cannot log in.
    pub is_active: bool,
    /// Bumped on global logout; tokens carrying an older value are dead.
    pub session_version: i32,
    /// Last successful login time.
    pub last_login_at: Option<DateTime<Utc>>,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
    /// When the user was last updated.
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Check if this user has admin privileges.
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// The narrow view handed to other components.
    pub fn to_ref(&self) -> UserRef {
        UserRef {
            id: self.id,
            role: self.role,
        }
    }
}

/// Identity and role of a user, without profile data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRef {
    /// User ID.
    pub id: Uuid,
    /// User role.
    pub role: UserRole,
}

/// Data required to create a new user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUser {
    /// Public slug.
    pub slug: String,
    /// Email address, already normalized.
    pub email: String,
    /// Pre-hashed password.
    pub password_hash: String,
    /// Full name.
    pub full_name: String,
    /// Contact phone.
    pub phone: Option<String>,
    /// Assigned role.
    pub role: UserRole,
}
