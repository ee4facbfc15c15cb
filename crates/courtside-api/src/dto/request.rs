//! Request DTOs.
//!
//! Domain payloads that need no HTTP-specific shaping (bookings, classes,
//! clubs, pistas) are deserialized straight into the service request types.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use validator::Validate;

use courtside_entity::user::UserRole;
use courtside_service::user::{ChangePasswordRequest, RegisterRequest, UpdateProfileRequest};

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterBody {
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
    #[validate(length(min = 1, max = 128, message = "is required"))]
    pub password: String,
    #[validate(length(min = 1, max = 200, message = "is required"))]
    pub full_name: String,
    #[validate(length(max = 32, message = "is too long"))]
    pub phone: Option<String>,
}

impl From<RegisterBody> for RegisterRequest {
    fn from(body: RegisterBody) -> Self {
        Self {
            email: body.email,
            password: body.password,
            full_name: body.full_name,
            phone: body.phone,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginBody {
    #[validate(length(min = 1, message = "is required"))]
    pub email: String,
    #[validate(length(min = 1, message = "is required"))]
    pub password: String,
    /// Overrides the `X-Device-Id` header when present.
    #[validate(length(min = 1, max = 128, message = "must be 1-128 characters"))]
    pub device_id: Option<String>,
}

/// Body of `PUT /profile/me`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateProfileBody {
    #[validate(length(min = 1, max = 200, message = "is required"))]
    pub full_name: String,
    #[validate(length(max = 32, message = "is too long"))]
    pub phone: Option<String>,
}

impl From<UpdateProfileBody> for UpdateProfileRequest {
    fn from(body: UpdateProfileBody) -> Self {
        Self {
            full_name: body.full_name,
            phone: body.phone,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ChangePasswordBody {
    #[validate(length(min = 1, message = "is required"))]
    pub current_password: String,
    #[validate(length(min = 1, max = 128, message = "is required"))]
    pub new_password: String,
}

impl From<ChangePasswordBody> for ChangePasswordRequest {
    fn from(body: ChangePasswordBody) -> Self {
        Self {
            current_password: body.current_password,
            new_password: body.new_password,
        }
    }
}

/// Body of `PUT /users/{id}/role`.
#[derive(Debug, Clone, Deserialize)]
pub struct ChangeRoleBody {
    pub role: UserRole,
}

/// Body of `PUT /users/{id}/active`.
#[derive(Debug, Clone, Deserialize)]
pub struct SetActiveBody {
    pub is_active: bool,
}

/// `?user_slug=` for staff acting on someone else's behalf.
///
/// Absent means the caller.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TargetUserQuery {
    pub user_slug: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NextBillingBody {
    pub next_billing_date: DateTime<Utc>,
}

/// `?active_only=` on the pista listing; staff may ask for everything.
#[derive(Debug, Clone, Deserialize)]
pub struct PistaListQuery {
    #[serde(default = "default_true")]
    pub active_only: bool,
}

fn default_true() -> bool {
    true
}
