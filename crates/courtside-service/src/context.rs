//! Request context carrying the authenticated caller.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use courtside_entity::user::UserRole;

/// Context for the current authenticated request.
///
/// Built by the HTTP extractor after the access token has been validated
/// against the live user, and passed into service methods so that every
/// operation knows *who* is acting and *when*.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    /// The authenticated user's ID.
    pub user_id: Uuid,
    /// The user's email.
    pub email: String,
    /// The user's current role.
    pub role: UserRole,
    /// Device the access token was issued to.
    pub device_id: String,
    /// IP address of the request origin, when known.
    pub ip_address: Option<String>,
    /// When the request was received; "now" for past-start checks.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    /// Creates a new request context stamped with the current time.
    pub fn new(user_id: Uuid, email: String, role: UserRole, device_id: String) -> Self {
        Self {
            user_id,
            email,
            role,
            device_id,
            ip_address: None,
            request_time: Utc::now(),
        }
    }

    /// Attach the origin IP address.
    pub fn with_ip(mut self, ip: Option<String>) -> Self {
        self.ip_address = ip;
        self
    }

    /// Returns whether the current user is an admin.
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}
