//! User role enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Roles available in the RBAC system.
///
/// What each role may do is resolved through the capability mapping in the
/// auth crate, never by comparing role identifiers in service code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Facility administrator.
    Admin,
    /// Business manager.
    Manager,
    /// Class instructor.
    Monitor,
    /// Club staff.
    Club,
    /// Regular customer; the default on registration.
    Client,
}

impl UserRole {
    /// Every role, ordered from most to least privileged.
    pub const ALL: [UserRole; 5] = [
        Self::Admin,
        Self::Manager,
        Self::Monitor,
        Self::Club,
        Self::Client,
    ];

    /// Stable numeric identifier exposed to API clients.
    pub fn id(&self) -> i16 {
        match self {
            Self::Admin => 1,
            Self::Manager => 2,
            Self::Monitor => 3,
            Self::Club => 4,
            Self::Client => 5,
        }
    }

    /// Check if this role is an admin.
    pub fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }

    /// Staff roles (everything except clients).
    pub fn is_staff(&self) -> bool {
        !matches!(self, Self::Client)
    }

    /// Return the role as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Manager => "manager",
            Self::Monitor => "monitor",
            Self::Club => "club",
            Self::Client => "client",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = courtside_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "manager" => Ok(Self::Manager),
            "monitor" => Ok(Self::Monitor),
            "club" => Ok(Self::Club),
            "client" => Ok(Self::Client),
            _ => Err(courtside_core::AppError::validation(format!(
                "Invalid user role: '{s}'. Expected one of: admin, manager, monitor, club, client"
            ))),
        }
    }
}
