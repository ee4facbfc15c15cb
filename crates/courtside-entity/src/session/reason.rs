//! Why a refresh session was revoked.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Terminal reasons for a revoked refresh session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "revoke_reason", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum RevokeReason {
    /// The user logged out from this device.
    Logout,
    /// A rotated-away refresh token was presented again.
    ReuseDetection,
    /// The user (or an admin) logged out every device.
    GlobalLogout,
    /// The session outlived its expiry and was swept.
    ExpiredCleanup,
}

impl RevokeReason {
    /// Return the reason as a snake_case string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Logout => "logout",
            Self::ReuseDetection => "reuse_detection",
            Self::GlobalLogout => "global_logout",
            Self::ExpiredCleanup => "expired_cleanup",
        }
    }
}

impl fmt::Display for RevokeReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
