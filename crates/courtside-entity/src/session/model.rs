//! Refresh-session entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::reason::RevokeReason;

/// One device's chain of refresh-token rotations.
///
/// Only the hash of the currently valid refresh token is stored. Rotation
/// overwrites it in place, so a token that was rotated away can never match
/// again.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RefreshSession {
    /// Row identifier.
    pub id: Uuid,
    /// Owning user.
    pub user_id: Uuid,
    /// Rotation chain identifier carried inside every refresh token.
    pub family_id: Uuid,
    /// Client device identifier; scopes single-device logout.
    pub device_id: String,
    /// SHA-256 hex digest of the current refresh token.
    #[serde(skip_serializing)]
    pub current_token_hash: String,
    /// The user's session version when this chain last rotated.
    pub session_version: i32,
    /// Absolute expiry of the current refresh token.
    pub expires_at: DateTime<Utc>,
    /// Terminal flag.
    pub revoked: bool,
    /// Why the session was revoked.
    pub revoked_reason: Option<RevokeReason>,
    /// When the session was revoked.
    pub revoked_at: Option<DateTime<Utc>>,
    /// Client IP at login.
    pub ip_address: Option<String>,
    /// Client User-Agent at login.
    pub user_agent: Option<String>,
    /// Login time.
    pub created_at: DateTime<Utc>,
    /// Last rotation time.
    pub last_used_at: DateTime<Utc>,
}

impl RefreshSession {
    /// Not revoked and not expired at `now`.
    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        !self.revoked && self.expires_at > now
    }
}

/// Data required to open a new refresh session.
#[derive(Debug, Clone)]
pub struct CreateSession {
    /// Owning user.
    pub user_id: Uuid,
    /// Fresh rotation chain.
    pub family_id: Uuid,
    /// Device identifier.
    pub device_id: String,
    /// Hash of the first refresh token.
    pub token_hash: String,
    /// User's session version at login.
    pub session_version: i32,
    /// Refresh token expiry.
    pub expires_at: DateTime<Utc>,
    /// Client IP.
    pub ip_address: Option<String>,
    /// Client User-Agent.
    pub user_agent: Option<String>,
}
