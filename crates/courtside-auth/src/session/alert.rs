//! Security alerts raised on refresh-token reuse.

use std::fmt::Debug;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// A detected replay of a rotated refresh token.
#[derive(Debug, Clone, Serialize)]
pub struct SecurityAlert {
    pub user_id: Uuid,
    pub family_id: Uuid,
    pub device_id: String,
    pub ip_address: Option<String>,
    pub detected_at: DateTime<Utc>,
}

/// Destination for security alerts, kept apart from ordinary auth failures.
pub trait SecurityAlertSink: Send + Sync + Debug {
    fn token_reuse(&self, alert: &SecurityAlert);
}

/// Emits alerts on the `courtside::security` tracing target.
#[derive(Debug, Clone, Default)]
pub struct LogAlertSink;

impl SecurityAlertSink for LogAlertSink {
    fn token_reuse(&self, alert: &SecurityAlert) {
        tracing::error!(
            target: "courtside::security",
            user_id = %alert.user_id,
            family_id = %alert.family_id,
            device_id = %alert.device_id,
            ip = alert.ip_address.as_deref().unwrap_or("-"),
            "Refresh token reuse detected; session family revoked"
        );
    }
}
