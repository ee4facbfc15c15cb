//! Expired session cleanup.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use tracing::info;

use courtside_core::result::AppResult;
use courtside_database::store::SessionStore;

/// Counts from one cleanup cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CleanupReport {
    /// Active sessions past expiry that were revoked.
    pub revoked: u64,
    /// Dead sessions older than the retention window that were deleted.
    pub purged: u64,
}

/// Revokes expired sessions and purges dead ones past the retention window.
#[derive(Debug, Clone)]
pub struct SessionCleanup {
    sessions: Arc<dyn SessionStore>,
    retention: Duration,
}

impl SessionCleanup {
    /// Creates a new cleanup handler keeping dead sessions for
    /// `retention_days`.
    pub fn new(sessions: Arc<dyn SessionStore>, retention_days: i64) -> Self {
        Self {
            sessions,
            retention: Duration::days(retention_days),
        }
    }

    /// Runs one cleanup cycle as of `now`.
    pub async fn run_cleanup(&self, now: DateTime<Utc>) -> AppResult<CleanupReport> {
        let revoked = self.sessions.revoke_expired(now).await?;
        let purged = self.sessions.purge(now - self.retention).await?;

        if revoked > 0 || purged > 0 {
            info!(revoked, purged, "Session cleanup completed");
        }
        Ok(CleanupReport { revoked, purged })
    }
}
