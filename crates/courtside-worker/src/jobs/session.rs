//! Refresh-session cleanup.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;

use courtside_auth::session::SessionCleanup;

use crate::executor::{JobExecutionError, JobHandler};

/// Revokes expired sessions, then purges old revoked ones.
#[derive(Debug)]
pub struct SessionCleanupHandler {
    cleanup: Arc<SessionCleanup>,
}

impl SessionCleanupHandler {
    pub fn new(cleanup: Arc<SessionCleanup>) -> Self {
        Self { cleanup }
    }
}

#[async_trait]
impl JobHandler for SessionCleanupHandler {
    fn job_type(&self) -> &'static str {
        "session_cleanup"
    }

    async fn execute(&self, now: DateTime<Utc>) -> Result<Value, JobExecutionError> {
        let report = self.cleanup.run_cleanup(now).await?;
        Ok(serde_json::json!({
            "revoked": report.revoked,
            "purged": report.purged,
        }))
    }
}
