//! Background worker configuration.

use serde::{Deserialize, Serialize};

/// Background sweep and cleanup configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerConfig {
    /// Whether the scheduler is started with the server.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Cron expression (with seconds) for the allocation status sweep.
    #[serde(default = "default_sweep_cron")]
    pub sweep_cron: String,
    /// Cron expression (with seconds) for the session cleanup job.
    #[serde(default = "default_session_cleanup_cron")]
    pub session_cleanup_cron: String,
    /// Cancel pending bookings whose start time passed without confirmation.
    #[serde(default = "default_true")]
    pub auto_cancel_unpaid: bool,
    /// Days to keep revoked or expired sessions before purging them.
    #[serde(default = "default_session_retention")]
    pub session_retention_days: i64,
    /// Run one sweep immediately when the scheduler starts.
    #[serde(default = "default_true")]
    pub sweep_on_start: bool,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            sweep_cron: default_sweep_cron(),
            session_cleanup_cron: default_session_cleanup_cron(),
            auto_cancel_unpaid: true,
            session_retention_days: default_session_retention(),
            sweep_on_start: true,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_sweep_cron() -> String {
    "0 */10 * * * *".to_string()
}

fn default_session_cleanup_cron() -> String {
    "0 30 * * * *".to_string()
}

fn default_session_retention() -> i64 {
    7
}
