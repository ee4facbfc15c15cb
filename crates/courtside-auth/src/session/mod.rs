//! Refresh-session lifecycle: login, rotation, reuse detection, logout.

pub mod alert;
pub mod cleanup;
pub mod error;
pub mod manager;

mod hash;

pub use alert::{LogAlertSink, SecurityAlert, SecurityAlertSink};
pub use cleanup::{CleanupReport, SessionCleanup};
pub use error::SessionError;
pub use hash::hash_token;
pub use manager::{ClientMeta, LoginOutcome, RefreshOutcome, SessionManager};
