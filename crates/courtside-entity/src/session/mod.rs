//! Refresh-session domain entities.

pub mod model;
pub mod reason;

pub use model::{CreateSession, RefreshSession};
pub use reason::RevokeReason;
