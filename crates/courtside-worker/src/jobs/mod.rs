//! Built-in job handlers.

pub mod session;
pub mod sweep;

pub use session::SessionCleanupHandler;
pub use sweep::SweepJobHandler;
