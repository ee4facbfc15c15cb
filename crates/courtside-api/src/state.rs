//! Application state shared across all handlers and middleware.

use std::ops::Deref;
use std::sync::Arc;

use courtside_core::config::AppConfig;
use courtside_service::ServiceRegistry;

/// Passed to every Axum handler via `State<AppState>`.
///
/// Cloning is cheap: the registry holds only `Arc`s.
#[derive(Debug, Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: ServiceRegistry,
}

impl AppState {
    pub fn new(services: ServiceRegistry) -> Self {
        Self {
            config: Arc::clone(&services.config),
            services,
        }
    }
}

impl Deref for AppState {
    type Target = ServiceRegistry;

    fn deref(&self) -> &Self::Target {
        &self.services
    }
}
