//! Application configuration schemas.
//!
//! All configuration structs are deserialized via the `config` crate from
//! TOML files and `COURTSIDE__*` environment variables. Each sub-module
//! represents a logical configuration section.

pub mod app;
pub mod auth;
pub mod database;
pub mod logging;
pub mod payments;
pub mod scheduling;
pub mod worker;

use serde::{Deserialize, Serialize};

pub use self::app::{CorsConfig, ServerConfig};
pub use self::auth::{AuthConfig, RefreshCookieConfig};
pub use self::database::{DatabaseConfig, StoreBackend};
pub use self::logging::LoggingConfig;
pub use self::payments::PaymentsConfig;
pub use self::scheduling::SchedulingConfig;
pub use self::worker::WorkerConfig;

use crate::error::AppError;

/// Root application configuration.
///
/// Every section has defaults, so an empty configuration is valid.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database connection settings.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Authentication settings.
    #[serde(default)]
    pub auth: AuthConfig,
    /// Opening hours and allocation bounds.
    #[serde(default)]
    pub scheduling: SchedulingConfig,
    /// Payment settings.
    #[serde(default)]
    pub payments: PaymentsConfig,
    /// Background worker settings.
    #[serde(default)]
    pub worker: WorkerConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from TOML files.
    ///
    /// Merges `config/default.toml`, an environment-specific overlay, and
    /// environment variables prefixed with `COURTSIDE__`.
    pub fn load(env: &str) -> Result<Self, AppError> {
        Self::load_from("config", env)
    }

    /// Load configuration from a specific directory.
    pub fn load_from(dir: &str, env: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name(&format!("{dir}/default")).required(false))
            .add_source(config::File::with_name(&format!("{dir}/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("COURTSIDE")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        let config: Self = config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings that would make the scheduling rules unsatisfiable.
    pub fn validate(&self) -> Result<(), AppError> {
        let s = &self.scheduling;
        if s.opening_hour >= s.closing_hour || s.closing_hour > 24 {
            return Err(AppError::configuration(format!(
                "Invalid business hours {}:00-{}:00",
                s.opening_hour, s.closing_hour
            )));
        }
        if s.booking_min_minutes <= 0 || s.booking_min_minutes > s.booking_max_minutes {
            return Err(AppError::configuration("Invalid booking duration bounds"));
        }
        if s.class_min_minutes <= 0 || s.class_min_minutes > s.class_max_minutes {
            return Err(AppError::configuration("Invalid class duration bounds"));
        }
        if s.class_min_capacity < 1 || s.class_min_capacity > s.class_max_capacity {
            return Err(AppError::configuration("Invalid class capacity bounds"));
        }
        if self.auth.jwt_secret.len() < 16 {
            return Err(AppError::configuration(
                "auth.jwt_secret must be at least 16 characters",
            ));
        }
        Ok(())
    }
}
