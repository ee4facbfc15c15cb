//! CLI command definitions and dispatch.

pub mod migrate;
pub mod session;
pub mod sweep;
pub mod user;

use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::warn;

use courtside_auth::session::LogAlertSink;
use courtside_core::config::{AppConfig, StoreBackend};
use courtside_core::error::AppError;
use courtside_database::{DatabasePool, StoreSet};
use courtside_service::{MockGateway, ServiceRegistry};

use crate::output::OutputFormat;

/// Courtside: sports facility administration
#[derive(Debug, Parser)]
#[command(name = "courtside", version, about, long_about = None)]
pub struct Cli {
    /// Directory holding default.toml and the environment overlays
    #[arg(long, default_value = "config")]
    pub config_dir: String,

    /// Environment overlay to load (config/<env>.toml)
    #[arg(short, long, default_value = "development")]
    pub env: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Apply pending database migrations
    Migrate,
    /// Run one lifecycle sweep over bookings and classes
    Sweep,
    /// Refresh-session maintenance
    Session(session::SessionArgs),
    /// User management
    User(user::UserArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self) -> Result<(), AppError> {
        let config = AppConfig::load_from(&self.config_dir, &self.env)?;
        match &self.command {
            Commands::Migrate => migrate::execute(&config).await,
            Commands::Sweep => sweep::execute(&config, self.format).await,
            Commands::Session(args) => session::execute(args, &config, self.format).await,
            Commands::User(args) => user::execute(args, &config, self.format).await,
        }
    }
}

/// Open the configured store set.
pub async fn open_stores(config: &AppConfig) -> Result<StoreSet, AppError> {
    match config.database.backend {
        StoreBackend::Postgres => {
            let pool = DatabasePool::connect(&config.database).await?;
            Ok(StoreSet::postgres(pool))
        }
        StoreBackend::Memory => {
            warn!("Memory backend selected; changes made by this command are discarded on exit");
            Ok(StoreSet::in_memory())
        }
    }
}

/// Wire the services the commands drive.
pub async fn open_services(config: &AppConfig) -> Result<ServiceRegistry, AppError> {
    let stores = open_stores(config).await?;
    Ok(ServiceRegistry::build(
        config,
        stores,
        Arc::new(MockGateway::new(config.payments.mock_decline)),
        Arc::new(LogAlertSink),
    ))
}
