//! Background work for Courtside.
//!
//! This crate provides:
//! - A job executor that dispatches named jobs to their handlers
//! - Handlers for the lifecycle sweep and refresh-session cleanup
//! - A cron scheduler and a runner tying both to the shutdown signal

pub mod executor;
pub mod jobs;
pub mod runner;
pub mod scheduler;

pub use executor::{JobExecutionError, JobExecutor, JobHandler};
pub use runner::WorkerRunner;
pub use scheduler::CronScheduler;
