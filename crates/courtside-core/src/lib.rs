//! # courtside-core
//!
//! Core crate for Courtside. Contains configuration schemas, the half-open
//! time interval used by the availability engine, pagination types, and
//! the unified error system.
//!
//! This crate has **no** internal dependencies on other Courtside crates.

pub mod config;
pub mod error;
pub mod result;
pub mod types;

pub use error::{AppError, ErrorKind};
pub use result::AppResult;
