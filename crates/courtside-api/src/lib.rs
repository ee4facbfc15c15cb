//! # courtside-api
//!
//! HTTP API layer for Courtside built on Axum.
//!
//! Provides route definitions, extractors, middleware, request/response
//! DTOs, and handler functions. The crate depends on the service layer and
//! translates its errors into HTTP responses at the boundary.

pub mod cookie;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use error::ApiError;
pub use router::build_router;
pub use state::AppState;
