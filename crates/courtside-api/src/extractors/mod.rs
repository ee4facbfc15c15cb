//! Custom request extractors.

pub mod auth;
pub mod client;
pub mod json;
pub mod pagination;

pub use auth::AuthUser;
pub use client::ClientInfo;
pub use json::ValidJson;
pub use pagination::PaginationParams;
