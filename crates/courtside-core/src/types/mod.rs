//! Core type definitions used across the Courtside workspace.

pub mod pagination;
pub mod response;
pub mod time_range;

pub use pagination::{PageRequest, PageResponse};
pub use response::ApiErrorResponse;
pub use time_range::TimeRange;
