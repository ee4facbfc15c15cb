//! Convenience result type alias for Courtside.

use crate::error::AppError;

/// A specialized `Result` type for Courtside operations.
pub type AppResult<T> = Result<T, AppError>;
