//! Unified application error types for Courtside.
//!
//! All crates map their internal errors into [`AppError`] for consistent
//! propagation through the ? operator. Conflicts that callers need to tell
//! apart (an overlapping booking, a full class, a slot taken by a concurrent
//! writer) carry a machine-readable `code` next to the kind.

use std::fmt;
use thiserror::Error;

/// Machine-readable codes carried by [`AppError::code`].
pub mod codes {
    pub const INVALID_INTERVAL: &str = "INVALID_INTERVAL";
    pub const BOOKING_CONFLICT: &str = "BOOKING_CONFLICT";
    pub const CLASS_CONFLICT: &str = "CLASS_CONFLICT";
    pub const SLOT_TAKEN_CONCURRENTLY: &str = "SLOT_TAKEN_CONCURRENTLY";
    pub const CLASS_NOT_OPEN: &str = "CLASS_NOT_OPEN";
    pub const CLASS_FULL: &str = "CLASS_FULL";
    pub const ALREADY_ENROLLED: &str = "ALREADY_ENROLLED";
    pub const ALREADY_MEMBER: &str = "ALREADY_MEMBER";
    pub const CLUB_FULL: &str = "CLUB_FULL";
    pub const CLUB_HAS_MEMBERS: &str = "CLUB_HAS_MEMBERS";
    pub const EMAIL_TAKEN: &str = "EMAIL_TAKEN";
    pub const SLUG_TAKEN: &str = "SLUG_TAKEN";
    pub const INVALID_STATE: &str = "INVALID_STATE";
    pub const ALREADY_REFUNDED: &str = "ALREADY_REFUNDED";
    pub const PAYMENT_DECLINED: &str = "PAYMENT_DECLINED";
    pub const SESSION_INVALID: &str = "SESSION_INVALID";
}

/// Top-level error kind categorization used across the entire application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ErrorKind {
    /// The requested resource was not found.
    NotFound,
    /// Authentication failed (invalid credentials, expired token, etc.).
    Authentication,
    /// The caller does not have permission to perform the action.
    Authorization,
    /// Input validation failed.
    Validation,
    /// A state conflict (overlap, capacity, duplicate entry).
    Conflict,
    /// The payment gateway declined a charge.
    PaymentDeclined,
    /// An internal server error occurred.
    Internal,
    /// A database error occurred.
    Database,
    /// A configuration error occurred.
    Configuration,
    /// A serialization/deserialization error occurred.
    Serialization,
    /// An external service error occurred.
    ExternalService,
    /// The service is temporarily unavailable.
    ServiceUnavailable,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "NOT_FOUND"),
            Self::Authentication => write!(f, "AUTHENTICATION"),
            Self::Authorization => write!(f, "AUTHORIZATION"),
            Self::Validation => write!(f, "VALIDATION"),
            Self::Conflict => write!(f, "CONFLICT"),
            Self::PaymentDeclined => write!(f, "PAYMENT_DECLINED"),
            Self::Internal => write!(f, "INTERNAL"),
            Self::Database => write!(f, "DATABASE"),
            Self::Configuration => write!(f, "CONFIGURATION"),
            Self::Serialization => write!(f, "SERIALIZATION"),
            Self::ExternalService => write!(f, "EXTERNAL_SERVICE"),
            Self::ServiceUnavailable => write!(f, "SERVICE_UNAVAILABLE"),
        }
    }
}

impl ErrorKind {
    /// Whether errors of this kind are the server's fault.
    ///
    /// Server-side errors are logged with full detail and reported to
    /// clients with a generic message only.
    pub fn is_server_error(&self) -> bool {
        matches!(
            self,
            Self::Internal
                | Self::Database
                | Self::Configuration
                | Self::Serialization
                | Self::ExternalService
                | Self::ServiceUnavailable
        )
    }
}

/// The unified application error used throughout Courtside.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct AppError {
    /// The category of error.
    pub kind: ErrorKind,
    /// A human-readable error message.
    pub message: String,
    /// Machine-readable code refining the kind (e.g. `CLASS_FULL`).
    pub code: Option<&'static str>,
    /// Optional underlying cause.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new application error.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            code: None,
            source: None,
        }
    }

    /// Create a new application error with an underlying cause.
    pub fn with_source(
        kind: ErrorKind,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            code: None,
            source: Some(Box::new(source)),
        }
    }

    /// Attach a machine-readable code.
    pub fn with_code(mut self, code: &'static str) -> Self {
        self.code = Some(code);
        self
    }

    /// Whether this error carries the given code.
    pub fn has_code(&self, code: &str) -> bool {
        self.code == Some(code)
    }

    /// Create a not-found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    /// Create an authentication error.
    pub fn authentication(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Authentication, message)
    }

    /// Create an authorization error.
    pub fn authorization(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Authorization, message)
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    /// Create a conflict error.
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Conflict, message)
    }

    /// Create a payment-declined error.
    pub fn payment_declined(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::PaymentDeclined, message).with_code(codes::PAYMENT_DECLINED)
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }

    /// Create a database error.
    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Database, message)
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }

    /// Create a service-unavailable error.
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ServiceUnavailable, message)
    }
}

impl Clone for AppError {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            message: self.message.clone(),
            code: self.code,
            source: None,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(
            ErrorKind::Serialization,
            format!("JSON serialization error: {err}"),
            err,
        )
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::with_source(
            ErrorKind::Configuration,
            format!("Configuration error: {err}"),
            err,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_kind_and_message() {
        let err = AppError::not_found("Pista 42 not found");
        assert_eq!(err.to_string(), "NOT_FOUND: Pista 42 not found");
    }

    #[test]
    fn clone_keeps_code_but_drops_source() {
        let io = std::io::Error::other("disk");
        let err = AppError::with_source(ErrorKind::Database, "boom", io).with_code("DB");
        let cloned = err.clone();
        assert!(cloned.source.is_none());
        assert!(cloned.has_code("DB"));
        assert_eq!(cloned.kind, ErrorKind::Database);
    }

    #[test]
    fn server_side_kinds() {
        assert!(ErrorKind::Database.is_server_error());
        assert!(!ErrorKind::Conflict.is_server_error());
        assert!(!ErrorKind::Authentication.is_server_error());
    }
}
