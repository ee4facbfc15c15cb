//! Typed refresh/authentication rejections.

use thiserror::Error;

use courtside_core::error::{AppError, codes};
use courtside_entity::session::RevokeReason;

/// Why a token or session was rejected.
///
/// The variants exist for logging; every one except `Store` reaches the
/// client as the same generic 401.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("token expired")]
    Expired,
    #[error("token invalid")]
    Invalid,
    #[error("session family not found")]
    FamilyNotFound,
    #[error("session revoked ({0})")]
    Revoked(RevokeReason),
    #[error("refresh token reused")]
    Reused,
    #[error("session version mismatch")]
    VersionMismatch,
    #[error("user inactive or missing")]
    UserInactive,
    #[error(transparent)]
    Store(#[from] AppError),
}

impl SessionError {
    /// Short label for structured logs.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Expired => "expired",
            Self::Invalid => "invalid",
            Self::FamilyNotFound => "family_not_found",
            Self::Revoked(_) => "revoked",
            Self::Reused => "reused",
            Self::VersionMismatch => "version_mismatch",
            Self::UserInactive => "user_inactive",
            Self::Store(_) => "store",
        }
    }
}

impl From<SessionError> for AppError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::Store(inner) => inner,
            _ => AppError::authentication("Session invalid, please re-authenticate")
                .with_code(codes::SESSION_INVALID),
        }
    }
}
