//! Maps domain errors to HTTP responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use courtside_auth::session::SessionError;
use courtside_core::error::{AppError, ErrorKind};
use courtside_core::types::ApiErrorResponse;

/// HTTP-facing wrapper around [`AppError`].
///
/// Server-side failures are logged in full and answered with a generic
/// message; storage text never reaches the client.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl ApiError {
    pub fn status(&self) -> StatusCode {
        status_for(self.0.kind)
    }
}

pub(crate) fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::Validation => StatusCode::BAD_REQUEST,
        ErrorKind::Authentication => StatusCode::UNAUTHORIZED,
        ErrorKind::Authorization => StatusCode::FORBIDDEN,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::Conflict => StatusCode::CONFLICT,
        ErrorKind::PaymentDeclined => StatusCode::PAYMENT_REQUIRED,
        ErrorKind::ExternalService => StatusCode::BAD_GATEWAY,
        ErrorKind::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        ErrorKind::Internal
        | ErrorKind::Database
        | ErrorKind::Configuration
        | ErrorKind::Serialization => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let err = self.0;
        let status = status_for(err.kind);

        let message = match err.kind {
            kind if kind.is_server_error() => {
                tracing::error!(
                    kind = %kind,
                    error = %err.message,
                    source = ?err.source,
                    "Request failed"
                );
                if kind == ErrorKind::ServiceUnavailable {
                    "Service temporarily unavailable".to_string()
                } else {
                    "Internal server error".to_string()
                }
            }
            ErrorKind::Authorization => {
                tracing::debug!(detail = %err.message, "Access denied");
                "You do not have permission to perform this action".to_string()
            }
            _ => err.message.clone(),
        };

        let body = ApiErrorResponse {
            success: false,
            error: err
                .code
                .map(str::to_string)
                .unwrap_or_else(|| err.kind.to_string()),
            message,
        };

        (status, Json(body)).into_response()
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl From<SessionError> for ApiError {
    fn from(err: SessionError) -> Self {
        tracing::debug!(reason = err.label(), "Session rejected");
        Self(err.into())
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<String> = errors
            .field_errors()
            .into_iter()
            .map(|(field, errs)| {
                let detail = errs
                    .iter()
                    .find_map(|e| e.message.as_ref().map(|m| m.to_string()))
                    .unwrap_or_else(|| "is invalid".to_string());
                format!("{field}: {detail}")
            })
            .collect();
        fields.sort();
        Self(AppError::validation(fields.join("; ")))
    }
}

/// Handler result alias.
pub type ApiResult<T> = Result<T, ApiError>;
