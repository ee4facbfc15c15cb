//! `AuthUser` extractor: validates the bearer access token against the live
//! user and builds the request context.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use courtside_core::error::{AppError, codes};
use courtside_service::context::RequestContext;

use super::client::client_ip;
use crate::error::ApiError;
use crate::state::AppState;

/// Authenticated caller available in handlers.
#[derive(Debug, Clone)]
pub struct AuthUser(pub RequestContext);

impl AuthUser {
    /// Returns the inner `RequestContext`.
    pub fn context(&self) -> &RequestContext {
        &self.0
    }
}

impl std::ops::Deref for AuthUser {
    type Target = RequestContext;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                AppError::authentication("Missing bearer token").with_code(codes::SESSION_INVALID)
            })?;

        // Checks signature, expiry, user liveness, and session version.
        let (claims, user) = state.sessions.authenticate(token).await?;

        let ctx = RequestContext::new(user.id, user.email, user.role, claims.dev)
            .with_ip(client_ip(&parts.headers));
        Ok(AuthUser(ctx))
    }
}
