//! Client metadata pulled from request headers.

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::HeaderMap;
use axum::http::header::USER_AGENT;
use axum::http::request::Parts;

use courtside_auth::session::ClientMeta;

/// Header a client uses to name its device across logins.
pub const DEVICE_ID_HEADER: &str = "x-device-id";

/// Origin details recorded on refresh sessions.
#[derive(Debug, Clone, Default)]
pub struct ClientInfo {
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub device_id: Option<String>,
}

impl ClientInfo {
    /// Session metadata, preferring an explicit device id from the body.
    pub fn into_meta(self, device_id: Option<String>) -> ClientMeta {
        ClientMeta {
            device_id: device_id.or(self.device_id),
            ip_address: self.ip_address,
            user_agent: self.user_agent,
        }
    }
}

impl<S: Send + Sync> FromRequestParts<S> for ClientInfo {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = |name: &str| {
            parts
                .headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(String::from)
        };

        Ok(Self {
            ip_address: client_ip(&parts.headers),
            user_agent: header(USER_AGENT.as_str()),
            device_id: header(DEVICE_ID_HEADER),
        })
    }
}

/// First hop of `X-Forwarded-For`, else `X-Real-IP`.
pub(crate) fn client_ip(headers: &HeaderMap) -> Option<String> {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .or_else(|| headers.get("x-real-ip").and_then(|v| v.to_str().ok()))
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
}
