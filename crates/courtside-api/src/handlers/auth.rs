//! Auth handlers: register, login, refresh, logout, me, sessions.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum_extra::extract::cookie::CookieJar;
use tracing::info;

use courtside_auth::jwt::IssuedToken;
use courtside_core::error::{AppError, codes};
use courtside_entity::user::User;

use crate::cookie;
use crate::dto::request::{LoginBody, RegisterBody};
use crate::dto::response::{
    ApiResponse, LogoutAllResponse, MessageResponse, SessionResponse, TokenResponse,
};
use crate::error::{ApiError, ApiResult};
use crate::extractors::{AuthUser, ClientInfo, ValidJson};
use crate::state::AppState;

fn token_response(
    user: User,
    device_id: String,
    access: IssuedToken,
    refresh: Option<&IssuedToken>,
) -> TokenResponse {
    TokenResponse {
        access_token: access.token,
        token_type: "Bearer",
        access_expires_at: access.expires_at,
        refresh_expires_at: refresh.map(|t| t.expires_at),
        device_id,
        user,
    }
}

/// POST /api/auth/register
pub async fn register(
    State(state): State<AppState>,
    ValidJson(body): ValidJson<RegisterBody>,
) -> ApiResult<(StatusCode, Json<ApiResponse<User>>)> {
    let user = state.users.register(body.into()).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(user))))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    client: ClientInfo,
    jar: CookieJar,
    ValidJson(body): ValidJson<LoginBody>,
) -> ApiResult<(CookieJar, Json<ApiResponse<TokenResponse>>)> {
    let outcome = state
        .sessions
        .login(&body.email, &body.password, client.into_meta(body.device_id))
        .await?;

    let cookie_config = &state.config.auth.cookie;
    let jar = match &outcome.refresh {
        Some(refresh) => cookie::set_refresh(jar, cookie_config, refresh),
        None => cookie::clear_refresh(jar, cookie_config),
    };

    let body = token_response(
        outcome.user,
        outcome.device_id,
        outcome.access,
        outcome.refresh.as_ref(),
    );
    Ok((jar, Json(ApiResponse::ok(body))))
}

/// POST /api/auth/refresh
///
/// Any failure clears the cookie so the client falls back to a full login.
pub async fn refresh(
    State(state): State<AppState>,
    client: ClientInfo,
    jar: CookieJar,
) -> Response {
    let cookie_config = &state.config.auth.cookie;
    let Some(raw) = cookie::read_refresh(&jar, cookie_config) else {
        let err = AppError::authentication("Missing refresh token").with_code(codes::SESSION_INVALID);
        return (cookie::clear_refresh(jar, cookie_config), ApiError(err)).into_response();
    };

    let client_ip = client.ip_address.clone();
    match state.sessions.refresh(&raw, client.ip_address).await {
        Ok(outcome) => {
            let jar = cookie::set_refresh(jar, cookie_config, &outcome.refresh);
            let body = token_response(
                outcome.user,
                outcome.device_id,
                outcome.access,
                Some(&outcome.refresh),
            );
            (jar, Json(ApiResponse::ok(body))).into_response()
        }
        Err(err) => {
            info!(reason = err.label(), ip = ?client_ip, "Refresh rejected");
            (cookie::clear_refresh(jar, cookie_config), ApiError::from(err)).into_response()
        }
    }
}

/// POST /api/auth/logout
///
/// Ends the session bound to the device the access token was issued to.
pub async fn logout(
    State(state): State<AppState>,
    auth: AuthUser,
    jar: CookieJar,
) -> ApiResult<(CookieJar, Json<ApiResponse<MessageResponse>>)> {
    let revoked = state.sessions.logout(auth.user_id, &auth.device_id).await?;
    let message = if revoked {
        "Logged out"
    } else {
        "No active session for this device"
    };
    Ok((
        cookie::clear_refresh(jar, &state.config.auth.cookie),
        Json(ApiResponse::ok(MessageResponse::new(message))),
    ))
}

/// POST /api/auth/logout-all
pub async fn logout_all(
    State(state): State<AppState>,
    auth: AuthUser,
    jar: CookieJar,
) -> ApiResult<(CookieJar, Json<ApiResponse<LogoutAllResponse>>)> {
    let revoked_sessions = state.sessions.logout_all_devices(auth.user_id).await?;
    Ok((
        cookie::clear_refresh(jar, &state.config.auth.cookie),
        Json(ApiResponse::ok(LogoutAllResponse { revoked_sessions })),
    ))
}

/// GET /api/auth/me
pub async fn me(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<ApiResponse<User>>> {
    let user = state.users.me(&auth).await?;
    Ok(Json(ApiResponse::ok(user)))
}

/// GET /api/auth/sessions
pub async fn sessions(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<ApiResponse<Vec<SessionResponse>>>> {
    let sessions = state
        .sessions
        .active_sessions(auth.user_id)
        .await?
        .into_iter()
        .map(|s| SessionResponse::from_session(s, &auth.device_id))
        .collect();
    Ok(Json(ApiResponse::ok(sessions)))
}
