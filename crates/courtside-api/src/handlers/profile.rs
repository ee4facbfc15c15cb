//! Self-service profile handlers.

use axum::Json;
use axum::extract::State;
use axum_extra::extract::cookie::CookieJar;

use courtside_entity::user::User;

use crate::cookie;
use crate::dto::request::{ChangePasswordBody, UpdateProfileBody};
use crate::dto::response::{ApiResponse, LogoutAllResponse};
use crate::error::ApiResult;
use crate::extractors::{AuthUser, ValidJson};
use crate::state::AppState;

/// GET /api/profile/me
pub async fn get_profile(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<ApiResponse<User>>> {
    let user = state.users.me(&auth).await?;
    Ok(Json(ApiResponse::ok(user)))
}

/// PUT /api/profile/me
pub async fn update_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidJson(body): ValidJson<UpdateProfileBody>,
) -> ApiResult<Json<ApiResponse<User>>> {
    let user = state.users.update_profile(&auth, body.into()).await?;
    Ok(Json(ApiResponse::ok(user)))
}

/// POST /api/profile/change-password
///
/// Every session of the user is revoked, including the caller's.
pub async fn change_password(
    State(state): State<AppState>,
    auth: AuthUser,
    jar: CookieJar,
    ValidJson(body): ValidJson<ChangePasswordBody>,
) -> ApiResult<(CookieJar, Json<ApiResponse<LogoutAllResponse>>)> {
    let revoked_sessions = state.users.change_password(&auth, body.into()).await?;
    Ok((
        cookie::clear_refresh(jar, &state.config.auth.cookie),
        Json(ApiResponse::ok(LogoutAllResponse { revoked_sessions })),
    ))
}
