//! Admin user management handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use uuid::Uuid;

use courtside_core::types::PageResponse;
use courtside_entity::user::User;
use courtside_service::user::RoleInfo;

use crate::dto::request::{ChangeRoleBody, SetActiveBody};
use crate::dto::response::ApiResponse;
use crate::error::ApiResult;
use crate::extractors::{AuthUser, PaginationParams};
use crate::state::AppState;

/// GET /api/users
pub async fn list_users(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<PaginationParams>,
) -> ApiResult<Json<ApiResponse<PageResponse<User>>>> {
    let page = state.users.list(&auth, &params.into_page_request()).await?;
    Ok(Json(ApiResponse::ok(page)))
}

/// PUT /api/users/{id}/role
pub async fn change_role(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(body): Json<ChangeRoleBody>,
) -> ApiResult<Json<ApiResponse<User>>> {
    let user = state.users.change_role(&auth, id, body.role).await?;
    Ok(Json(ApiResponse::ok(user)))
}

/// PUT /api/users/{id}/active
pub async fn set_active(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(body): Json<SetActiveBody>,
) -> ApiResult<Json<ApiResponse<User>>> {
    let user = state.users.set_active(&auth, id, body.is_active).await?;
    Ok(Json(ApiResponse::ok(user)))
}

/// GET /api/roles
pub async fn list_roles(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> Json<ApiResponse<Vec<RoleInfo>>> {
    Json(ApiResponse::ok(state.users.roles()))
}
