//! Pista handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use uuid::Uuid;

use courtside_auth::rbac::Capability;
use courtside_entity::pista::{Pista, UpdatePista};
use courtside_service::pista::CreatePistaRequest;

use crate::dto::request::PistaListQuery;
use crate::dto::response::ApiResponse;
use crate::error::ApiResult;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// GET /api/pistas
///
/// Inactive pistas are only listed for callers who manage them.
pub async fn list_pistas(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<PistaListQuery>,
) -> ApiResult<Json<ApiResponse<Vec<Pista>>>> {
    let active_only = query.active_only || !state.rbac.allows(auth.role, Capability::ManagePistas);
    let pistas = state.pistas.list(active_only).await?;
    Ok(Json(ApiResponse::ok(pistas)))
}

/// GET /api/pistas/{id}
pub async fn get_pista(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ApiResponse<Pista>>> {
    Ok(Json(ApiResponse::ok(state.pistas.get(id).await?)))
}

/// POST /api/pistas
pub async fn create_pista(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CreatePistaRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<Pista>>)> {
    let pista = state.pistas.create(&auth, req).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(pista))))
}

/// PATCH /api/pistas/{id}
pub async fn update_pista(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(patch): Json<UpdatePista>,
) -> ApiResult<Json<ApiResponse<Pista>>> {
    let pista = state.pistas.update(&auth, id, patch).await?;
    Ok(Json(ApiResponse::ok(pista)))
}

/// DELETE /api/pistas/{id}
pub async fn deactivate_pista(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ApiResponse<Pista>>> {
    let pista = state.pistas.deactivate(&auth, id).await?;
    Ok(Json(ApiResponse::ok(pista)))
}
