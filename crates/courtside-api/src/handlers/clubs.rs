//! Club and membership handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use uuid::Uuid;

use courtside_core::types::PageResponse;
use courtside_entity::club::{Club, ClubMembership, ClubPatch};
use courtside_service::club::{ClubSummary, CreateClubRequest};

use crate::dto::request::{NextBillingBody, TargetUserQuery};
use crate::dto::response::{ApiResponse, MessageResponse};
use crate::error::ApiResult;
use crate::extractors::{AuthUser, PaginationParams};
use crate::state::AppState;

/// GET /api/clubs
pub async fn list_clubs(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(params): Query<PaginationParams>,
) -> ApiResult<Json<ApiResponse<PageResponse<ClubSummary>>>> {
    let page = state.clubs.list(&params.into_page_request()).await?;
    Ok(Json(ApiResponse::ok(page)))
}

/// GET /api/clubs/{id}
pub async fn get_club(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ApiResponse<ClubSummary>>> {
    Ok(Json(ApiResponse::ok(state.clubs.get(id).await?)))
}

/// POST /api/clubs
pub async fn create_club(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CreateClubRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<Club>>)> {
    let club = state.clubs.create(&auth, req).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(club))))
}

/// PATCH /api/clubs/{id}
pub async fn update_club(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(patch): Json<ClubPatch>,
) -> ApiResult<Json<ApiResponse<Club>>> {
    Ok(Json(ApiResponse::ok(state.clubs.update(&auth, id, patch).await?)))
}

/// DELETE /api/clubs/{id}
pub async fn delete_club(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ApiResponse<MessageResponse>>> {
    state.clubs.delete(&auth, id).await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new("Club deleted"))))
}

/// GET /api/clubs/{id}/members
pub async fn list_members(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ApiResponse<Vec<ClubMembership>>>> {
    let members = state.memberships.list_members(&auth, id).await?;
    Ok(Json(ApiResponse::ok(members)))
}

/// POST /api/clubs/{id}/members
pub async fn add_member(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Query(target): Query<TargetUserQuery>,
) -> ApiResult<(StatusCode, Json<ApiResponse<ClubMembership>>)> {
    let membership = state
        .memberships
        .add(&auth, id, target.user_slug.as_deref())
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(membership))))
}

/// GET /api/memberships/{id}
pub async fn get_membership(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ApiResponse<ClubMembership>>> {
    Ok(Json(ApiResponse::ok(state.memberships.get(&auth, id).await?)))
}

/// POST /api/memberships/{id}/suspend
pub async fn suspend_membership(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ApiResponse<ClubMembership>>> {
    Ok(Json(ApiResponse::ok(state.memberships.suspend(&auth, id).await?)))
}

/// POST /api/memberships/{id}/activate
pub async fn activate_membership(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ApiResponse<ClubMembership>>> {
    Ok(Json(ApiResponse::ok(state.memberships.activate(&auth, id).await?)))
}

/// POST /api/memberships/{id}/cancel
pub async fn cancel_membership(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ApiResponse<ClubMembership>>> {
    Ok(Json(ApiResponse::ok(state.memberships.cancel(&auth, id).await?)))
}

/// PUT /api/memberships/{id}/billing
pub async fn update_billing(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(body): Json<NextBillingBody>,
) -> ApiResult<Json<ApiResponse<ClubMembership>>> {
    let membership = state
        .memberships
        .update_next_billing(&auth, id, body.next_billing_date)
        .await?;
    Ok(Json(ApiResponse::ok(membership)))
}

/// POST /api/memberships/{id}/renew
pub async fn renew_membership(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ApiResponse<ClubMembership>>> {
    Ok(Json(ApiResponse::ok(state.renewals.renew(&auth, id).await?)))
}
