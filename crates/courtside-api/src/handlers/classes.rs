//! Class and enrollment handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use uuid::Uuid;

use courtside_core::types::PageResponse;
use courtside_entity::class::{Class, Enrollment};
use courtside_entity::payment::Payment;
use courtside_service::class::{ClassDetail, CreateClassRequest, UpdateClassRequest};

use crate::dto::request::TargetUserQuery;
use crate::dto::response::{ApiResponse, MessageResponse};
use crate::error::ApiResult;
use crate::extractors::{AuthUser, PaginationParams};
use crate::state::AppState;

/// GET /api/classes
pub async fn list_classes(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<PaginationParams>,
) -> ApiResult<Json<ApiResponse<PageResponse<Class>>>> {
    let page = state
        .classes
        .list_upcoming(&auth, &params.into_page_request())
        .await?;
    Ok(Json(ApiResponse::ok(page)))
}

/// GET /api/classes/{id}
pub async fn get_class(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ApiResponse<ClassDetail>>> {
    Ok(Json(ApiResponse::ok(state.classes.get(id).await?)))
}

/// POST /api/classes
pub async fn create_class(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CreateClassRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<Class>>)> {
    let class = state.classes.create(&auth, req).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(class))))
}

/// PUT /api/classes/{id}
pub async fn update_class(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateClassRequest>,
) -> ApiResult<Json<ApiResponse<Class>>> {
    Ok(Json(ApiResponse::ok(state.classes.update(&auth, id, req).await?)))
}

/// POST /api/classes/{id}/cancel
pub async fn cancel_class(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ApiResponse<Class>>> {
    Ok(Json(ApiResponse::ok(state.classes.cancel(&auth, id).await?)))
}

/// POST /api/classes/{id}/start
pub async fn start_class(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ApiResponse<Class>>> {
    Ok(Json(ApiResponse::ok(state.classes.begin(&auth, id).await?)))
}

/// POST /api/classes/{id}/enrollments
pub async fn enroll(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Query(target): Query<TargetUserQuery>,
) -> ApiResult<(StatusCode, Json<ApiResponse<Enrollment>>)> {
    let enrollment = state
        .enrollments
        .enroll(&auth, id, target.user_slug.as_deref())
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(enrollment))))
}

/// DELETE /api/classes/{id}/enrollments
pub async fn unenroll(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Query(target): Query<TargetUserQuery>,
) -> ApiResult<Json<ApiResponse<MessageResponse>>> {
    state
        .enrollments
        .unenroll(&auth, id, target.user_slug.as_deref())
        .await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new("Enrollment cancelled"))))
}

/// GET /api/classes/{id}/enrollments
pub async fn list_enrollments(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ApiResponse<Vec<Enrollment>>>> {
    let roster = state.enrollments.list_for_class(&auth, id).await?;
    Ok(Json(ApiResponse::ok(roster)))
}

/// GET /api/enrollments/{id}
pub async fn get_enrollment(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ApiResponse<Enrollment>>> {
    Ok(Json(ApiResponse::ok(state.enrollments.get(&auth, id).await?)))
}

/// POST /api/enrollments/{id}/pay
pub async fn pay_enrollment(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<(StatusCode, Json<ApiResponse<Payment>>)> {
    let payment = state.payments.pay_enrollment(&auth, id).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(payment))))
}
