//! Payment handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use uuid::Uuid;

use courtside_core::types::PageResponse;
use courtside_entity::payment::Payment;

use crate::dto::response::ApiResponse;
use crate::error::ApiResult;
use crate::extractors::{AuthUser, PaginationParams};
use crate::state::AppState;

/// GET /api/payments/mine
pub async fn list_my_payments(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<PaginationParams>,
) -> ApiResult<Json<ApiResponse<PageResponse<Payment>>>> {
    let page = state
        .payments
        .list_mine(&auth, &params.into_page_request())
        .await?;
    Ok(Json(ApiResponse::ok(page)))
}

/// GET /api/payments
pub async fn list_payments(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<PaginationParams>,
) -> ApiResult<Json<ApiResponse<PageResponse<Payment>>>> {
    let page = state
        .payments
        .list_all(&auth, &params.into_page_request())
        .await?;
    Ok(Json(ApiResponse::ok(page)))
}

/// GET /api/payments/{id}
pub async fn get_payment(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ApiResponse<Payment>>> {
    Ok(Json(ApiResponse::ok(state.payments.get(&auth, id).await?)))
}

/// POST /api/payments/{id}/refund
pub async fn refund_payment(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ApiResponse<Payment>>> {
    Ok(Json(ApiResponse::ok(state.payments.refund(&auth, id).await?)))
}
