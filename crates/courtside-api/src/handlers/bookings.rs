//! Booking handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use uuid::Uuid;

use courtside_core::types::PageResponse;
use courtside_entity::booking::Booking;
use courtside_entity::payment::Payment;
use courtside_service::booking::{CreateBookingRequest, UpdateBookingRequest};

use crate::dto::response::{ApiResponse, MessageResponse};
use crate::error::ApiResult;
use crate::extractors::{AuthUser, PaginationParams};
use crate::state::AppState;

/// POST /api/bookings
pub async fn create_booking(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CreateBookingRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<Booking>>)> {
    let booking = state.bookings.create(&auth, req).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(booking))))
}

/// GET /api/bookings/mine
pub async fn list_my_bookings(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<PaginationParams>,
) -> ApiResult<Json<ApiResponse<PageResponse<Booking>>>> {
    let page = state
        .bookings
        .list_mine(&auth, &params.into_page_request())
        .await?;
    Ok(Json(ApiResponse::ok(page)))
}

/// GET /api/bookings
pub async fn list_bookings(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<PaginationParams>,
) -> ApiResult<Json<ApiResponse<PageResponse<Booking>>>> {
    let page = state
        .bookings
        .list_all(&auth, &params.into_page_request())
        .await?;
    Ok(Json(ApiResponse::ok(page)))
}

/// GET /api/bookings/{id}
pub async fn get_booking(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ApiResponse<Booking>>> {
    Ok(Json(ApiResponse::ok(state.bookings.get(&auth, id).await?)))
}

/// PUT /api/bookings/{id}
pub async fn update_booking(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateBookingRequest>,
) -> ApiResult<Json<ApiResponse<Booking>>> {
    let booking = state.bookings.update(&auth, id, req).await?;
    Ok(Json(ApiResponse::ok(booking)))
}

/// POST /api/bookings/{id}/cancel
pub async fn cancel_booking(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ApiResponse<Booking>>> {
    Ok(Json(ApiResponse::ok(state.bookings.cancel(&auth, id).await?)))
}

/// POST /api/bookings/{id}/confirm
pub async fn confirm_booking(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ApiResponse<Booking>>> {
    Ok(Json(ApiResponse::ok(state.bookings.confirm(&auth, id).await?)))
}

/// POST /api/bookings/{id}/pay
pub async fn pay_booking(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<(StatusCode, Json<ApiResponse<Payment>>)> {
    let payment = state.payments.pay_booking(&auth, id).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(payment))))
}

/// DELETE /api/bookings/{id}
pub async fn delete_booking(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ApiResponse<MessageResponse>>> {
    state.bookings.delete(&auth, id).await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new("Booking deleted"))))
}
