//! Health check handler.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use crate::dto::response::{ApiResponse, HealthResponse};
use crate::state::AppState;

/// GET /api/health
pub async fn health(
    State(state): State<AppState>,
) -> (StatusCode, Json<ApiResponse<HealthResponse>>) {
    let healthy = state.stores.health_check().await;
    let store = if state.stores.pool.is_some() {
        "postgres"
    } else {
        "memory"
    };
    let status = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(ApiResponse {
            success: healthy,
            data: HealthResponse {
                status: if healthy { "ok" } else { "degraded" },
                version: env!("CARGO_PKG_VERSION"),
                store,
            },
        }),
    )
}
