//! Health check handler.

use axum::Json;
use axum::extract::State;

use inbound_core::error::AppError;

use crate::dto::response::{ApiResponse, HealthResponse};
use crate::error::ApiError;
use crate::state::AppState;

/// GET /api/health
pub async fn health(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<HealthResponse>>, ApiError> {
    match state.stores.health_check().await {
        Ok(true) => {}
        Ok(false) => return Err(AppError::service_unavailable("Database unavailable").into()),
        Err(e) => {
            tracing::warn!(error = %e, "Health check failed");
            return Err(AppError::service_unavailable("Database unavailable").into());
        }
    }

    Ok(Json(ApiResponse::ok(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })))
}
