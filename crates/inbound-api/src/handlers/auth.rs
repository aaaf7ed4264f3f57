//! Auth handlers.

use axum::Json;
use axum::extract::State;

use inbound_service::LoginResponse;

use crate::dto::request::LoginRequest;
use crate::dto::response::ApiResponse;
use crate::error::ApiError;
use crate::extractors::ValidatedJson;
use crate::state::AppState;

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> Result<Json<ApiResponse<LoginResponse>>, ApiError> {
    let tokens = state.auth_service.login(&req.email, &req.password).await?;
    Ok(Json(ApiResponse::ok(tokens)))
}
