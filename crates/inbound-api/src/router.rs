//! Route definitions for the Inbound HTTP API.
//!
//! All routes are organized by domain and mounted under `/api`.

use axum::{Router, extract::DefaultBodyLimit, routing::{get, post}};

use crate::handlers;
use crate::state::AppState;

/// Room for multipart framing on top of the file itself.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Build the API router with state applied.
pub fn build_router(state: AppState) -> Router {
    let max_upload = usize::try_from(state.config.storage.max_upload_size_bytes)
        .unwrap_or(usize::MAX)
        .saturating_add(MULTIPART_OVERHEAD);

    let api_routes = Router::new()
        .merge(auth_routes())
        .merge(reverse_share_routes().layer(DefaultBodyLimit::max(max_upload)))
        .merge(health_routes());

    Router::new().nest("/api", api_routes).with_state(state)
}

/// Owner login
fn auth_routes() -> Router<AppState> {
    Router::new().route("/auth/login", post(handlers::auth::login))
}

/// Invite creation and guest uploads
fn reverse_share_routes() -> Router<AppState> {
    Router::new()
        .route("/reverse-shares/invite", post(handlers::reverse_share::create_invite))
        .route("/reverse-shares/uploads", post(handlers::reverse_share::upload))
}

/// Liveness
fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}
