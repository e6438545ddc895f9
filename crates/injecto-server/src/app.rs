//! Router construction.
//!
//! Builds the axum router with all routes and middleware.

use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Create the application router.
///
/// # Arguments
///
/// * `state` - Shared application state
/// * `body_limit` - Maximum request body size in bytes
pub(crate) fn create_router(state: Arc<AppState>, body_limit: usize) -> Router {
    Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/process", post(handlers::process::process))
        .route(
            "/process-git-download",
            post(handlers::process::process_git_download),
        )
        .route("/process-upload", post(handlers::upload::process_upload))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(DefaultBodyLimit::max(body_limit)),
        )
        .with_state(state)
}
