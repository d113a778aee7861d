pub mod health;

use axum::{
    http::Uri,
    routing::{get, post},
    Router,
};

use crate::ats::handlers;
use crate::errors::AppError;
use crate::state::AppState;

async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(format!("No route for {uri}"))
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // ATS engine
        .route("/api/v1/ats/keywords", post(handlers::handle_keywords))
        .route("/api/v1/ats/analyze", post(handlers::handle_analyze))
        .route("/api/v1/ats/apply", post(handlers::handle_apply))
        .route("/api/v1/ats/apply-all", post(handlers::handle_apply_all))
        .route("/api/v1/ats/recompute", post(handlers::handle_recompute))
        .fallback(not_found)
        .with_state(state)
}
