pub mod health;

use axum::{
    extract::{DefaultBodyLimit, OriginalUri},
    routing::{get, post},
    Router,
};

use crate::errors::AppError;
use crate::fitment::handlers;
use crate::state::AppState;

async fn not_found(OriginalUri(uri): OriginalUri) -> AppError {
    AppError::NotFound(uri.path().to_string())
}

pub fn build_router(state: AppState) -> Router {
    let upload_limit = state.max_upload_bytes;
    Router::new()
        .route("/", get(health::welcome_handler))
        .route("/health", get(health::health_handler))
        .route(
            "/job_fitment_score",
            post(handlers::handle_job_fitment_score).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .fallback(not_found)
        .with_state(state)
}
