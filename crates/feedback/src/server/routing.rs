//! Axum router configuration for all endpoints

use axum::{
  middleware,
  routing::{get, post},
  Router,
};

use crate::server::handlers::{feedback, status, tags};
use crate::server::middleware::request_context_middleware;
use crate::server::state::AppState;

/// Create the main application router
pub fn create_router(state: AppState) -> Router {
  Router::new()
    // Status and version endpoints
    .route("/", get(status::welcome))
    .route("/status", get(status::status))
    .route("/version", get(status::version))
    .route("/api", get(status::api_info))
    // Feedback endpoints
    .route("/api/feedback", post(feedback::submit_feedback).get(feedback::list_feedback))
    .route("/api/feedback/{id}", get(feedback::get_feedback))
    // Tag endpoints
    .route("/api/tags", get(tags::list_tags))
    .layer(middleware::from_fn(request_context_middleware))
    .with_state(state)
}
