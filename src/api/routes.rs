//! API routes

use crate::api::handlers::{generate_title, health_check, refine_text, service_info, AppState};
use axum::{
    routing::{get, post},
    Router,
};

/// Build the API routes
pub fn build_api_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(service_info))
        .route("/health", get(health_check))
        .route("/refine-text", post(refine_text))
        .route("/generate-title", post(generate_title))
        .with_state(state)
}
