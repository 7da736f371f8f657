use super::AppState;
use crate::api::models::{EndpointsInfo, ServiceInfoResponse};
use axum::{extract::State, response::IntoResponse, Json};

/// Handler for GET / - static service metadata
pub async fn service_info() -> impl IntoResponse {
    Json(ServiceInfoResponse {
        message: "Text Refinement API is running".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        endpoints: EndpointsInfo {
            refine_text: "/refine-text".to_string(),
            generate_title: "/generate-title".to_string(),
        },
    })
}

/// Handler for GET /health
///
/// Always answers 200; an unusable model client is reported in the body.
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.service.health())
}
