use super::{json_rejection, AppState};
use crate::api::models::{GenerateTitleRequest, RefineTextRequest};
use crate::core::error::{ErrorContext, Result};
use axum::{
    extract::{rejection::JsonRejection, State},
    response::IntoResponse,
    Json,
};

/// Handler for POST /refine-text
pub async fn refine_text(
    State(state): State<AppState>,
    payload: std::result::Result<Json<RefineTextRequest>, JsonRejection>,
) -> Result<impl IntoResponse> {
    let Json(request) = payload.map_err(json_rejection)?;

    let response = state
        .service
        .refine_text(request)
        .await
        .context("Error refining text")?;

    Ok(Json(response))
}

/// Handler for POST /generate-title
pub async fn generate_title(
    State(state): State<AppState>,
    payload: std::result::Result<Json<GenerateTitleRequest>, JsonRejection>,
) -> Result<impl IntoResponse> {
    let Json(request) = payload.map_err(json_rejection)?;

    let response = state
        .service
        .generate_titles(request)
        .await
        .context("Error generating titles")?;

    Ok(Json(response))
}
