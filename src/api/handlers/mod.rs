pub mod system;
pub mod text;

pub use system::*;
pub use text::*;

use crate::core::error::RefinerError;
use crate::core::services::RefinementService;
use axum::extract::rejection::JsonRejection;
use std::sync::Arc;

/// Shared application state for handlers
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<RefinementService>,
}

/// Body parse failures: well-formed JSON of the wrong shape is a validation
/// error (422), anything else is a bad request (400).
pub(crate) fn json_rejection(rejection: JsonRejection) -> RefinerError {
    match rejection {
        JsonRejection::JsonDataError(e) => RefinerError::ValidationError(e.body_text()),
        other => RefinerError::InvalidRequest(other.body_text()),
    }
}
