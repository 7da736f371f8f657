use serde::{Deserialize, Serialize};

/// Request body for POST /refine-text
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefineTextRequest {
    /// Text to refine
    pub text: String,
    /// Desired tone (professional, casual, formal, creative, ...)
    #[serde(default)]
    pub tone: Option<String>,
    /// Upper bound on the refined text length, in characters
    #[serde(default)]
    pub max_length: Option<u32>,
}

/// Request body for POST /generate-title
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateTitleRequest {
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefinedTextResponse {
    pub original_text: String,
    pub refined_text: String,
    pub tone: String,
    pub improvements_made: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TitleResponse {
    pub original_text: String,
    pub suggested_titles: Vec<String>,
    pub primary_title: String,
}
