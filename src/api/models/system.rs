use serde::{Deserialize, Serialize};

/// Response for GET /
#[derive(Debug, Serialize, Deserialize)]
pub struct ServiceInfoResponse {
    pub message: String,
    pub version: String,
    pub endpoints: EndpointsInfo,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct EndpointsInfo {
    pub refine_text: String,
    pub generate_title: String,
}

/// Overall health status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Unhealthy,
}

/// Response for GET /health
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    /// "connected" when the model client is usable
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gemini_api: Option<String>,
    /// Why the model client is unusable
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub model: String,
    pub timestamp: String,
}
