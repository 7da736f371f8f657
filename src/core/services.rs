//! Refinement service
//!
//! Sits between the HTTP handlers and the model client: validates input,
//! renders the prompt, calls the model once and parses the reply.

use crate::api::models::{
    GenerateTitleRequest, HealthResponse, HealthStatus, RefineTextRequest, RefinedTextResponse,
    TitleResponse,
};
use crate::core::error::{RefinerError, Result};
use crate::core::{parser, prompts};
use crate::llm::TextGenerator;
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info};

pub struct RefinementService {
    generator: Arc<dyn TextGenerator>,
}

impl RefinementService {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    /// Rewrite `request.text` in the requested tone and list the improvements made
    pub async fn refine_text(&self, request: RefineTextRequest) -> Result<RefinedTextResponse> {
        validate_text(&request.text)?;

        let tone = resolve_tone(request.tone.as_deref());
        info!(
            tone = %tone,
            text_chars = request.text.chars().count(),
            max_length = ?request.max_length,
            "Refining text"
        );

        let prompt = prompts::refine_prompt(&request.text, &tone, request.max_length);
        let reply = self.generator.generate(&prompt).await?;
        let parsed = parser::parse_refinement(&reply);

        debug!(
            improvements = parsed.improvements.len(),
            refined_chars = parsed.refined_text.chars().count(),
            "Parsed refinement reply"
        );

        Ok(RefinedTextResponse {
            original_text: request.text,
            refined_text: parsed.refined_text,
            tone,
            improvements_made: parsed.improvements,
        })
    }

    /// Suggest titles for `request.text` and pick a primary one
    pub async fn generate_titles(&self, request: GenerateTitleRequest) -> Result<TitleResponse> {
        validate_text(&request.text)?;

        info!(text_chars = request.text.chars().count(), "Generating titles");

        let prompt = prompts::title_prompt(&request.text);
        let reply = self.generator.generate(&prompt).await?;
        let parsed = parser::parse_titles(&reply);

        debug!(titles = parsed.suggested_titles.len(), "Parsed title reply");

        Ok(TitleResponse {
            original_text: request.text,
            suggested_titles: parsed.suggested_titles,
            primary_title: parsed.primary_title,
        })
    }

    pub fn health(&self) -> HealthResponse {
        let (status, gemini_api, error) = match self.generator.check() {
            Ok(()) => (HealthStatus::Healthy, Some("connected".to_string()), None),
            Err(e) => (HealthStatus::Unhealthy, None, Some(e.to_string())),
        };

        HealthResponse {
            status,
            gemini_api,
            error,
            model: self.generator.model().to_string(),
            timestamp: Utc::now().to_rfc3339(),
        }
    }
}

fn validate_text(text: &str) -> Result<()> {
    if text.trim().is_empty() {
        return Err(RefinerError::ValidationError("text must not be empty".to_string()));
    }
    Ok(())
}

fn resolve_tone(tone: Option<&str>) -> String {
    match tone.map(str::trim) {
        Some(t) if !t.is_empty() => t.to_string(),
        _ => prompts::DEFAULT_TONE.to_string(),
    }
}
