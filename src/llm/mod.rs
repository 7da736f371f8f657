//! Language model access
//!
//! Handlers and services talk to the model through [`TextGenerator`] so the
//! HTTP client can be swapped out in tests.

pub mod gemini;

pub use gemini::GeminiClient;

use crate::core::error::Result;
use async_trait::async_trait;

/// A text-in, text-out language model
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Model identifier, used in logs and health output
    fn model(&self) -> &str;

    /// Check that the generator is usable (credentials present) without network I/O
    fn check(&self) -> Result<()>;

    /// Send a single prompt and return the model's reply text
    async fn generate(&self, prompt: &str) -> Result<String>;
}
