//! Text Refiner
//!
//! HTTP service that forwards user text to a Gemini model and reshapes the
//! reply into structured JSON: a refined rewrite with a list of improvements,
//! or a set of title suggestions with a primary pick.

pub mod api;
pub mod core;
pub mod llm;

// Re-export commonly used types
pub use api::ApiServer;
pub use crate::core::{Config, RefinementService, RefinerError};
pub use llm::{GeminiClient, TextGenerator};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
