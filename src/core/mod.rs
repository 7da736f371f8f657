//! Core application module
//!
//! - Configuration management
//! - Structured logging system
//! - Error handling and type system
//! - Prompt templates and model reply parsing
//! - Refinement service used by the HTTP handlers

pub mod config;
pub mod logging;
pub mod error;
pub mod prompts;
pub mod parser;
pub mod services;

pub use config::Config;
pub use logging::Logger;
pub use error::{RefinerError, ErrorResponse, Result, ErrorContext};
pub use parser::{ParsedRefinement, ParsedTitles};
pub use services::RefinementService;
