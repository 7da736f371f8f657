//! REST API module
//!
//! - HTTP server and routing
//! - Request handlers and JSON models
//! - Trace ID and security header middleware

pub mod server;
pub mod routes;
pub mod middleware;
pub mod handlers;
pub mod models;

pub use server::{build_router, ApiServer};
pub use middleware::{trace_id_middleware, TraceId, TRACE_ID_HEADER};
