//! HTTP Server implementation
//!
//! Axum server with:
//! - Configurable host/port binding
//! - Graceful shutdown handling
//! - Request timeouts
//! - CORS, security headers and per-request trace IDs

use crate::api::handlers::AppState;
use crate::api::middleware::{security_headers_middleware, trace_id_middleware, SecurityHeadersConfig};
use crate::api::routes::build_api_routes;
use crate::core::config::ServerConfig;
use crate::core::services::RefinementService;
use crate::core::Config;
use crate::llm::TextGenerator;
use axum::{middleware, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};
use tracing::info;

/// HTTP API Server
pub struct ApiServer {
    router: Router,
    config: ServerConfig,
}

impl ApiServer {
    /// Create a new API server backed by `generator`
    pub fn new(config: Config, generator: Arc<dyn TextGenerator>) -> anyhow::Result<Self> {
        let router = build_router(&config, generator);

        Ok(Self {
            router,
            config: config.server,
        })
    }

    /// Start the HTTP server and block until it shuts down gracefully
    pub async fn serve(self) -> anyhow::Result<()> {
        let addr = format!("{}:{}", self.config.host, self.config.port);
        let socket_addr: SocketAddr = addr.parse()?;

        info!(
            host = %self.config.host,
            port = self.config.port,
            request_timeout = self.config.request_timeout,
            "Starting HTTP server"
        );

        let listener = tokio::net::TcpListener::bind(socket_addr).await?;

        info!(addr = %socket_addr, "HTTP server listening");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        info!("HTTP server shut down gracefully");

        Ok(())
    }
}

/// Build the application router with all routes and middleware
pub fn build_router(config: &Config, generator: Arc<dyn TextGenerator>) -> Router {
    let app_state = AppState {
        service: Arc::new(RefinementService::new(generator)),
    };

    let security_headers_config = SecurityHeadersConfig::new(
        config.security.enable_hsts,
        config.security.hsts_max_age,
    );

    build_api_routes(app_state).layer(
        ServiceBuilder::new()
            .layer(middleware::from_fn_with_state(
                security_headers_config,
                security_headers_middleware,
            ))
            .layer(middleware::from_fn(trace_id_middleware))
            .layer(TraceLayer::new_for_http())
            .layer(build_cors_layer(&config.security.allowed_origins))
            .layer(TimeoutLayer::new(Duration::from_secs(config.server.request_timeout))),
    )
}

/// Build CORS layer from allowed origins configuration
fn build_cors_layer(allowed_origins: &[String]) -> CorsLayer {
    use tower_http::cors::Any;

    let cors = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if allowed_origins.iter().any(|origin| origin == "*") {
        cors.allow_origin(Any)
    } else {
        let origins: Vec<_> = allowed_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();

        cors.allow_origin(origins)
    }
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            info!("Received SIGTERM signal");
        },
    }

    info!("Initiating graceful shutdown...");
}
