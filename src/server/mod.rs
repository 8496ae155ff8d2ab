//! HTTP ingress: upload validation, health and debug endpoints.

pub mod error;
pub mod handlers;
pub mod state;

pub use error::{ApiError, ErrorResponse};
pub use handlers::SuccessResponse;
pub use state::AppState;

use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderValue, Method};
use axum::routing::{get, post};
use axum::Router;
use log::{error, info, warn};
use tower_http::cors::{Any, CorsLayer};

use crate::config::ServerConfig;

/// Room for multipart boundaries and headers on top of the file itself
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Returns the [`Router`] of this application.
pub fn router(state: AppState) -> Router {
    let body_limit = state.config.upload.max_file_size_bytes() + MULTIPART_OVERHEAD;

    let mut router = Router::new()
        .route("/health", get(handlers::health))
        .route("/analyze", post(handlers::analyze_image));

    if state.debug() {
        router = router
            .route("/debug/config", get(handlers::debug_config))
            .route("/debug/test-model", post(handlers::debug_test_model));
    }

    router
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(cors_layer(&state.config.server))
        .with_state(state)
}

fn cors_layer(server: &ServerConfig) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(Any);

    if server.allowed_origins.iter().any(|origin| origin == "*") {
        return cors.allow_origin(Any);
    }

    let origins = server
        .allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect::<Vec<HeaderValue>>();

    cors.allow_origin(origins)
}

/// Bind the configured address and serve until Ctrl-C.
pub async fn serve(state: AppState) -> std::io::Result<()> {
    let address = format!("{}:{}", state.config.server.host, state.config.server.port);
    info!("Starting AI Recipes Backend...");
    info!(
        "Environment: {}",
        if state.debug() { "Development" } else { "Production" }
    );
    info!("Allowed origins: {:?}", state.config.server.allowed_origins);
    info!(
        "Using provider {} with model {}",
        state.analyzer.provider_name(),
        state.analyzer.model()
    );

    let listener = tokio::net::TcpListener::bind(&address).await?;
    info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
    }
    info!("Shutting down AI Recipes Backend...");
}
