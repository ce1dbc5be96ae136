// SPDX-FileCopyrightText: 2026 Ollashim Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.
//!
//! Sets up routes, middleware, and shared state for the gateway.

use std::sync::Arc;

use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use ollashim_config::ServerConfig;
use ollashim_core::{CompletionAdapter, ShimError};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::handlers;

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct GatewayState {
    /// The backend adapter; shared by every request.
    pub adapter: Arc<dyn CompletionAdapter>,
}

impl GatewayState {
    pub fn new(adapter: Arc<dyn CompletionAdapter>) -> Self {
        Self { adapter }
    }
}

/// Builds the gateway router.
///
/// - GET / and GET /health are always served
/// - GET /v1/models and POST /v1/chat/completions return 503 while the
///   backend is disabled
pub fn router(state: GatewayState) -> Router {
    let public_routes = Router::new()
        .route("/", get(handlers::get_root))
        .route("/health", get(handlers::get_health))
        .with_state(state.clone());

    let api_routes = Router::new()
        .route("/v1/models", get(handlers::get_models))
        .route("/v1/chat/completions", post(handlers::post_chat_completions))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            handlers::require_enabled,
        ))
        .with_state(state);

    Router::new()
        .merge(public_routes)
        .merge(api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Start the gateway and serve until Ctrl-C.
pub async fn start_server(config: &ServerConfig, state: GatewayState) -> Result<(), ShimError> {
    let app = router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| ShimError::Config(format!("failed to bind gateway to {addr}: {e}")))?;

    tracing::info!("Gateway server listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ShimError::Config(format!("gateway server error: {e}")))?;

    tracing::info!("Gateway server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
}
