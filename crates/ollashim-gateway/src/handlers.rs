// SPDX-FileCopyrightText: 2026 Ollashim Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers.
//!
//! Handles GET /, GET /health, GET /v1/models, POST /v1/chat/completions.

use axum::{
    extract::{rejection::JsonRejection, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use ollashim_core::{ChatCompletionRequest, Completion, HealthReport, ModelList};
use serde::Serialize;

use crate::error::ApiError;
use crate::server::GatewayState;
use crate::sse;

/// Response body for GET /.
#[derive(Debug, Serialize)]
pub struct ServiceInfo {
    pub service: String,
    pub version: String,
    pub ollama_enabled: bool,
}

/// GET /
pub async fn get_root(State(state): State<GatewayState>) -> Json<ServiceInfo> {
    Json(ServiceInfo {
        service: "ollashim".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        ollama_enabled: state.adapter.enabled(),
    })
}

/// GET /health
///
/// Always 200; an unreachable backend is reported in the body.
pub async fn get_health(State(state): State<GatewayState>) -> Json<HealthReport> {
    Json(state.adapter.health_check().await)
}

/// GET /v1/models
pub async fn get_models(State(state): State<GatewayState>) -> Result<Json<ModelList>, ApiError> {
    Ok(Json(state.adapter.list_models().await?))
}

/// POST /v1/chat/completions
///
/// Returns a `chat.completion` object, or an SSE stream of
/// `chat.completion.chunk` objects when the request sets `stream`.
pub async fn post_chat_completions(
    State(state): State<GatewayState>,
    payload: Result<Json<ChatCompletionRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(request) = payload?;
    tracing::debug!(
        model = request.model.as_deref().unwrap_or("<default>"),
        stream = request.stream,
        messages = request.messages.len(),
        "chat completion requested"
    );

    match state.adapter.create(request).await? {
        Completion::Full(response) => Ok(Json(response).into_response()),
        Completion::Stream(chunks) => Ok(sse::chunk_events(chunks).into_response()),
    }
}

/// Rejects `/v1/*` calls with 503 while the backend is disabled.
pub async fn require_enabled(
    State(state): State<GatewayState>,
    request: Request,
    next: Next,
) -> Response {
    if state.adapter.enabled() {
        next.run(request).await
    } else {
        ApiError::disabled().into_response()
    }
}
