// SPDX-FileCopyrightText: 2026 Ollashim Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The OpenAI-compatible surface every backend adapter implements.

use async_trait::async_trait;

use crate::error::ShimError;
use crate::request::ChatCompletionRequest;
use crate::stream::ChunkStream;
use crate::types::{ChatCompletionResponse, HealthReport, ModelList};

/// Result of [`CompletionAdapter::create`]: a full answer or a chunk stream.
#[derive(Debug)]
pub enum Completion {
    Full(ChatCompletionResponse),
    Stream(ChunkStream),
}

/// Translates OpenAI-style calls to a backend and back.
///
/// Implementations hold a shared HTTP connection pool and are otherwise
/// stateless, so one instance can serve concurrent callers.
#[async_trait]
pub trait CompletionAdapter: Send + Sync + 'static {
    /// Short backend name, reported as `owned_by` in model listings.
    fn name(&self) -> &str;

    /// Whether the backend is enabled by configuration.
    fn enabled(&self) -> bool {
        true
    }

    /// Sends a request and waits for the whole answer.
    async fn complete(
        &self,
        request: ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, ShimError>;

    /// Sends a request and returns the answer as a lazy chunk stream.
    async fn stream(&self, request: ChatCompletionRequest) -> Result<ChunkStream, ShimError>;

    /// Lists the backend's models in OpenAI form.
    async fn list_models(&self) -> Result<ModelList, ShimError>;

    /// Probes the backend. Never fails; problems are reported in the result.
    async fn health_check(&self) -> HealthReport;

    /// Dispatches on `request.stream`.
    async fn create(&self, request: ChatCompletionRequest) -> Result<Completion, ShimError> {
        if request.stream {
            self.stream(request).await.map(Completion::Stream)
        } else {
            self.complete(request).await.map(Completion::Full)
        }
    }
}
