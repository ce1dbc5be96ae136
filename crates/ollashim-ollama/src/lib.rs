// SPDX-FileCopyrightText: 2026 Ollashim Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ollama backend adapter for ollashim.
//!
//! This crate implements [`CompletionAdapter`] against the Ollama native API
//! (`/api/chat`, `/api/tags`), translating OpenAI-style requests into Ollama
//! bodies and Ollama replies, including NDJSON streams, back into OpenAI form.

pub mod client;
pub mod ndjson;
pub mod types;

use async_trait::async_trait;
use ollashim_config::ShimConfig;
use ollashim_core::types::new_completion_id;
use ollashim_core::{
    ChatCompletionRequest, ChatCompletionResponse, ChunkStream, CompletionAdapter, HealthReport,
    ModelDescriptor, ModelList, ModelMap, ShimError, UsageStats,
};
use tracing::{debug, info, warn};

use crate::client::OllamaClient;
use crate::types::{OllamaChatRequest, OllamaOptions};

/// Name reported as `owned_by` for every listed model.
pub const OWNER: &str = "ollama";

/// Ollama adapter implementing [`CompletionAdapter`].
///
/// Holds the shared connection pool and the model mapping. Nothing else is
/// kept between calls, so one instance can be shared behind an `Arc`.
pub struct OllamaAdapter {
    client: OllamaClient,
    models: ModelMap,
    enabled: bool,
}

impl OllamaAdapter {
    /// Creates an adapter from the loaded configuration.
    pub fn new(config: &ShimConfig) -> Result<Self, ShimError> {
        let client = OllamaClient::new(&config.ollama)?;
        info!(
            base_url = client.base_url(),
            default_model = config.ollama.default_model,
            enabled = config.ollama.enabled,
            "Ollama adapter initialized"
        );
        Ok(Self {
            client,
            models: config.model_map(),
            enabled: config.ollama.enabled,
        })
    }

    pub fn models(&self) -> &ModelMap {
        &self.models
    }

    /// Builds the `/api/chat` body for `request` against backend `model`.
    fn to_chat_request(
        &self,
        request: &ChatCompletionRequest,
        model: &str,
        stream: bool,
    ) -> OllamaChatRequest {
        OllamaChatRequest {
            model: model.to_string(),
            messages: request.messages.clone(),
            stream,
            think: request.think,
            options: OllamaOptions {
                temperature: request.temperature,
                num_predict: request.num_predict(),
            },
        }
    }
}

#[async_trait]
impl CompletionAdapter for OllamaAdapter {
    fn name(&self) -> &str {
        OWNER
    }

    fn enabled(&self) -> bool {
        self.enabled
    }

    async fn complete(
        &self,
        request: ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, ShimError> {
        request.validate()?;
        let model = self.models.resolve(request.model.as_deref()).to_string();
        let body = self.to_chat_request(&request, &model, false);
        debug!(model = %model, messages = body.messages.len(), "sending chat request");

        let response = self.client.chat(&body).await?;
        let message = response.message.unwrap_or_default().into_chat_message()?;
        let usage = UsageStats::estimate(&request.messages, &message.content);

        Ok(ChatCompletionResponse::single(
            new_completion_id(),
            model,
            message,
            usage,
        ))
    }

    async fn stream(&self, request: ChatCompletionRequest) -> Result<ChunkStream, ShimError> {
        request.validate()?;
        let model = self.models.resolve(request.model.as_deref()).to_string();
        let body = self.to_chat_request(&request, &model, true);
        debug!(model = %model, messages = body.messages.len(), "sending streaming chat request");

        let response = self.client.chat_stream(&body).await?;
        let id = new_completion_id();
        let chunks = ndjson::decode_chat_stream(response.bytes_stream(), id.clone(), model);
        Ok(ChunkStream::new(id, chunks))
    }

    async fn list_models(&self) -> Result<ModelList, ShimError> {
        let tags = self.client.tags().await?;
        let data = tags
            .models
            .iter()
            .map(|m| Ok(ModelDescriptor::new(&m.name, m.created()?, OWNER)))
            .collect::<Result<Vec<_>, ShimError>>()?;
        debug!(count = data.len(), "listed backend models");
        Ok(ModelList::new(data))
    }

    async fn health_check(&self) -> HealthReport {
        match self.client.probe().await {
            Ok(tags) => HealthReport::healthy(tags.models.len()),
            Err(e) => {
                warn!(error = %e, "backend health probe failed");
                HealthReport::unhealthy(e.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ollashim_core::ChatMessage;

    fn adapter() -> OllamaAdapter {
        OllamaAdapter::new(&ShimConfig::default()).unwrap()
    }

    #[test]
    fn chat_request_carries_options() {
        let request = ChatCompletionRequest::new(vec![ChatMessage::user("hi")])
            .temperature(0.4)
            .max_tokens(32)
            .think(true);
        let body = adapter().to_chat_request(&request, "qwen3:8b", true);
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["model"], "qwen3:8b");
        assert_eq!(json["stream"], true);
        assert_eq!(json["think"], true);
        assert_eq!(json["options"]["num_predict"], 32);
        assert!((json["options"]["temperature"].as_f64().unwrap() - 0.4).abs() < 1e-6);
    }

    #[test]
    fn response_format_is_not_forwarded() {
        let mut request = ChatCompletionRequest::new(vec![ChatMessage::user("hi")]);
        request.response_format = Some(serde_json::json!({"type": "json_object"}));
        let body = adapter().to_chat_request(&request, "qwen3:8b", false);
        let json = serde_json::to_value(&body).unwrap();
        assert!(json.get("response_format").is_none());
        assert!(json.get("format").is_none());
    }

    #[test]
    fn adapter_reports_name_and_enabled() {
        let a = adapter();
        assert_eq!(a.name(), "ollama");
        assert!(a.enabled());
        assert_eq!(a.models().default_model(), "qwen3:8b");
    }

    #[tokio::test]
    async fn empty_messages_fail_before_io() {
        let err = adapter()
            .complete(ChatCompletionRequest::new(vec![]))
            .await
            .unwrap_err();
        assert!(matches!(err, ShimError::InvalidRequest(_)));
    }
}
