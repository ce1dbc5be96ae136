// SPDX-FileCopyrightText: 2026 Ollashim Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The chat-completion request and the model-name mapping applied to it.
//!
//! Every option the shim understands is a named field of
//! [`ChatCompletionRequest`]. `response_format` is accepted and ignored;
//! any other field fails deserialization.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::ShimError;
use crate::types::ChatMessage;

/// An OpenAI-style chat-completion request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChatCompletionRequest {
    /// Conversation so far. Must not be empty.
    pub messages: Vec<ChatMessage>,

    /// Caller-facing model name, resolved through [`ModelMap`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// Sampling temperature, forwarded verbatim.
    #[serde(default)]
    pub temperature: f32,

    /// Generation cap, forwarded as `num_predict` when non-zero.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,

    /// Stream the answer as chunks.
    #[serde(default)]
    pub stream: bool,

    /// Backend reasoning mode. Off by default to keep latency low.
    #[serde(default)]
    pub think: bool,

    /// Accepted for OpenAI client compatibility; not forwarded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_format: Option<serde_json::Value>,
}

impl ChatCompletionRequest {
    pub fn new(messages: Vec<ChatMessage>) -> Self {
        Self {
            messages,
            model: None,
            temperature: 0.0,
            max_tokens: None,
            stream: false,
            think: false,
            response_format: None,
        }
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn stream(mut self, stream: bool) -> Self {
        self.stream = stream;
        self
    }

    pub fn think(mut self, think: bool) -> Self {
        self.think = think;
        self
    }

    /// Generation cap to forward, if any. Zero means "no cap".
    pub fn num_predict(&self) -> Option<u32> {
        self.max_tokens.filter(|n| *n > 0)
    }

    /// Rejects requests that cannot be sent to the backend.
    pub fn validate(&self) -> Result<(), ShimError> {
        if self.messages.is_empty() {
            return Err(ShimError::InvalidRequest(
                "messages must contain at least one message".into(),
            ));
        }
        if !self.temperature.is_finite() {
            return Err(ShimError::InvalidRequest(format!(
                "temperature must be a finite number, got {}",
                self.temperature
            )));
        }
        Ok(())
    }
}

/// Static mapping from caller-facing model names to backend model names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelMap {
    default_model: String,
    mapping: HashMap<String, String>,
}

impl ModelMap {
    pub fn new(default_model: impl Into<String>, mapping: HashMap<String, String>) -> Self {
        Self {
            default_model: default_model.into(),
            mapping,
        }
    }

    pub fn default_model(&self) -> &str {
        &self.default_model
    }

    /// Mapped name when known; the default model otherwise.
    pub fn resolve(&self, requested: Option<&str>) -> &str {
        requested
            .and_then(|name| self.mapping.get(name))
            .map(String::as_str)
            .unwrap_or(&self.default_model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map() -> ModelMap {
        let mut mapping = HashMap::new();
        mapping.insert("gpt-4o-mini".to_string(), "llama3.2:3b".to_string());
        mapping.insert("gpt-4o".to_string(), "qwen3:14b".to_string());
        ModelMap::new("qwen3:8b", mapping)
    }

    #[test]
    fn mapped_name_resolves_to_backend_model() {
        assert_eq!(map().resolve(Some("gpt-4o-mini")), "llama3.2:3b");
        assert_eq!(map().resolve(Some("gpt-4o")), "qwen3:14b");
    }

    #[test]
    fn unmapped_name_resolves_to_default() {
        assert_eq!(map().resolve(Some("claude-3-opus")), "qwen3:8b");
    }

    #[test]
    fn missing_name_resolves_to_default() {
        assert_eq!(map().resolve(None), "qwen3:8b");
    }

    #[test]
    fn request_defaults_when_deserialized() {
        let json = r#"{"messages":[{"role":"user","content":"hi"}]}"#;
        let req: ChatCompletionRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.temperature, 0.0);
        assert!(!req.stream);
        assert!(!req.think);
        assert!(req.model.is_none());
        assert!(req.max_tokens.is_none());
    }

    #[test]
    fn response_format_is_accepted() {
        let json = r#"{"messages":[{"role":"user","content":"hi"}],"response_format":{"type":"json_object"}}"#;
        let req: ChatCompletionRequest = serde_json::from_str(json).unwrap();
        assert!(req.response_format.is_some());
    }

    #[test]
    fn unknown_option_is_rejected() {
        let json = r#"{"messages":[{"role":"user","content":"hi"}],"top_k":40}"#;
        let err = serde_json::from_str::<ChatCompletionRequest>(json).unwrap_err();
        assert!(err.to_string().contains("top_k"), "got: {err}");
    }

    #[test]
    fn empty_messages_fail_validation() {
        let err = ChatCompletionRequest::new(vec![]).validate().unwrap_err();
        assert!(matches!(err, ShimError::InvalidRequest(_)));
    }

    #[test]
    fn zero_max_tokens_is_not_forwarded() {
        let req = ChatCompletionRequest::new(vec![ChatMessage::user("hi")]).max_tokens(0);
        assert_eq!(req.num_predict(), None);
        let req = req.max_tokens(64);
        assert_eq!(req.num_predict(), Some(64));
    }

    #[test]
    fn builder_sets_every_option() {
        let req = ChatCompletionRequest::new(vec![ChatMessage::user("hi")])
            .model("gpt-4o")
            .temperature(0.7)
            .max_tokens(128)
            .stream(true)
            .think(true);
        assert_eq!(req.model.as_deref(), Some("gpt-4o"));
        assert_eq!(req.temperature, 0.7);
        assert_eq!(req.max_tokens, Some(128));
        assert!(req.stream);
        assert!(req.think);
        assert!(req.validate().is_ok());
    }
}
