// SPDX-FileCopyrightText: 2026 Ollashim Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! OpenAI-compatible value types produced by the adapter.
//!
//! Every value here is built fresh per call and handed to the caller; nothing
//! is cached or shared between requests.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::tokens::estimate_tokens;

/// `object` tag of a non-streaming completion.
pub const CHAT_COMPLETION_OBJECT: &str = "chat.completion";
/// `object` tag of a streamed completion chunk.
pub const CHAT_COMPLETION_CHUNK_OBJECT: &str = "chat.completion.chunk";
/// `object` tag of a model list.
pub const LIST_OBJECT: &str = "list";
/// `object` tag of a single model descriptor.
pub const MODEL_OBJECT: &str = "model";

/// Author of a chat message.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// A single role/content pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }
}

/// Terminal state of a choice. The backend only ever finishes with `stop`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum FinishReason {
    Stop,
}

/// One choice of a non-streaming completion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatCompletionChoice {
    pub index: u32,
    pub message: ChatMessage,
    pub finish_reason: FinishReason,
}

/// Approximate token accounting.
///
/// Counts come from [`estimate_tokens`], not a tokenizer, so they are only an
/// approximation of what the backend actually consumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageStats {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

impl UsageStats {
    /// Builds usage from explicit counts; `total_tokens` is always their sum.
    pub fn new(prompt_tokens: u32, completion_tokens: u32) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens.saturating_add(completion_tokens),
        }
    }

    /// Estimates usage from the prompt messages and the completion text.
    ///
    /// The prompt is the message contents joined by a single space.
    pub fn estimate(prompt: &[ChatMessage], completion: &str) -> Self {
        let prompt_text = prompt
            .iter()
            .map(|m| m.content.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        Self::new(estimate_tokens(&prompt_text), estimate_tokens(completion))
    }
}

/// A complete (non-streaming) chat completion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatCompletionResponse {
    pub id: String,
    pub object: String,
    pub created: i64,
    pub model: String,
    pub choices: Vec<ChatCompletionChoice>,
    pub usage: UsageStats,
}

impl ChatCompletionResponse {
    /// Wraps a single assistant message into a finished completion.
    pub fn single(id: String, model: String, message: ChatMessage, usage: UsageStats) -> Self {
        Self {
            id,
            object: CHAT_COMPLETION_OBJECT.to_string(),
            created: unix_now(),
            model,
            choices: vec![ChatCompletionChoice {
                index: 0,
                message,
                finish_reason: FinishReason::Stop,
            }],
            usage,
        }
    }

    /// Content of the first choice, if any.
    pub fn content(&self) -> Option<&str> {
        self.choices.first().map(|c| c.message.content.as_str())
    }
}

/// Incremental content carried by a chunk. Serializes as `{}` when empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkDelta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl ChunkDelta {
    pub fn is_empty(&self) -> bool {
        self.role.is_none() && self.content.is_none()
    }
}

/// The partial choice inside a [`StreamChunk`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkChoice {
    pub index: u32,
    pub delta: ChunkDelta,
    pub finish_reason: Option<FinishReason>,
}

/// One incremental unit of a streamed completion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamChunk {
    pub id: String,
    pub object: String,
    pub created: i64,
    pub model: String,
    pub choices: Vec<ChunkChoice>,
}

impl StreamChunk {
    /// A chunk with no choices, for backend lines that carry no content.
    pub fn empty(id: &str, model: &str) -> Self {
        Self {
            id: id.to_string(),
            object: CHAT_COMPLETION_CHUNK_OBJECT.to_string(),
            created: unix_now(),
            model: model.to_string(),
            choices: Vec::new(),
        }
    }

    /// A chunk carrying an assistant content delta.
    pub fn content(id: &str, model: &str, content: impl Into<String>) -> Self {
        let mut chunk = Self::empty(id, model);
        chunk.choices.push(ChunkChoice {
            index: 0,
            delta: ChunkDelta {
                role: Some(Role::Assistant),
                content: Some(content.into()),
            },
            finish_reason: None,
        });
        chunk
    }

    /// The terminal chunk: empty delta, `finish_reason = "stop"`.
    pub fn finished(id: &str, model: &str) -> Self {
        let mut chunk = Self::empty(id, model);
        chunk.choices.push(ChunkChoice {
            index: 0,
            delta: ChunkDelta::default(),
            finish_reason: Some(FinishReason::Stop),
        });
        chunk
    }

    /// Content delta of the first choice, if any.
    pub fn delta_content(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|c| c.delta.content.as_deref())
    }

    /// True for the terminal chunk of a stream.
    pub fn is_final(&self) -> bool {
        self.choices
            .first()
            .is_some_and(|c| c.finish_reason.is_some())
    }
}

/// OpenAI-style descriptor of one backend model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelDescriptor {
    pub id: String,
    pub object: String,
    pub created: i64,
    pub owned_by: String,
    pub permission: Vec<serde_json::Value>,
    pub root: String,
    pub parent: Option<String>,
}

impl ModelDescriptor {
    pub fn new(name: &str, created: i64, owned_by: &str) -> Self {
        Self {
            id: name.to_string(),
            object: MODEL_OBJECT.to_string(),
            created,
            owned_by: owned_by.to_string(),
            permission: Vec::new(),
            root: name.to_string(),
            parent: None,
        }
    }
}

/// Response of the model-listing operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelList {
    pub object: String,
    pub data: Vec<ModelDescriptor>,
}

impl ModelList {
    pub fn new(data: Vec<ModelDescriptor>) -> Self {
        Self {
            object: LIST_OBJECT.to_string(),
            data,
        }
    }
}

/// Overall verdict of a health probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum HealthState {
    Healthy,
    Unhealthy,
}

/// Result of probing the backend. Produced even when the probe fails.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthReport {
    pub status: HealthState,
    pub backend_available: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub models_count: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl HealthReport {
    pub fn healthy(models_count: usize) -> Self {
        Self {
            status: HealthState::Healthy,
            backend_available: true,
            models_count: Some(models_count),
            error: None,
        }
    }

    pub fn unhealthy(error: impl Into<String>) -> Self {
        Self {
            status: HealthState::Unhealthy,
            backend_available: false,
            models_count: None,
            error: Some(error.into()),
        }
    }

    pub fn is_healthy(&self) -> bool {
        self.status == HealthState::Healthy
    }
}

/// Generates a fresh completion id (`chatcmpl-<32 hex>`).
pub fn new_completion_id() -> String {
    format!("chatcmpl-{}", uuid::Uuid::new_v4().simple())
}

/// Current time as unix seconds.
pub fn unix_now() -> i64 {
    chrono::Utc::now().timestamp()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_serializes_lowercase() {
        let json = serde_json::to_string(&Role::Assistant).unwrap();
        assert_eq!(json, "\"assistant\"");
        assert_eq!("system".parse::<Role>().unwrap(), Role::System);
        assert!("tool".parse::<Role>().is_err());
    }

    #[test]
    fn chat_message_rejects_extra_fields() {
        let json = r#"{"role":"user","content":"hi","name":"bob"}"#;
        assert!(serde_json::from_str::<ChatMessage>(json).is_err());
    }

    #[test]
    fn usage_total_is_sum() {
        let usage = UsageStats::new(7, 3);
        assert_eq!(usage.total_tokens, 10);
    }

    #[test]
    fn usage_estimate_joins_prompt_with_spaces() {
        // "abcd" + " " + "efgh" = 9 chars -> 2 tokens.
        let prompt = vec![ChatMessage::system("abcd"), ChatMessage::user("efgh")];
        let usage = UsageStats::estimate(&prompt, "Hello World");
        assert_eq!(usage.prompt_tokens, 2);
        assert_eq!(usage.completion_tokens, 2);
        assert_eq!(usage.total_tokens, 4);
    }

    #[test]
    fn final_chunk_has_empty_delta() {
        let chunk = StreamChunk::finished("chatcmpl-1", "qwen3:8b");
        let json = serde_json::to_value(&chunk).unwrap();
        assert_eq!(json["object"], "chat.completion.chunk");
        assert_eq!(json["choices"][0]["delta"], serde_json::json!({}));
        assert_eq!(json["choices"][0]["finish_reason"], "stop");
        assert!(chunk.is_final());
        assert!(chunk.choices[0].delta.is_empty());
    }

    #[test]
    fn content_chunk_serializes_null_finish_reason() {
        let chunk = StreamChunk::content("chatcmpl-1", "qwen3:8b", "Hel");
        let json = serde_json::to_value(&chunk).unwrap();
        assert_eq!(json["choices"][0]["delta"]["role"], "assistant");
        assert_eq!(json["choices"][0]["delta"]["content"], "Hel");
        assert!(json["choices"][0]["finish_reason"].is_null());
        assert!(!chunk.is_final());
    }

    #[test]
    fn health_report_uses_camel_case() {
        let json = serde_json::to_value(HealthReport::healthy(3)).unwrap();
        assert_eq!(json["status"], "healthy");
        assert_eq!(json["backendAvailable"], true);
        assert_eq!(json["modelsCount"], 3);
        assert!(json.get("error").is_none());

        let json = serde_json::to_value(HealthReport::unhealthy("connection refused")).unwrap();
        assert_eq!(json["status"], "unhealthy");
        assert_eq!(json["backendAvailable"], false);
        assert_eq!(json["error"], "connection refused");
    }

    #[test]
    fn completion_ids_are_unique() {
        let a = new_completion_id();
        let b = new_completion_id();
        assert!(a.starts_with("chatcmpl-"));
        assert_ne!(a, b);
    }

    #[test]
    fn model_descriptor_shape() {
        let json = serde_json::to_value(ModelDescriptor::new("qwen3:8b", 1_700_000_000, "ollama"))
            .unwrap();
        assert_eq!(json["id"], "qwen3:8b");
        assert_eq!(json["object"], "model");
        assert_eq!(json["root"], "qwen3:8b");
        assert_eq!(json["permission"], serde_json::json!([]));
        assert!(json["parent"].is_null());
    }
}
