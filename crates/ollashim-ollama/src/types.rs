// SPDX-FileCopyrightText: 2026 Ollashim Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ollama native API wire types.
//!
//! Response types do not deny unknown fields: the backend adds fields
//! (`created_at`, `eval_count`, `thinking`, ...) that the shim ignores.

use std::str::FromStr;

use chrono::NaiveDateTime;
use ollashim_core::{ChatMessage, Role, ShimError};
use serde::{Deserialize, Serialize};

/// Format of the `modified_at` prefix the shim understands.
const MODIFIED_AT_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Body of `POST /api/chat`.
#[derive(Debug, Clone, Serialize)]
pub struct OllamaChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub stream: bool,
    pub think: bool,
    pub options: OllamaOptions,
}

/// Sampling options nested under `options`.
#[derive(Debug, Clone, Serialize)]
pub struct OllamaOptions {
    pub temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_predict: Option<u32>,
}

/// One `/api/chat` response object, or one NDJSON line of a stream.
#[derive(Debug, Clone, Deserialize)]
pub struct OllamaChatResponse {
    #[serde(default)]
    pub message: Option<OllamaMessage>,
    #[serde(default)]
    pub done: bool,
}

/// Assistant message as sent by the backend. Both fields may be absent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OllamaMessage {
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

impl OllamaMessage {
    /// Converts to a [`ChatMessage`]. A missing role means assistant and
    /// missing content means empty; an unknown role is a malformed payload.
    pub fn into_chat_message(self) -> Result<ChatMessage, ShimError> {
        let role = match self.role.as_deref() {
            None | Some("") => Role::Assistant,
            Some(raw) => Role::from_str(raw)
                .map_err(|e| ShimError::malformed(format!("unknown message role `{raw}`"), e))?,
        };
        Ok(ChatMessage::new(role, self.content.unwrap_or_default()))
    }
}

/// Body of `GET /api/tags`. A body without `models` lists nothing.
#[derive(Debug, Clone, Deserialize)]
pub struct OllamaTagsResponse {
    #[serde(default)]
    pub models: Vec<OllamaModel>,
}

/// `GET /api/tags` as read by the health probe: entries are only counted.
#[derive(Debug, Clone, Deserialize)]
pub struct OllamaTagsSummary {
    #[serde(default)]
    pub models: Vec<serde_json::Value>,
}

/// One installed model.
#[derive(Debug, Clone, Deserialize)]
pub struct OllamaModel {
    pub name: String,
    pub modified_at: String,
}

impl OllamaModel {
    /// `modified_at` as unix seconds. Only the `YYYY-MM-DDTHH:MM:SS` prefix
    /// is read and it is taken as UTC.
    pub fn created(&self) -> Result<i64, ShimError> {
        parse_modified_at(&self.modified_at)
    }
}

/// Parses the date prefix of an Ollama `modified_at` timestamp.
pub fn parse_modified_at(raw: &str) -> Result<i64, ShimError> {
    let prefix = raw.get(..19).unwrap_or(raw);
    NaiveDateTime::parse_from_str(prefix, MODIFIED_AT_FORMAT)
        .map(|dt| dt.and_utc().timestamp())
        .map_err(|e| ShimError::malformed(format!("unparseable modified_at `{raw}`"), e))
}
