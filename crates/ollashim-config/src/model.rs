// SPDX-FileCopyrightText: 2026 Ollashim Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs.
//!
//! Every section uses `#[serde(deny_unknown_fields)]` so a misspelled key is
//! reported at startup instead of being ignored.

use std::collections::HashMap;
use std::time::Duration;

use ollashim_core::ModelMap;
use serde::{Deserialize, Serialize};

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ShimConfig {
    /// Log output settings.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Ollama backend settings.
    #[serde(default)]
    pub ollama: OllamaConfig,

    /// Caller-facing model name -> backend model name.
    #[serde(default = "default_model_mapping")]
    pub model_mapping: HashMap<String, String>,

    /// OpenAI-compatible HTTP gateway settings.
    #[serde(default)]
    pub server: ServerConfig,
}

impl Default for ShimConfig {
    fn default() -> Self {
        Self {
            logging: LoggingConfig::default(),
            ollama: OllamaConfig::default(),
            model_mapping: default_model_mapping(),
            server: ServerConfig::default(),
        }
    }
}

impl ShimConfig {
    /// Model resolver built from `ollama.default_model` and `model_mapping`.
    pub fn model_map(&self) -> ModelMap {
        ModelMap::new(self.ollama.default_model.clone(), self.model_mapping.clone())
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// trace, debug, info, warn or error.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Ollama backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct OllamaConfig {
    /// Base URL of the Ollama server, without the `/api` suffix.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Backend model used when the caller names none or an unmapped one.
    #[serde(default = "default_model")]
    pub default_model: String,

    /// When false, the gateway refuses chat and model requests.
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// TCP connect timeout for every backend request.
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    /// Total deadline for non-streaming calls; idle read timeout for streams.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Deadline for health probes.
    #[serde(default = "default_health_timeout_secs")]
    pub health_timeout_secs: u64,
}

impl OllamaConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn health_timeout(&self) -> Duration {
        Duration::from_secs(self.health_timeout_secs)
    }
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            default_model: default_model(),
            enabled: default_enabled(),
            connect_timeout_secs: default_connect_timeout_secs(),
            request_timeout_secs: default_request_timeout_secs(),
            health_timeout_secs: default_health_timeout_secs(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:11434".to_string()
}

fn default_model() -> String {
    "qwen3:8b".to_string()
}

fn default_enabled() -> bool {
    true
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_request_timeout_secs() -> u64 {
    120
}

fn default_health_timeout_secs() -> u64 {
    5
}

fn default_model_mapping() -> HashMap<String, String> {
    ["gpt-4o-mini", "gpt-4-turbo-preview", "gpt-4o", "gpt-3.5-turbo"]
        .into_iter()
        .map(|name| (name.to_string(), default_model()))
        .collect()
}

/// Gateway bind settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8001
}
