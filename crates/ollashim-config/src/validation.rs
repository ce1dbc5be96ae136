// SPDX-FileCopyrightText: 2026 Ollashim Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Semantic checks run after deserialization.

use crate::diagnostic::ConfigError;
use crate::model::ShimConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration.
///
/// Collects every problem instead of stopping at the first one.
pub fn validate_config(config: &ShimConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();
    let mut fail = |message: String| errors.push(ConfigError::Validation { message });

    let base_url = config.ollama.base_url.trim();
    if base_url.is_empty() {
        fail("ollama.base_url must not be empty".to_string());
    } else if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
        fail(format!(
            "ollama.base_url `{base_url}` must start with http:// or https://"
        ));
    }

    if config.ollama.default_model.trim().is_empty() {
        fail("ollama.default_model must not be empty".to_string());
    }

    for (key, secs) in [
        ("connect_timeout_secs", config.ollama.connect_timeout_secs),
        ("request_timeout_secs", config.ollama.request_timeout_secs),
        ("health_timeout_secs", config.ollama.health_timeout_secs),
    ] {
        if secs == 0 {
            fail(format!("ollama.{key} must be greater than 0"));
        }
    }

    let mut unmapped: Vec<&String> = config
        .model_mapping
        .iter()
        .filter(|(_, target)| target.trim().is_empty())
        .map(|(name, _)| name)
        .collect();
    unmapped.sort();
    for name in unmapped {
        fail(format!("model_mapping.\"{name}\" must name a backend model"));
    }

    if config.server.host.trim().is_empty() {
        fail("server.host must not be empty".to_string());
    }

    let level = config.logging.level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        fail(format!(
            "logging.level `{}` is not one of {}",
            config.logging.level,
            LOG_LEVELS.join(", ")
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
