// SPDX-FileCopyrightText: 2026 Ollashim Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for configuration loading and validation.

use ollashim_config::diagnostic::ConfigError;
use ollashim_config::{load_and_validate_str, load_config_from_str, ShimConfig};

/// Every known key deserializes into the model.
#[test]
fn full_toml_deserializes() {
    let toml = r#"
[logging]
level = "debug"

[ollama]
base_url = "http://10.0.0.5:11434"
default_model = "llama3.1:8b"
enabled = false
connect_timeout_secs = 3
request_timeout_secs = 60
health_timeout_secs = 2

[model_mapping]
"gpt-4o-mini" = "llama3.2:3b"

[server]
host = "0.0.0.0"
port = 9090
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.logging.level, "debug");
    assert_eq!(config.ollama.base_url, "http://10.0.0.5:11434");
    assert_eq!(config.ollama.default_model, "llama3.1:8b");
    assert!(!config.ollama.enabled);
    assert_eq!(config.ollama.connect_timeout_secs, 3);
    assert_eq!(config.ollama.request_timeout_secs, 60);
    assert_eq!(config.ollama.health_timeout_secs, 2);
    assert_eq!(config.server.host, "0.0.0.0");
    assert_eq!(config.server.port, 9090);
    assert_eq!(
        config.model_mapping.get("gpt-4o-mini").map(String::as_str),
        Some("llama3.2:3b")
    );
}

/// An empty file yields the compiled defaults.
#[test]
fn empty_toml_uses_defaults() {
    let config = load_config_from_str("").expect("empty TOML should load");
    assert_eq!(config.ollama.base_url, "http://localhost:11434");
    assert_eq!(config.ollama.default_model, "qwen3:8b");
    assert!(config.ollama.enabled);
    assert_eq!(config.ollama.request_timeout_secs, 120);
    assert_eq!(config.ollama.health_timeout_secs, 5);
    assert_eq!(config.server.port, 8001);
    assert_eq!(config.model_mapping.len(), 4);
}

/// A `[model_mapping]` table adds to the default entries instead of replacing them.
#[test]
fn model_mapping_merges_with_defaults() {
    let toml = r#"
[model_mapping]
"gpt-4.1" = "qwen3:14b"
"#;
    let config = load_config_from_str(toml).unwrap();
    let map = config.model_map();
    assert_eq!(map.resolve(Some("gpt-4.1")), "qwen3:14b");
    assert_eq!(map.resolve(Some("gpt-4o-mini")), "qwen3:8b");
    assert_eq!(map.resolve(Some("unknown")), "qwen3:8b");
}

/// The default mapping follows the default model.
#[test]
fn default_mapping_resolves_openai_names() {
    let map = ShimConfig::default().model_map();
    for name in ["gpt-4o-mini", "gpt-4-turbo-preview", "gpt-4o", "gpt-3.5-turbo"] {
        assert_eq!(map.resolve(Some(name)), "qwen3:8b");
    }
}

/// A misspelled key is rejected with a suggestion.
#[test]
fn unknown_key_is_rejected_with_suggestion() {
    let toml = r#"
[ollama]
base_ulr = "http://localhost:11434"
"#;

    let errors = load_and_validate_str(toml).expect_err("typo should be rejected");
    let found = errors.iter().any(|e| {
        matches!(
            e,
            ConfigError::UnknownKey { key, suggestion, .. }
                if key == "base_ulr" && suggestion.as_deref() == Some("base_url")
        )
    });
    assert!(found, "expected UnknownKey with suggestion, got: {errors:?}");
}

/// Unknown top-level sections are rejected too.
#[test]
fn unknown_section_is_rejected() {
    let toml = r#"
[openai]
api_key = "sk-123"
"#;
    assert!(load_config_from_str(toml).is_err());
}

/// A wrongly typed value is reported as InvalidType.
#[test]
fn wrong_type_is_reported() {
    let toml = r#"
[server]
port = "eighty"
"#;
    let errors = load_and_validate_str(toml).expect_err("string port should fail");
    assert!(
        errors
            .iter()
            .any(|e| matches!(e, ConfigError::InvalidType { key, .. } if key.contains("port"))),
        "got: {errors:?}"
    );
}

/// Semantic validation runs after a successful load.
#[test]
fn validation_runs_after_load() {
    let toml = r#"
[ollama]
base_url = "ftp://localhost"
"#;
    let errors = load_and_validate_str(toml).expect_err("ftp scheme should fail");
    assert!(errors.iter().any(
        |e| matches!(e, ConfigError::Validation { message } if message.contains("base_url"))
    ));
}

/// Diagnostics render through miette without panicking.
#[test]
fn errors_render() {
    let errors = load_and_validate_str("[server]\nprot = 1\n").unwrap_err();
    ollashim_config::render_errors(&errors);
}

/// The defaults written out as TOML are themselves a valid config file.
#[test]
fn rendered_defaults_load_back() {
    let rendered = toml::to_string(&ShimConfig::default()).expect("defaults serialize");
    assert!(rendered.contains("[ollama]"));
    let config = load_and_validate_str(&rendered).expect("rendered defaults should load");
    assert_eq!(config.ollama.base_url, "http://localhost:11434");
    assert_eq!(config.model_mapping, ShimConfig::default().model_mapping);
}
