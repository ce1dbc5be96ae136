// SPDX-FileCopyrightText: 2026 Ollashim Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration for ollashim.
//!
//! TOML files and environment variables are layered with figment, every
//! section rejects unknown keys, and failures render as miette diagnostics
//! with typo suggestions.
//!
//! ```no_run
//! let config = ollashim_config::load_and_validate().expect("config errors");
//! println!("backend: {}", config.ollama.base_url);
//! ```

pub mod diagnostic;
pub mod loader;
pub mod model;
pub mod validation;

use std::path::Path;

pub use diagnostic::{render_errors, ConfigError};
pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::{LoggingConfig, OllamaConfig, ServerConfig, ShimConfig};

/// Load configuration from the standard lookup paths and validate it.
pub fn load_and_validate() -> Result<ShimConfig, Vec<ConfigError>> {
    finish(loader::load_config(), collect_toml_sources)
}

/// Load configuration from one explicit file (plus env) and validate it.
pub fn load_and_validate_path(path: &Path) -> Result<ShimConfig, Vec<ConfigError>> {
    finish(loader::load_config_from_path(path), || {
        read_source(path).into_iter().collect()
    })
}

/// Load configuration from a TOML string and validate it.
pub fn load_and_validate_str(toml_content: &str) -> Result<ShimConfig, Vec<ConfigError>> {
    finish(loader::load_config_from_str(toml_content), || {
        vec![("<inline>".to_string(), toml_content.to_string())]
    })
}

/// Validates a loaded config, or converts the figment error into diagnostics
/// using the sources returned by `sources`.
fn finish(
    loaded: Result<ShimConfig, figment::Error>,
    sources: impl FnOnce() -> Vec<(String, String)>,
) -> Result<ShimConfig, Vec<ConfigError>> {
    match loaded {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => Err(diagnostic::figment_to_config_errors(err, &sources())),
    }
}

/// Contents of every config file that exists, keyed by the path figment reports.
fn collect_toml_sources() -> Vec<(String, String)> {
    loader::config_search_paths()
        .iter()
        .filter_map(|path| read_source(path))
        .collect()
}

fn read_source(path: &Path) -> Option<(String, String)> {
    let content = std::fs::read_to_string(path).ok()?;
    let display = if path.is_relative() {
        std::env::current_dir()
            .map(|d| d.join(path).display().to_string())
            .unwrap_or_else(|_| path.display().to_string())
    } else {
        path.display().to_string()
    };
    Some((display, content))
}
