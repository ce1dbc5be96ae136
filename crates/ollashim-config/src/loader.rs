// SPDX-FileCopyrightText: 2026 Ollashim Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Figment-based layered config loading.
//!
//! Lookup: `./ollashim.toml` > `~/.config/ollashim/ollashim.toml` >
//! `/etc/ollashim/ollashim.toml`, then the legacy `OLLAMA_BASE_URL`,
//! `OLLAMA_DEFAULT_MODEL` and `USE_OLLAMA` variables, then `OLLASHIM_*`.

#![allow(clippy::result_large_err)] // figment::Error is external

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::ShimConfig;

/// Config file name searched in each lookup directory.
pub const CONFIG_FILE_NAME: &str = "ollashim.toml";

const SYSTEM_CONFIG_PATH: &str = "/etc/ollashim/ollashim.toml";

/// Load configuration from the standard lookup paths with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/ollashim/ollashim.toml`
/// 3. `~/.config/ollashim/ollashim.toml`
/// 4. `./ollashim.toml`
/// 5. Legacy `OLLAMA_BASE_URL` / `OLLAMA_DEFAULT_MODEL` / `USE_OLLAMA`
/// 6. `OLLASHIM_*` environment variables
pub fn load_config() -> Result<ShimConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no files, no env).
pub fn load_config_from_str(toml_content: &str) -> Result<ShimConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(ShimConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from one explicit file, still honouring env overrides.
pub fn load_config_from_path(path: &Path) -> Result<ShimConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(ShimConfig::default()))
        .merge(Toml::file(path))
        .merge(legacy_env_provider())
        .merge(env_provider())
        .extract()
}

/// The unextracted figment used by [`load_config`].
pub fn build_figment() -> Figment {
    let mut figment = Figment::new()
        .merge(Serialized::defaults(ShimConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG_PATH));
    if let Some(user) = user_config_path() {
        figment = figment.merge(Toml::file(user));
    }
    figment
        .merge(Toml::file(CONFIG_FILE_NAME))
        .merge(legacy_env_provider())
        .merge(env_provider())
}

/// Every config file path consulted by [`load_config`], lowest priority first.
pub fn config_search_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from(SYSTEM_CONFIG_PATH)];
    paths.extend(user_config_path());
    paths.push(PathBuf::from(CONFIG_FILE_NAME));
    paths
}

fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("ollashim").join(CONFIG_FILE_NAME))
}

/// Variable names understood by earlier deployments of the shim.
fn legacy_env_provider() -> Env {
    Env::raw()
        .only(&["OLLAMA_BASE_URL", "OLLAMA_DEFAULT_MODEL", "USE_OLLAMA"])
        .map(|key| match key.as_str().to_ascii_lowercase().as_str() {
            "ollama_base_url" => "ollama.base_url".into(),
            "ollama_default_model" => "ollama.default_model".into(),
            "use_ollama" => "ollama.enabled".into(),
            other => other.to_string().into(),
        })
}

/// `OLLASHIM_<SECTION>_<KEY>` -> `<section>.<key>`.
///
/// Uses an explicit section prefix map instead of `Env::split("_")` because
/// key names themselves contain underscores (`base_url`, `default_model`).
fn env_provider() -> Env {
    Env::prefixed("OLLASHIM_").map(|key| {
        let key_str = key.as_str().to_ascii_lowercase();
        let mapped = ["logging", "ollama", "server"]
            .iter()
            .find_map(|section| {
                key_str
                    .strip_prefix(section)
                    .and_then(|rest| rest.strip_prefix('_'))
                    .map(|rest| format!("{section}.{rest}"))
            })
            .unwrap_or(key_str);
        mapped.into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn legacy_env_vars_override_defaults() {
        Jail::expect_with(|jail| {
            jail.set_env("OLLAMA_BASE_URL", "http://gpu-box:11434");
            jail.set_env("OLLAMA_DEFAULT_MODEL", "llama3.1:8b");
            jail.set_env("USE_OLLAMA", "false");

            let config = load_config()?;
            assert_eq!(config.ollama.base_url, "http://gpu-box:11434");
            assert_eq!(config.ollama.default_model, "llama3.1:8b");
            assert!(!config.ollama.enabled);
            Ok(())
        });
    }

    #[test]
    fn prefixed_env_vars_map_to_sections() {
        Jail::expect_with(|jail| {
            jail.set_env("OLLASHIM_OLLAMA_REQUEST_TIMEOUT_SECS", "30");
            jail.set_env("OLLASHIM_SERVER_PORT", "9000");
            jail.set_env("OLLASHIM_LOGGING_LEVEL", "debug");

            let config = load_config()?;
            assert_eq!(config.ollama.request_timeout_secs, 30);
            assert_eq!(config.server.port, 9000);
            assert_eq!(config.logging.level, "debug");
            Ok(())
        });
    }

    #[test]
    fn prefixed_env_wins_over_legacy_env() {
        Jail::expect_with(|jail| {
            jail.set_env("OLLAMA_BASE_URL", "http://legacy:11434");
            jail.set_env("OLLASHIM_OLLAMA_BASE_URL", "http://current:11434");

            let config = load_config()?;
            assert_eq!(config.ollama.base_url, "http://current:11434");
            Ok(())
        });
    }

    #[test]
    fn local_file_is_picked_up() {
        Jail::expect_with(|jail| {
            jail.create_file(
                CONFIG_FILE_NAME,
                r#"
[ollama]
default_model = "mistral:7b"
"#,
            )?;

            let config = load_config()?;
            assert_eq!(config.ollama.default_model, "mistral:7b");
            Ok(())
        });
    }

    #[test]
    fn search_paths_end_with_local_file() {
        let paths = config_search_paths();
        assert_eq!(paths.first(), Some(&PathBuf::from(SYSTEM_CONFIG_PATH)));
        assert_eq!(paths.last(), Some(&PathBuf::from(CONFIG_FILE_NAME)));
    }
}
