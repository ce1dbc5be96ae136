// SPDX-FileCopyrightText: 2026 Ollashim Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `ollashim serve` command and process-wide logging setup.

use std::sync::Arc;

use ollashim_config::ShimConfig;
use ollashim_core::{CompletionAdapter, ShimError};
use ollashim_gateway::GatewayState;
use ollashim_ollama::OllamaAdapter;
use tracing::{info, warn};

/// Run the gateway until Ctrl-C.
pub async fn run_serve(config: &ShimConfig) -> Result<(), ShimError> {
    let adapter = OllamaAdapter::new(config)?;

    if !adapter.enabled() {
        warn!("Ollama backend is disabled; /v1 routes will answer 503");
    } else {
        // Startup probe is informational only; the gateway starts either way.
        let report = adapter.health_check().await;
        match report.models_count {
            Some(count) => info!(models = count, "Ollama backend reachable"),
            None => warn!(
                error = report.error.as_deref().unwrap_or("unknown"),
                "Ollama backend not reachable yet"
            ),
        }
    }

    let state = GatewayState::new(Arc::new(adapter));
    ollashim_gateway::start_server(&config.server, state).await
}

/// Installs the global tracing subscriber.
///
/// `RUST_LOG` wins when set; otherwise `ollashim` crates log at `log_level`
/// and everything else at `warn`.
pub fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(log_level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Target matching is by prefix, so `ollashim` also covers `ollashim_ollama` etc.
fn default_directives(log_level: &str) -> String {
    format!("ollashim={},warn", log_level.to_ascii_lowercase())
}
