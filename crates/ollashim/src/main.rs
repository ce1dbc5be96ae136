// SPDX-FileCopyrightText: 2026 Ollashim Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! ollashim - an OpenAI-compatible chat-completion shim over Ollama.
//!
//! This is the binary entry point.

mod commands;
mod serve;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

/// ollashim - OpenAI-compatible chat completions over a local Ollama server.
#[derive(Parser, Debug)]
#[command(name = "ollashim", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the standard locations.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the OpenAI-compatible HTTP gateway.
    Serve,
    /// Send one chat completion and print the answer.
    Chat(commands::ChatArgs),
    /// List the backend's models as JSON.
    Models,
    /// Probe the backend and print the health report as JSON.
    Health,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => ollashim_config::load_and_validate_path(path),
        None => ollashim_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            ollashim_config::render_errors(&errors);
            return ExitCode::FAILURE;
        }
    };

    serve::init_tracing(&config.logging.level);

    let result = match cli.command {
        Commands::Serve => serve::run_serve(&config).await.map(|()| ExitCode::SUCCESS),
        Commands::Chat(args) => commands::run_chat(&config, args)
            .await
            .map(|()| ExitCode::SUCCESS),
        Commands::Models => commands::run_models(&config)
            .await
            .map(|()| ExitCode::SUCCESS),
        Commands::Health => commands::run_health(&config).await,
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
