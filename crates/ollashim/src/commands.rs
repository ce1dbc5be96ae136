// SPDX-FileCopyrightText: 2026 Ollashim Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! One-shot commands: `chat`, `models` and `health`.

use std::io::Write;
use std::process::ExitCode;

use futures::StreamExt;
use ollashim_config::ShimConfig;
use ollashim_core::{
    ChatCompletionRequest, ChatMessage, Completion, CompletionAdapter, ShimError, UsageStats,
};
use ollashim_ollama::OllamaAdapter;

/// Arguments of `ollashim chat`.
#[derive(clap::Args, Debug)]
pub struct ChatArgs {
    /// User message to send.
    pub prompt: String,

    /// Optional system message sent before the prompt.
    #[arg(long)]
    pub system: Option<String>,

    /// Model name; OpenAI names are mapped to backend models.
    #[arg(long)]
    pub model: Option<String>,

    #[arg(long, default_value_t = 0.0)]
    pub temperature: f32,

    /// Generation cap forwarded to the backend.
    #[arg(long)]
    pub max_tokens: Option<u32>,

    /// Print the answer as it is generated.
    #[arg(long)]
    pub stream: bool,

    /// Enable the backend's reasoning mode.
    #[arg(long)]
    pub think: bool,
}

impl ChatArgs {
    fn into_request(self) -> ChatCompletionRequest {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = self.system {
            messages.push(ChatMessage::system(system));
        }
        messages.push(ChatMessage::user(self.prompt));

        let mut request = ChatCompletionRequest::new(messages)
            .temperature(self.temperature)
            .stream(self.stream)
            .think(self.think);
        request.model = self.model;
        request.max_tokens = self.max_tokens;
        request
    }
}

/// Run `ollashim chat`: answer on stdout, usage on stderr.
pub async fn run_chat(config: &ShimConfig, args: ChatArgs) -> Result<(), ShimError> {
    let adapter = enabled_adapter(config)?;
    let request = args.into_request();
    let prompt = request.messages.clone();

    match adapter.create(request).await? {
        Completion::Full(response) => {
            println!("{}", response.content().unwrap_or_default());
            print_usage(&response.model, &response.usage);
        }
        Completion::Stream(mut chunks) => {
            let mut stdout = std::io::stdout().lock();
            let mut content = String::new();
            let mut model = String::new();
            while let Some(chunk) = chunks.next().await {
                let chunk = chunk?;
                if let Some(delta) = chunk.delta_content() {
                    content.push_str(delta);
                    // A closed stdout (e.g. `| head`) only stops the echo.
                    let _ = write!(stdout, "{delta}").and_then(|()| stdout.flush());
                }
                model = chunk.model;
            }
            let _ = writeln!(stdout);
            print_usage(&model, &UsageStats::estimate(&prompt, &content));
        }
    }
    Ok(())
}

/// Run `ollashim models`.
pub async fn run_models(config: &ShimConfig) -> Result<(), ShimError> {
    let adapter = enabled_adapter(config)?;
    let models = adapter.list_models().await?;
    println!("{}", to_pretty_json(&models)?);
    Ok(())
}

/// Run `ollashim health`. Exits non-zero when the backend is unhealthy.
pub async fn run_health(config: &ShimConfig) -> Result<ExitCode, ShimError> {
    let adapter = OllamaAdapter::new(config)?;
    let report = adapter.health_check().await;
    println!("{}", to_pretty_json(&report)?);
    Ok(if report.is_healthy() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn enabled_adapter(config: &ShimConfig) -> Result<OllamaAdapter, ShimError> {
    let adapter = OllamaAdapter::new(config)?;
    if !adapter.enabled() {
        return Err(ShimError::Config(
            "the Ollama backend is disabled (ollama.enabled = false)".into(),
        ));
    }
    Ok(adapter)
}

fn print_usage(model: &str, usage: &UsageStats) {
    eprintln!(
        "[{model}] prompt_tokens={} completion_tokens={} total_tokens={} (estimated)",
        usage.prompt_tokens, usage.completion_tokens, usage.total_tokens
    );
}

fn to_pretty_json<T: serde::Serialize>(value: &T) -> Result<String, ShimError> {
    serde_json::to_string_pretty(value)
        .map_err(|e| ShimError::Config(format!("failed to encode output: {e}")))
}
