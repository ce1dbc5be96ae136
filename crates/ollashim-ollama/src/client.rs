// SPDX-FileCopyrightText: 2026 Ollashim Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the Ollama native API.
//!
//! Provides [`OllamaClient`], which owns the connection pool and applies the
//! timeout policy: a connect timeout on every request, a total deadline for
//! unary calls, and an idle read timeout for streamed bodies.

use std::time::Duration;

use ollashim_config::OllamaConfig;
use ollashim_core::ShimError;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::types::{OllamaChatRequest, OllamaChatResponse, OllamaTagsResponse, OllamaTagsSummary};

/// HTTP client for one Ollama server.
///
/// Cheap to clone; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct OllamaClient {
    http: reqwest::Client,
    base_url: String,
    request_timeout: Duration,
    health_timeout: Duration,
}

impl OllamaClient {
    /// Builds a client from the `[ollama]` config section.
    pub fn new(config: &OllamaConfig) -> Result<Self, ShimError> {
        let http = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout())
            .read_timeout(config.request_timeout())
            .build()
            .map_err(|e| ShimError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            request_timeout: config.request_timeout(),
            health_timeout: config.health_timeout(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Non-streaming chat: waits for the single response object.
    pub async fn chat(&self, body: &OllamaChatRequest) -> Result<OllamaChatResponse, ShimError> {
        let response = self
            .http
            .post(self.url("/api/chat"))
            .timeout(self.request_timeout)
            .json(body)
            .send()
            .await
            .map_err(transport_error)?;
        let response = check_status(response).await?;
        decode_json(response).await
    }

    /// Streaming chat: returns the response once headers arrive.
    ///
    /// No total deadline is set, so long generations are bounded only by the
    /// idle read timeout between body chunks.
    pub async fn chat_stream(
        &self,
        body: &OllamaChatRequest,
    ) -> Result<reqwest::Response, ShimError> {
        let response = self
            .http
            .post(self.url("/api/chat"))
            .json(body)
            .send()
            .await
            .map_err(transport_error)?;
        check_status(response).await
    }

    /// Installed models, bounded by the request timeout.
    pub async fn tags(&self) -> Result<OllamaTagsResponse, ShimError> {
        self.tags_within(self.request_timeout).await
    }

    /// Installed model entries, bounded by the shorter health timeout.
    ///
    /// Entries are not decoded, so an odd field in one model cannot fail the probe.
    pub async fn probe(&self) -> Result<OllamaTagsSummary, ShimError> {
        self.tags_within(self.health_timeout).await
    }

    async fn tags_within<T: DeserializeOwned>(&self, timeout: Duration) -> Result<T, ShimError> {
        let response = self
            .http
            .get(self.url("/api/tags"))
            .timeout(timeout)
            .send()
            .await
            .map_err(transport_error)?;
        let response = check_status(response).await?;
        decode_json(response).await
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

/// Maps a reqwest failure (connect, timeout, reset) to `BackendUnreachable`.
pub(crate) fn transport_error(e: reqwest::Error) -> ShimError {
    let message = if e.is_timeout() {
        format!("request timed out: {e}")
    } else {
        format!("HTTP request failed: {e}")
    };
    ShimError::BackendUnreachable {
        message,
        source: Some(Box::new(e)),
    }
}

/// Turns a non-2xx response into `BackendError`, keeping the body text.
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ShimError> {
    let status = response.status();
    debug!(status = %status, url = %response.url(), "backend response received");
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    warn!(status = %status, body = %body, "backend returned an error status");
    Err(ShimError::BackendError {
        status: status.as_u16(),
        body,
    })
}

async fn decode_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ShimError> {
    let body = response.text().await.map_err(transport_error)?;
    serde_json::from_str(&body)
        .map_err(|e| ShimError::malformed(format!("failed to parse backend response: {e}"), e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_client(base_url: &str) -> OllamaClient {
        let config = OllamaConfig {
            base_url: format!("{base_url}/"),
            ..OllamaConfig::default()
        };
        OllamaClient::new(&config).unwrap()
    }

    #[test]
    fn trailing_slash_is_trimmed() {
        let client = test_client("http://localhost:11434");
        assert_eq!(client.base_url(), "http://localhost:11434");
    }

    #[tokio::test]
    async fn chat_posts_to_api_chat() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .and(body_partial_json(serde_json::json!({"model": "qwen3:8b", "stream": false})))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "message": {"role": "assistant", "content": "ok"},
                "done": true
            })))
            .expect(1)
            .mount(&server)
            .await;

        let body = OllamaChatRequest {
            model: "qwen3:8b".into(),
            messages: vec![ollashim_core::ChatMessage::user("hi")],
            stream: false,
            think: false,
            options: crate::types::OllamaOptions {
                temperature: 0.0,
                num_predict: None,
            },
        };
        let resp = test_client(&server.uri()).chat(&body).await.unwrap();
        assert!(resp.done);
    }

    #[tokio::test]
    async fn error_status_keeps_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/tags"))
            .respond_with(ResponseTemplate::new(500).set_body_string("internal boom"))
            .mount(&server)
            .await;

        let err = test_client(&server.uri()).tags().await.unwrap_err();
        match err {
            ShimError::BackendError { status, body } => {
                assert_eq!(status, 500);
                assert_eq!(body, "internal boom");
            }
            other => panic!("expected BackendError, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn undecodable_body_is_malformed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/tags"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let err = test_client(&server.uri()).tags().await.unwrap_err();
        assert!(matches!(err, ShimError::MalformedPayload { .. }), "got {err:?}");
    }
}
