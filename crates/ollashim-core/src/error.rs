// SPDX-FileCopyrightText: 2026 Ollashim Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the ollashim adapter and its callers.

use thiserror::Error;

/// The closed set of failures an adapter call can produce.
///
/// Callers branch on the variant rather than parsing the message text.
/// Malformed streamed lines and health-probe failures never surface here.
#[derive(Debug, Error)]
pub enum ShimError {
    /// The backend could not be reached (connect failure, timeout, reset),
    /// including failures in the middle of a streamed body.
    #[error("backend unreachable: {message}")]
    BackendUnreachable {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The backend answered with a non-success HTTP status.
    #[error("backend returned {status}: {body}")]
    BackendError { status: u16, body: String },

    /// The backend answered successfully but the payload could not be decoded.
    #[error("malformed backend payload: {message}")]
    MalformedPayload {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The caller's request was rejected before any I/O happened.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The adapter could not be constructed from its configuration.
    #[error("configuration error: {0}")]
    Config(String),
}

impl ShimError {
    /// Short machine-readable tag, used as the OpenAI-style error `type`.
    pub fn kind(&self) -> &'static str {
        match self {
            ShimError::BackendUnreachable { .. } => "backend_unreachable",
            ShimError::BackendError { .. } => "backend_error",
            ShimError::MalformedPayload { .. } => "malformed_payload",
            ShimError::InvalidRequest(_) => "invalid_request_error",
            ShimError::Config(_) => "configuration_error",
        }
    }

    /// Builds a [`ShimError::MalformedPayload`] from a decode error.
    pub fn malformed(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        ShimError::MalformedPayload {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}
