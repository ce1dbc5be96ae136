// SPDX-FileCopyrightText: 2026 Ollashim Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! OpenAI-style error responses.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use ollashim_core::ShimError;
use serde::Serialize;

/// Error body: `{"error": {"message", "type"}}`.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub message: String,
    #[serde(rename = "type")]
    pub kind: String,
}

/// A handler failure with its HTTP status.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
    pub kind: &'static str,
}

impl ApiError {
    /// The backend is switched off in configuration.
    pub fn disabled() -> Self {
        Self {
            status: StatusCode::SERVICE_UNAVAILABLE,
            message: "the Ollama backend is disabled".to_string(),
            kind: "backend_disabled",
        }
    }

    pub fn body(&self) -> ErrorResponse {
        ErrorResponse {
            error: ErrorDetail {
                message: self.message.clone(),
                kind: self.kind.to_string(),
            },
        }
    }
}

impl From<ShimError> for ApiError {
    fn from(err: ShimError) -> Self {
        let status = match &err {
            ShimError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ShimError::BackendError { .. } | ShimError::MalformedPayload { .. } => {
                StatusCode::BAD_GATEWAY
            }
            ShimError::BackendUnreachable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            ShimError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            status,
            message: err.to_string(),
            kind: err.kind(),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: rejection.body_text(),
            kind: "invalid_request_error",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::warn!(status = %self.status, kind = self.kind, error = %self.message, "request failed");
        } else {
            tracing::debug!(status = %self.status, kind = self.kind, error = %self.message, "request rejected");
        }
        (self.status, Json(self.body())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shim_errors_map_to_statuses() {
        let cases = [
            (ShimError::InvalidRequest("x".into()), 400),
            (ShimError::BackendError { status: 404, body: "x".into() }, 502),
            (ShimError::MalformedPayload { message: "x".into(), source: None }, 502),
            (ShimError::BackendUnreachable { message: "x".into(), source: None }, 503),
            (ShimError::Config("x".into()), 500),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError::from(err).status.as_u16(), status);
        }
    }

    #[test]
    fn error_body_uses_type_key() {
        let err = ApiError::from(ShimError::InvalidRequest("messages must not be empty".into()));
        let json = serde_json::to_value(err.body()).unwrap();
        assert_eq!(json["error"]["type"], "invalid_request_error");
        assert!(json["error"]["message"].as_str().unwrap().contains("messages"));
    }
}
