// SPDX-FileCopyrightText: 2026 Ollashim Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for ollashim.
//!
//! Holds the OpenAI-side data model, the request options, the closed error
//! enum, the token estimator, and the [`CompletionAdapter`] trait that backend
//! adapters implement.

pub mod error;
pub mod request;
pub mod stream;
pub mod tokens;
pub mod traits;
pub mod types;

pub use error::ShimError;
pub use request::{ChatCompletionRequest, ModelMap};
pub use stream::{BoxChunkStream, ChunkStream};
pub use tokens::estimate_tokens;
pub use traits::{Completion, CompletionAdapter};
pub use types::{
    ChatCompletionChoice, ChatCompletionResponse, ChatMessage, ChunkChoice, ChunkDelta,
    FinishReason, HealthReport, HealthState, ModelDescriptor, ModelList, Role, StreamChunk,
    UsageStats,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shim_error_kinds_are_distinct() {
        let errors = [
            ShimError::BackendUnreachable {
                message: "refused".into(),
                source: None,
            },
            ShimError::BackendError {
                status: 500,
                body: "boom".into(),
            },
            ShimError::MalformedPayload {
                message: "bad json".into(),
                source: None,
            },
            ShimError::InvalidRequest("empty".into()),
            ShimError::Config("bad url".into()),
        ];
        let kinds: std::collections::HashSet<_> = errors.iter().map(ShimError::kind).collect();
        assert_eq!(kinds.len(), errors.len());
    }

    #[test]
    fn backend_error_message_carries_status_and_body() {
        let err = ShimError::BackendError {
            status: 404,
            body: "model 'nope' not found".into(),
        };
        let text = err.to_string();
        assert!(text.contains("404"));
        assert!(text.contains("model 'nope' not found"));
    }

    #[test]
    fn adapter_trait_is_object_safe() {
        fn _assert_object_safe(_: &dyn CompletionAdapter) {}
    }
}
