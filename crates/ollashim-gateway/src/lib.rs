// SPDX-FileCopyrightText: 2026 Ollashim Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! OpenAI-compatible HTTP gateway for ollashim.
//!
//! Exposes any [`ollashim_core::CompletionAdapter`] under the routes OpenAI
//! client libraries call: `/v1/models` and `/v1/chat/completions`, with
//! SSE streaming.

pub mod error;
pub mod handlers;
pub mod server;
pub mod sse;

pub use error::ApiError;
pub use server::{router, start_server, GatewayState};
