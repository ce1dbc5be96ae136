// SPDX-FileCopyrightText: 2026 Ollashim Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Server-Sent Events for streamed chat completions.
//!
//! Event format, as OpenAI clients expect it:
//! ```text
//! data: {"id":"chatcmpl-...","object":"chat.completion.chunk",...}
//!
//! data: [DONE]
//! ```
//!
//! A backend failure mid-stream is sent as one `error` event and no
//! `[DONE]` follows it.

use std::convert::Infallible;

use axum::response::sse::{Event, KeepAlive, Sse};
use futures::stream::{self, Stream, StreamExt};
use ollashim_core::{ChunkStream, ShimError, StreamChunk};

use crate::error::ApiError;

/// Terminal sentinel sent after the last chunk.
pub const DONE_SENTINEL: &str = "[DONE]";

/// Wraps a chunk stream as an SSE response.
///
/// Dropping the response (client went away) drops the [`ChunkStream`], which
/// releases the backend connection.
pub fn chunk_events(chunks: ChunkStream) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let events = stream::unfold(Some(chunks), |state| async move {
        let mut chunks = state?;
        match chunks.next().await {
            Some(Ok(chunk)) => Some((chunk_event(&chunk), Some(chunks))),
            Some(Err(e)) => {
                chunks.close();
                Some((error_event(e), None))
            }
            None => Some((Event::default().data(DONE_SENTINEL), None)),
        }
    })
    .map(Ok::<_, Infallible>);

    Sse::new(events).keep_alive(KeepAlive::default())
}

fn chunk_event(chunk: &StreamChunk) -> Event {
    match Event::default().json_data(chunk) {
        Ok(event) => event,
        Err(e) => error_event(ShimError::Config(format!("failed to encode chunk: {e}"))),
    }
}

fn error_event(err: ShimError) -> Event {
    let body = ApiError::from(err).body();
    let data = serde_json::to_string(&body)
        .unwrap_or_else(|_| r#"{"error":{"message":"stream failed","type":"stream_error"}}"#.into());
    Event::default().event("error").data(data)
}
