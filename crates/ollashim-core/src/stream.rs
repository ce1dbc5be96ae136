// SPDX-FileCopyrightText: 2026 Ollashim Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! A closable stream of completion chunks.
//!
//! [`ChunkStream`] owns whatever keeps the backend connection open. Calling
//! [`ChunkStream::close`] (or dropping the stream) drops that state at once,
//! so a caller that stops reading early does not hold the connection.

use std::pin::Pin;
use std::task::{Context, Poll};

use futures::stream::{Stream, StreamExt};

use crate::error::ShimError;
use crate::types::StreamChunk;

/// Boxed chunk stream as produced by an adapter.
pub type BoxChunkStream = Pin<Box<dyn Stream<Item = Result<StreamChunk, ShimError>> + Send>>;

/// Single-pass, finite stream of [`StreamChunk`]s with an explicit close.
pub struct ChunkStream {
    id: String,
    inner: Option<BoxChunkStream>,
}

impl ChunkStream {
    /// Wraps an adapter stream. `id` is the completion id shared by every chunk.
    pub fn new(id: String, inner: BoxChunkStream) -> Self {
        Self {
            id,
            inner: Some(inner),
        }
    }

    /// Completion id shared by every chunk of this stream.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Releases the underlying connection. Later polls yield `None`.
    pub fn close(&mut self) {
        if self.inner.take().is_some() {
            tracing::debug!(id = %self.id, "chunk stream closed");
        }
    }

    /// True once the stream has ended or been closed.
    pub fn is_closed(&self) -> bool {
        self.inner.is_none()
    }

    /// Drains the stream, concatenating every content delta.
    pub async fn collect_content(mut self) -> Result<String, ShimError> {
        let mut content = String::new();
        while let Some(chunk) = self.next().await {
            if let Some(delta) = chunk?.delta_content() {
                content.push_str(delta);
            }
        }
        Ok(content)
    }
}

impl Stream for ChunkStream {
    type Item = Result<StreamChunk, ShimError>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let Some(inner) = self.inner.as_mut() else {
            return Poll::Ready(None);
        };
        match inner.poll_next_unpin(cx) {
            Poll::Ready(None) => {
                // Release the connection as soon as the body is exhausted.
                self.inner = None;
                Poll::Ready(None)
            }
            other => other,
        }
    }
}

impl std::fmt::Debug for ChunkStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChunkStream")
            .field("id", &self.id)
            .field("closed", &self.is_closed())
            .finish()
    }
}
