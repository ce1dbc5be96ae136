// SPDX-FileCopyrightText: 2026 Ollashim Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! NDJSON decoder for streamed `/api/chat` bodies.
//!
//! Ollama streams one JSON object per line. Lines can be split across network
//! reads, so bytes are buffered until a newline arrives. Each complete line
//! becomes at most one [`StreamChunk`]; lines that fail to parse are skipped.

use bytes::{Bytes, BytesMut};
use futures::stream::{self, BoxStream, Stream, StreamExt};
use ollashim_core::{BoxChunkStream, ShimError, StreamChunk};
use tracing::{debug, warn};

use crate::types::OllamaChatResponse;

/// Longest line buffered while waiting for a newline.
pub const MAX_LINE_BYTES: usize = 1024 * 1024;

/// State threaded through the `unfold` stream.
struct DecodeState<E> {
    body: BoxStream<'static, Result<Bytes, E>>,
    buf: BytesMut,
    /// Bytes of `buf` already known to hold no newline.
    scanned: usize,
    id: String,
    model: String,
    /// The body has no more bytes.
    eof: bool,
    /// The final chunk (or an error) was emitted.
    done: bool,
}

/// Converts an NDJSON byte stream into OpenAI-style chunks.
///
/// Every chunk carries `id` and `model`. The stream ends right after the
/// chunk produced by the `done` line, dropping `body` and with it the
/// connection. A transport error mid-body yields one `BackendUnreachable`
/// item and ends the stream, as does a line longer than [`MAX_LINE_BYTES`]
/// (one `MalformedPayload` item).
///
/// A body that ends cleanly without a `done` line ends the stream without a
/// final `stop` chunk and without an error.
pub fn decode_chat_stream<S, E>(body: S, id: String, model: String) -> BoxChunkStream
where
    S: Stream<Item = Result<Bytes, E>> + Send + 'static,
    E: std::error::Error + Send + Sync + 'static,
{
    let state = DecodeState {
        body: body.boxed(),
        buf: BytesMut::new(),
        scanned: 0,
        id,
        model,
        eof: false,
        done: false,
    };

    Box::pin(stream::unfold(state, |mut st| async move {
        if st.done {
            return None;
        }

        loop {
            if let Some(pos) = st.buf[st.scanned..].iter().position(|b| *b == b'\n') {
                let line = st.buf.split_to(st.scanned + pos + 1);
                st.scanned = 0;
                if let Some(chunk) = decode_line(&line, &st.id, &st.model) {
                    st.done = chunk.is_final();
                    return Some((Ok(chunk), st));
                }
                continue;
            }
            st.scanned = st.buf.len();

            if st.buf.len() > MAX_LINE_BYTES {
                warn!(id = %st.id, buffered = st.buf.len(), "backend stream line too long");
                st.done = true;
                let err = ShimError::MalformedPayload {
                    message: format!("stream line exceeds {MAX_LINE_BYTES} bytes"),
                    source: None,
                };
                return Some((Err(err), st));
            }

            if st.eof {
                // Trailing line without a newline terminator.
                st.done = true;
                let line = st.buf.split();
                return decode_line(&line, &st.id, &st.model).map(|chunk| (Ok(chunk), st));
            }

            match st.body.next().await {
                Some(Ok(bytes)) => st.buf.extend_from_slice(&bytes),
                Some(Err(e)) => {
                    warn!(id = %st.id, error = %e, "backend stream failed");
                    st.done = true;
                    let err = ShimError::BackendUnreachable {
                        message: format!("stream interrupted: {e}"),
                        source: Some(Box::new(e)),
                    };
                    return Some((Err(err), st));
                }
                None => st.eof = true,
            }
        }
    }))
}

/// Decodes one NDJSON line. `None` for blank or malformed lines.
///
/// A `done` line always maps to the final chunk, whatever content it carries.
fn decode_line(line: &[u8], id: &str, model: &str) -> Option<StreamChunk> {
    let text = String::from_utf8_lossy(line);
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    let parsed: OllamaChatResponse = match serde_json::from_str(text) {
        Ok(parsed) => parsed,
        Err(e) => {
            debug!(id, error = %e, "skipping malformed stream line");
            return None;
        }
    };

    let chunk = if parsed.done {
        StreamChunk::finished(id, model)
    } else {
        match parsed.message.and_then(|m| m.content) {
            Some(content) => StreamChunk::content(id, model, content),
            None => StreamChunk::empty(id, model),
        }
    };
    Some(chunk)
}
