//! Incremental newline-delimited JSON parser for streaming responses
//!
//! Turns an arbitrarily partitioned byte stream into complete lines, one
//! JSON document per line, with:
//! - Buffer: 1MB maximum for a single line, terminated or not
//! - Algorithm: O(n) newline scan, each byte inspected once
//! - End of stream: ends on a line boundary or fails as truncated
//!
//! Read boundaries never change the output: feeding the same bytes in one
//! read or in a thousand yields the same ordered lines.

use crate::errors::{ClientError, Result};
use crate::logging::Logger;
use bytes::Bytes;
use futures_util::{pin_mut, Stream, StreamExt};
use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;

/// Maximum size of one line (1MB)
pub const MAX_BUFFER_SIZE: usize = 1_048_576;

/// Incremental NDJSON line splitter
#[derive(Debug)]
pub struct NdjsonParser {
    /// Bytes of the current, not yet terminated line
    buffer: Vec<u8>,

    /// Maximum buffer size
    max_buffer_size: usize,

    /// Complete lines handed out so far
    lines_emitted: usize,

    /// Overflow raised after the lines that preceded it were handed out
    pending_error: Option<ClientError>,
}

impl NdjsonParser {
    /// Create new parser with default settings
    pub fn new() -> Self {
        Self::with_capacity(MAX_BUFFER_SIZE)
    }

    /// Create parser with custom buffer capacity
    pub fn with_capacity(max_buffer_size: usize) -> Self {
        Self {
            buffer: Vec::with_capacity(4096),
            max_buffer_size,
            lines_emitted: 0,
            pending_error: None,
        }
    }

    /// Add bytes and return every line they complete, in order
    ///
    /// Lines are returned without their terminator (`\n` or `\r\n`).
    /// Whitespace-only lines are skipped. A line longer than the maximum
    /// buffer size fails the same way whether it arrived in one read or
    /// many. When that line follows complete lines from the same read,
    /// those lines are returned first and the overflow is raised by
    /// [`take_error`](Self::take_error) or the next call.
    pub fn push(&mut self, bytes: &[u8]) -> Result<Vec<Vec<u8>>> {
        if let Some(err) = self.pending_error.take() {
            return Err(err);
        }

        let mut lines = Vec::new();
        let mut rest = bytes;

        while let Some(pos) = rest.iter().position(|&b| b == b'\n') {
            if self.buffer.len() + pos > self.max_buffer_size {
                return self.overflow(self.buffer.len() + pos, lines);
            }
            self.buffer.extend_from_slice(&rest[..pos]);
            rest = &rest[pos + 1..];

            let mut line = std::mem::take(&mut self.buffer);
            if line.last() == Some(&b'\r') {
                line.pop();
            }
            if !is_blank(&line) {
                self.lines_emitted += 1;
                lines.push(line);
            }
        }

        if self.buffer.len() + rest.len() > self.max_buffer_size {
            return self.overflow(self.buffer.len() + rest.len(), lines);
        }
        self.buffer.extend_from_slice(rest);

        Ok(lines)
    }

    fn overflow(&mut self, size: usize, lines: Vec<Vec<u8>>) -> Result<Vec<Vec<u8>>> {
        self.buffer.clear();
        let err = ClientError::JsonParseError(format!(
            "Buffer overflow: line of {} bytes exceeds maximum {}",
            size, self.max_buffer_size
        ));
        if lines.is_empty() {
            Err(err)
        } else {
            self.pending_error = Some(err);
            Ok(lines)
        }
    }

    /// Take the error held back by the last [`push`](Self::push), if any
    pub fn take_error(&mut self) -> Option<ClientError> {
        self.pending_error.take()
    }

    /// Signal end of stream
    ///
    /// A stream that stopped exactly on a line boundary (or after trailing
    /// whitespace) is well-formed; anything else is truncated.
    pub fn finish(&mut self) -> Result<()> {
        if let Some(err) = self.pending_error.take() {
            return Err(err);
        }
        let pending = std::mem::take(&mut self.buffer);
        if is_blank(&pending) {
            Ok(())
        } else {
            Err(ClientError::TruncatedStream {
                bytes: pending.len(),
            })
        }
    }

    /// Decode one line into a message
    pub fn decode<T: DeserializeOwned>(line: &[u8]) -> Result<T> {
        serde_json::from_slice(line).map_err(|e| {
            ClientError::JsonParseError(format!(
                "Failed to decode stream line: {} ({})",
                e,
                String::from_utf8_lossy(line)
            ))
        })
    }

    /// Get current buffer size
    pub fn buffer_size(&self) -> usize {
        self.buffer.len()
    }

    /// Check if buffer is empty
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Number of complete lines produced so far
    pub fn lines_emitted(&self) -> usize {
        self.lines_emitted
    }

    /// Clear the buffer
    pub fn clear(&mut self) {
        self.buffer.clear();
        self.pending_error = None;
    }
}

impl Default for NdjsonParser {
    fn default() -> Self {
        Self::new()
    }
}

fn is_blank(bytes: &[u8]) -> bool {
    bytes.iter().all(|b| b.is_ascii_whitespace())
}

/// Drive a byte stream through the parser, delivering each decoded message
///
/// `on_chunk` runs synchronously for every message, in arrival order, before
/// the next read. Returns the number of messages delivered. Any failure after
/// the first delivery comes back as `StreamInterrupted` with that count;
/// delivered messages are never retracted.
pub async fn pump<S, T, F>(
    stream: S,
    parser: &mut NdjsonParser,
    logger: &Logger,
    cancel: Option<&CancellationToken>,
    mut on_chunk: F,
) -> Result<usize>
where
    S: Stream<Item = Result<Bytes>>,
    T: DeserializeOwned,
    F: FnMut(T),
{
    pin_mut!(stream);
    let mut delivered = 0usize;

    loop {
        let next = match cancel {
            Some(token) => tokio::select! {
                biased;
                _ = token.cancelled() => {
                    logger.warn("Stream cancelled by caller");
                    return Err(ClientError::Cancelled.after_chunks(delivered));
                }
                item = stream.next() => item,
            },
            None => stream.next().await,
        };

        let bytes = match next {
            Some(Ok(bytes)) => bytes,
            Some(Err(e)) => {
                logger.error(format!("Error reading stream: {}", e));
                return Err(e.after_chunks(delivered));
            }
            None => break,
        };

        let lines = parser.push(&bytes).map_err(|e| e.after_chunks(delivered))?;
        for line in lines {
            if logger.debug_enabled() {
                logger.debug(format!("Stream chunk: {}", String::from_utf8_lossy(&line)));
            }

            let message: T = NdjsonParser::decode(&line).map_err(|e| {
                logger.error(format!("Failed to unmarshal stream message: {}", e));
                e.after_chunks(delivered)
            })?;

            on_chunk(message);
            delivered += 1;
        }

        if let Some(e) = parser.take_error() {
            logger.error(format!("Error reading stream: {}", e));
            return Err(e.after_chunks(delivered));
        }
    }

    parser.finish().map_err(|e| {
        logger.error(format!("Stream ended mid-line: {}", e));
        e.after_chunks(delivered)
    })?;

    logger.debug(format!("End of stream reached after {} chunk(s)", delivered));
    Ok(delivered)
}
