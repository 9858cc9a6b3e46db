//! Error types for ollamakit
//!
//! One error enum for every failure the client can report. Transport,
//! stream, validation and tool-lookup failures are all control-flow errors;
//! a tool handler's own failure is not (it is carried as data inside a
//! `ToolCallResult`).

use thiserror::Error;

/// Main error type for the client
#[derive(Error, Debug)]
pub enum ClientError {
    /// HTTP client errors (connection refused, DNS, TLS, body read)
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Server answered with status >= 400
    #[error("API request failed with status {status}: {message}")]
    ApiError { status: u16, message: String },

    /// Response document or stream line could not be decoded
    #[error("JSON parse error: {0}")]
    JsonParseError(String),

    /// Request body could not be serialized
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// Stream transport errors
    #[error("Streaming error: {0}")]
    StreamingError(String),

    /// Stream ended in the middle of a line
    #[error("Stream truncated: {bytes} trailing bytes without a line terminator")]
    TruncatedStream { bytes: usize },

    /// Stream failed after some chunks already reached the callback
    #[error("Stream interrupted after {delivered} chunk(s): {source}")]
    StreamInterrupted {
        delivered: usize,
        #[source]
        source: Box<ClientError>,
    },

    /// Request rejected before it was sent
    #[error("Validation error on `{field}`: {message}")]
    ValidationError { field: &'static str, message: String },

    /// No handler registered under the requested name
    #[error("Tool not registered: {0}")]
    ToolNotFound(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Timeout errors
    #[error("Operation timed out after {duration_ms}ms")]
    Timeout { duration_ms: u64 },

    /// Caller cancelled the in-flight request
    #[error("Request cancelled")]
    Cancelled,

    /// I/O errors
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Generic errors with context
    #[error("Client error: {0}")]
    Generic(String),
}

impl ClientError {
    /// Build a validation error for a request field
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        ClientError::ValidationError {
            field,
            message: message.into(),
        }
    }

    /// Number of stream chunks delivered before this error
    ///
    /// Zero means the call failed before the callback ever ran.
    pub fn delivered_chunks(&self) -> usize {
        match self {
            ClientError::StreamInterrupted { delivered, .. } => *delivered,
            _ => 0,
        }
    }

    /// Wrap a mid-stream failure with the delivered count, if any chunk got through
    pub(crate) fn after_chunks(self, delivered: usize) -> Self {
        if delivered == 0 {
            self
        } else {
            ClientError::StreamInterrupted {
                delivered,
                source: Box::new(self),
            }
        }
    }

    /// HTTP status code, for `ApiError`
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::ApiError { status, .. } => Some(*status),
            ClientError::StreamInterrupted { source, .. } => source.status(),
            _ => None,
        }
    }
}

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Convert anyhow errors to ClientError
impl From<anyhow::Error> for ClientError {
    fn from(err: anyhow::Error) -> Self {
        ClientError::Generic(err.to_string())
    }
}
