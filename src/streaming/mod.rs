//! Streaming transport module
//!
//! Provides the HTTP transport and the incremental NDJSON decoder.

pub mod parser;
pub mod transport;

// Re-export commonly used types
pub use parser::{pump, NdjsonParser, MAX_BUFFER_SIZE};
pub use transport::Transport;
