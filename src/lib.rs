//! ollamakit - typed async client for a local Ollama server
//!
//! Wraps the Ollama REST API (chat, completion, embeddings, model
//! management, status) behind typed requests and responses, with
//! newline-delimited JSON streaming and a local tool registry for
//! model-issued tool calls.
//!
//! # Architecture
//!
//! - **streaming**: HTTP transport plus the incremental NDJSON decoder
//! - **api**: one typed binding per endpoint, model and status handles
//! - **builders**: fluent chat/completion/embeddings requests
//! - **tools**: name-to-handler registry for tool calls
//!
//! ```no_run
//! # async fn demo() -> ollamakit::Result<()> {
//! use ollamakit::{ClientConfig, OllamaClient};
//!
//! let client = OllamaClient::new(ClientConfig::default())?;
//! let reply = client
//!     .chat_builder()
//!     .with_model("llama3.2")
//!     .with_user_message("Why is the sky blue?")
//!     .execute()
//!     .await?;
//! println!("{}", reply.message.content);
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod builders;
pub mod cli;
pub mod client;
pub mod config;
pub mod errors;
pub mod logging;
pub mod streaming;
pub mod tools;
pub mod types;

// Re-export commonly used types
pub use client::OllamaClient;
pub use config::ClientConfig;
pub use errors::{ClientError, Result};
pub use logging::{LogLevel, LogSink, Logger};
pub use tools::ToolRegistry;
