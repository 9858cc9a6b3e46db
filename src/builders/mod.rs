//! Fluent request builders
//!
//! Builders borrow the client and accumulate one request. Every `with_*`
//! consumes the builder and returns it, so a builder is never shared while
//! it is being filled in. The terminal method picks the stream flag:
//! `execute()` always sends `stream: false`, `stream(callback)` always sends
//! `stream: true`.

pub mod chat;
pub mod completion;
pub mod embeddings;

// Re-export commonly used types
pub use chat::ChatBuilder;
pub use completion::CompletionBuilder;
pub use embeddings::EmbeddingsBuilder;

use crate::types::Options;

/// Apply `f` to the request's options, starting from defaults when unset
pub(crate) fn tune(options: &mut Option<Options>, f: impl FnOnce(Options) -> Options) {
    let current = options.take().unwrap_or_default();
    *options = Some(f(current));
}
