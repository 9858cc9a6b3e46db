//! Tool registry module
//!
//! Local handlers for the tool calls a model requests during chat.

pub mod registry;

// Re-export commonly used types
pub use registry::{ToolHandler, ToolRegistry};
