//! Endpoint operations
//!
//! Typed bindings for every Ollama REST endpoint plus the model and status
//! handles built on them.

pub mod endpoint;
pub mod models;
pub mod status;

// Re-export commonly used types
pub use endpoint::{
    Chat, CopyModel, CreateModel, DeleteModel, Embed, Endpoint, Generate, ListModels, PullModel,
    PushModel, RunningModels, ShowModel, StreamingEndpoint, Version,
};
pub use models::ModelManager;
pub use status::StatusManager;
