//! Type definitions module
//!
//! Wire types for every endpoint plus tool declarations and results.
//! JSON keys are snake_case throughout.

pub mod messages;
pub mod options;
pub mod requests;
pub mod responses;
pub mod tools;

// Re-export commonly used types
pub use messages::{Message, Role};
pub use options::Options;
pub use requests::{
    ChatRequest, CompletionRequest, CopyModelRequest, EmbeddingRequest, ModelManagementRequest,
    ShowModelRequest, Validate,
};
pub use responses::{
    format_size, ChatResponse, CompletionResponse, EmbeddingResponse, GenerationStats,
    ModelDetails, ModelInfo, ModelListResponse, ModelProcess, ModelProcessResponse,
    ShowModelResponse, StatusResponse, VersionResponse,
};
pub use tools::{
    ArgValue, Tool, ToolArguments, ToolCall, ToolCallFunction, ToolCallResult, ToolFunction,
    ToolParam, ToolParameters, ToolStatus,
};
