//! Per-endpoint request payloads
//!
//! Each request is built once per call. `stream` is always serialized: the
//! server streams by default when the flag is absent.

use crate::errors::{ClientError, Result};
use crate::types::messages::Message;
use crate::types::options::Options;
use crate::types::tools::Tool;
use serde::{Deserialize, Serialize};

/// Checked before a request leaves the process
pub trait Validate {
    fn validate(&self) -> Result<()>;
}

impl Validate for () {
    fn validate(&self) -> Result<()> {
        Ok(())
    }
}

fn require_model(model: &str) -> Result<()> {
    if model.trim().is_empty() {
        return Err(ClientError::validation("model", "model name is required"));
    }
    Ok(())
}

/// POST /api/chat
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<Message>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<Tool>,
    /// "json" or a JSON schema
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Options>,
    pub stream: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keep_alive: Option<String>,
}

impl Validate for ChatRequest {
    fn validate(&self) -> Result<()> {
        require_model(&self.model)?;
        if self.messages.is_empty() {
            return Err(ClientError::validation(
                "messages",
                "at least one message is required",
            ));
        }
        Ok(())
    }
}

/// POST /api/generate
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompletionRequest {
    pub model: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub prompt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suffix: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Options>,
    pub stream: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub raw: bool,
    /// Context returned by a previous completion, for short conversational memory
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub context: Vec<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keep_alive: Option<String>,
}

impl Validate for CompletionRequest {
    fn validate(&self) -> Result<()> {
        require_model(&self.model)
    }
}

/// POST /api/embed
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmbeddingRequest {
    pub model: String,
    pub input: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub truncate: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Options>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keep_alive: Option<String>,
}

impl Validate for EmbeddingRequest {
    fn validate(&self) -> Result<()> {
        require_model(&self.model)?;
        if self.input.is_empty() {
            return Err(ClientError::validation(
                "input",
                "at least one input string is required",
            ));
        }
        Ok(())
    }
}

/// POST /api/show
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShowModelRequest {
    pub model: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub verbose: bool,
}

impl Validate for ShowModelRequest {
    fn validate(&self) -> Result<()> {
        require_model(&self.model)
    }
}

/// Body for create, delete, pull and push
///
/// Progress streaming is never requested; the server answers once.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelManagementRequest {
    pub model: String,
    /// Base model to create from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantize: Option<String>,
    /// Allow insecure registry connections (pull/push)
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub insecure: bool,
    /// Always false; these operations answer with one document
    #[serde(default)]
    stream: bool,
}

impl ModelManagementRequest {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            ..Default::default()
        }
    }

    pub fn from_model(mut self, base: impl Into<String>) -> Self {
        self.from = Some(base.into());
        self
    }

    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    pub fn with_template(mut self, template: impl Into<String>) -> Self {
        self.template = Some(template.into());
        self
    }

    pub fn with_quantize(mut self, quantize: impl Into<String>) -> Self {
        self.quantize = Some(quantize.into());
        self
    }

    pub fn insecure(mut self, insecure: bool) -> Self {
        self.insecure = insecure;
        self
    }
}

impl Validate for ModelManagementRequest {
    fn validate(&self) -> Result<()> {
        require_model(&self.model)
    }
}

/// POST /api/copy
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CopyModelRequest {
    pub source: String,
    pub destination: String,
}

impl Validate for CopyModelRequest {
    fn validate(&self) -> Result<()> {
        if self.source.trim().is_empty() {
            return Err(ClientError::validation("source", "source model is required"));
        }
        if self.destination.trim().is_empty() {
            return Err(ClientError::validation(
                "destination",
                "destination model is required",
            ));
        }
        Ok(())
    }
}
