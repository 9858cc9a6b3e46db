//! Per-endpoint response payloads
//!
//! A streamed chat or completion arrives as a sequence of partial responses;
//! only the last one has `done == true` and carries the timing counters.

use crate::types::messages::Message;
use crate::types::tools::ToolCall;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Reply to a chat request, or one streamed delta of it
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub model: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub message: Message,
    #[serde(default)]
    pub done: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub done_reason: Option<String>,
    #[serde(flatten)]
    pub stats: GenerationStats,
}

impl ChatResponse {
    /// Tool calls the model requested in this message
    pub fn tool_calls(&self) -> &[ToolCall] {
        &self.message.tool_calls
    }
}

/// Reply to a completion request, or one streamed delta of it
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompletionResponse {
    #[serde(default)]
    pub model: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub response: String,
    #[serde(default)]
    pub done: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub done_reason: Option<String>,
    /// Encoded conversation state to pass into the next request
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub context: Vec<i64>,
    #[serde(flatten)]
    pub stats: GenerationStats,
}

/// Timing and token counters reported on the final chunk (nanoseconds)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationStats {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_duration: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub load_duration: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_eval_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_eval_duration: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eval_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eval_duration: Option<u64>,
}

impl GenerationStats {
    /// Generated tokens per second, when the server reported both counters
    pub fn tokens_per_second(&self) -> Option<f64> {
        match (self.eval_count, self.eval_duration) {
            (Some(count), Some(duration)) if duration > 0 => {
                Some(count as f64 / (duration as f64 / 1_000_000_000.0))
            }
            _ => None,
        }
    }
}

/// Embedding vectors, one per input string, in input order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmbeddingResponse {
    #[serde(default)]
    pub model: String,
    pub embeddings: Vec<Vec<f32>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_duration: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_eval_count: Option<u64>,
}

impl EmbeddingResponse {
    /// Length shared by all vectors, None if empty or ragged
    pub fn dimensions(&self) -> Option<usize> {
        let first = self.embeddings.first()?.len();
        self.embeddings
            .iter()
            .all(|e| e.len() == first)
            .then_some(first)
    }
}

/// Model format and size metadata
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub families: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameter_size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantization_level: Option<String>,
}

/// Locally installed model (GET /api/tags)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelInfo {
    pub name: String,
    #[serde(default)]
    pub model: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub digest: String,
    #[serde(default)]
    pub details: ModelDetails,
}

impl ModelInfo {
    /// Format the model size in human-readable format
    pub fn formatted_size(&self) -> String {
        format_size(self.size)
    }

    /// Short description: parameter size and quantization, or the size
    pub fn description(&self) -> String {
        let parts: Vec<&str> = [
            self.details.parameter_size.as_deref(),
            self.details.quantization_level.as_deref(),
        ]
        .into_iter()
        .flatten()
        .collect();

        if parts.is_empty() {
            self.formatted_size()
        } else {
            parts.join(" ")
        }
    }
}

impl fmt::Display for ModelInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.formatted_size())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelListResponse {
    #[serde(default)]
    pub models: Vec<ModelInfo>,
}

/// POST /api/show
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShowModelResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modelfile: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    #[serde(default)]
    pub details: ModelDetails,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub model_info: HashMap<String, serde_json::Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub capabilities: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified_at: Option<DateTime<Utc>>,
}

/// Status answer from create, pull and push
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatusResponse {
    #[serde(default)]
    pub status: String,
}

impl StatusResponse {
    pub fn is_success(&self) -> bool {
        self.status == "success"
    }
}

/// GET /api/version
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VersionResponse {
    pub version: String,
}

/// Model currently loaded in memory (GET /api/ps)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelProcess {
    pub name: String,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub digest: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(default, alias = "vram_size")]
    pub size_vram: u64,
    #[serde(default)]
    pub details: ModelDetails,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelProcessResponse {
    #[serde(default)]
    pub models: Vec<ModelProcess>,
}

/// Format bytes into human-readable size
pub fn format_size(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];

    if bytes == 0 {
        return "0 B".to_string();
    }

    let base: f64 = 1024.0;
    let exponent = (bytes as f64).log(base).floor() as usize;
    let exponent = exponent.min(UNITS.len() - 1);

    let size = bytes as f64 / base.powi(exponent as i32);

    format!("{:.2} {}", size, UNITS[exponent])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::messages::Role;
    use serde_json::json;

    #[test]
    fn test_streamed_chat_chunk_decodes() {
        let chunk: ChatResponse = serde_json::from_value(json!({
            "model": "llama3",
            "created_at": "2024-07-22T20:33:28.123648Z",
            "message": {"role": "assistant", "content": "The"},
            "done": false
        }))
        .unwrap();

        assert_eq!(chunk.message.role, Role::Assistant);
        assert_eq!(chunk.message.content, "The");
        assert!(!chunk.done);
        assert!(chunk.stats.eval_count.is_none());
        assert!(chunk.created_at.is_some());
    }

    #[test]
    fn test_final_chat_chunk_carries_stats() {
        let chunk: ChatResponse = serde_json::from_value(json!({
            "model": "llama3",
            "message": {"role": "assistant", "content": ""},
            "done": true,
            "done_reason": "stop",
            "total_duration": 5_000_000_000u64,
            "eval_count": 100,
            "eval_duration": 2_000_000_000u64
        }))
        .unwrap();

        assert!(chunk.done);
        assert_eq!(chunk.done_reason.as_deref(), Some("stop"));
        assert_eq!(chunk.stats.tokens_per_second(), Some(50.0));
    }

    #[test]
    fn test_completion_response_context() {
        let resp: CompletionResponse = serde_json::from_value(json!({
            "model": "llama3",
            "response": "Hello",
            "done": true,
            "context": [1, 2, 3]
        }))
        .unwrap();
        assert_eq!(resp.context, vec![1, 2, 3]);
    }

    #[test]
    fn test_embedding_dimensions() {
        let resp = EmbeddingResponse {
            embeddings: vec![vec![0.1, 0.2, 0.3], vec![0.4, 0.5, 0.6]],
            ..Default::default()
        };
        assert_eq!(resp.dimensions(), Some(3));

        let ragged = EmbeddingResponse {
            embeddings: vec![vec![0.1], vec![0.4, 0.5]],
            ..Default::default()
        };
        assert_eq!(ragged.dimensions(), None);
        assert_eq!(EmbeddingResponse::default().dimensions(), None);
    }

    #[test]
    fn test_model_list_decodes() {
        let resp: ModelListResponse = serde_json::from_value(json!({
            "models": [{
                "name": "llama3:latest",
                "model": "llama3:latest",
                "modified_at": "2024-05-01T10:00:00Z",
                "size": 4683087332u64,
                "digest": "365c0bd3c000",
                "details": {
                    "format": "gguf",
                    "family": "llama",
                    "parameter_size": "8.0B",
                    "quantization_level": "Q4_0"
                }
            }]
        }))
        .unwrap();

        let model = &resp.models[0];
        assert_eq!(model.formatted_size(), "4.36 GB");
        assert_eq!(model.description(), "8.0B Q4_0");
        assert_eq!(model.to_string(), "llama3:latest (4.36 GB)");
    }

    #[test]
    fn test_model_description_without_details() {
        let info = ModelInfo {
            name: "test:latest".to_string(),
            model: String::new(),
            modified_at: None,
            size: 1073741824,
            digest: "abc123".to_string(),
            details: ModelDetails::default(),
        };
        assert_eq!(info.description(), "1.00 GB");
    }

    #[test]
    fn test_process_accepts_legacy_vram_key() {
        let proc: ModelProcess = serde_json::from_value(json!({
            "name": "llama3",
            "vram_size": 1024
        }))
        .unwrap();
        assert_eq!(proc.size_vram, 1024);
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(0), "0 B");
        assert_eq!(format_size(500), "500.00 B");
        assert_eq!(format_size(1536), "1.50 KB");
        assert_eq!(format_size(5242880), "5.00 MB");
        assert_eq!(format_size(1073741824), "1.00 GB");
    }

    #[test]
    fn test_status_response() {
        let resp: StatusResponse = serde_json::from_value(json!({"status": "success"})).unwrap();
        assert!(resp.is_success());
    }
}
