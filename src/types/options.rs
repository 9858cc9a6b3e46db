//! Sampling and generation options
//!
//! Every field is optional; an unset field is left out of the JSON body so
//! the server applies its own default.

use serde::{Deserialize, Serialize};

/// Model sampling/generation parameters
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Options {
    /// Creativity vs. coherence
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,

    /// Nucleus sampling threshold
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,

    /// Limit sampling to the K most likely tokens
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_k: Option<u32>,

    /// Mirostat mode (0 = off, 1 = Mirostat, 2 = Mirostat 2.0)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mirostat: Option<u8>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub mirostat_tau: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub mirostat_eta: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub repeat_penalty: Option<f64>,

    /// How far back to look when penalizing repeats
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repeat_last_n: Option<i32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequency_penalty: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub presence_penalty: Option<f64>,

    /// Tail free sampling
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tfs: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_a: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub typical_p: Option<f64>,

    /// Grammar the output must conform to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grammar: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<i64>,

    /// Maximum tokens to generate (-1 = unlimited)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_predict: Option<i32>,

    /// Context window size
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_ctx: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop: Option<Vec<String>>,
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when no field is set
    pub fn is_empty(&self) -> bool {
        self == &Options::default()
    }

    pub fn temperature(mut self, value: f64) -> Self {
        self.temperature = Some(value);
        self
    }

    pub fn top_p(mut self, value: f64) -> Self {
        self.top_p = Some(value);
        self
    }

    pub fn top_k(mut self, value: u32) -> Self {
        self.top_k = Some(value);
        self
    }

    pub fn mirostat(mut self, mode: u8) -> Self {
        self.mirostat = Some(mode);
        self
    }

    pub fn mirostat_tau(mut self, value: f64) -> Self {
        self.mirostat_tau = Some(value);
        self
    }

    pub fn mirostat_eta(mut self, value: f64) -> Self {
        self.mirostat_eta = Some(value);
        self
    }

    pub fn repeat_penalty(mut self, value: f64) -> Self {
        self.repeat_penalty = Some(value);
        self
    }

    pub fn repeat_last_n(mut self, value: i32) -> Self {
        self.repeat_last_n = Some(value);
        self
    }

    pub fn frequency_penalty(mut self, value: f64) -> Self {
        self.frequency_penalty = Some(value);
        self
    }

    pub fn presence_penalty(mut self, value: f64) -> Self {
        self.presence_penalty = Some(value);
        self
    }

    pub fn tfs(mut self, value: f64) -> Self {
        self.tfs = Some(value);
        self
    }

    pub fn top_a(mut self, value: f64) -> Self {
        self.top_a = Some(value);
        self
    }

    pub fn typical_p(mut self, value: f64) -> Self {
        self.typical_p = Some(value);
        self
    }

    pub fn grammar(mut self, grammar: impl Into<String>) -> Self {
        self.grammar = Some(grammar.into());
        self
    }

    pub fn seed(mut self, seed: i64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn num_predict(mut self, value: i32) -> Self {
        self.num_predict = Some(value);
        self
    }

    pub fn num_ctx(mut self, value: u32) -> Self {
        self.num_ctx = Some(value);
        self
    }

    pub fn stop<I, S>(mut self, sequences: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.stop = Some(sequences.into_iter().map(Into::into).collect());
        self
    }
}
