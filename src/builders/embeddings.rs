//! Embeddings request builder
//!
//! Embeddings never stream, so there is only `execute()`.

use crate::api::endpoint::Embed;
use crate::client::OllamaClient;
use crate::errors::Result;
use crate::types::{EmbeddingRequest, EmbeddingResponse, Options};
use tokio_util::sync::CancellationToken;

/// Builds and sends one `/api/embed` request
#[derive(Debug, Clone)]
#[must_use = "a builder does nothing until `execute` is called"]
pub struct EmbeddingsBuilder<'a> {
    client: &'a OllamaClient,
    request: EmbeddingRequest,
    cancel: Option<CancellationToken>,
}

impl<'a> EmbeddingsBuilder<'a> {
    pub fn new(client: &'a OllamaClient) -> Self {
        Self {
            client,
            request: EmbeddingRequest::default(),
            cancel: None,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.request.model = model.into();
        self
    }

    /// Append one input string
    pub fn with_input(mut self, input: impl Into<String>) -> Self {
        self.request.input.push(input.into());
        self
    }

    /// Replace all input strings
    pub fn with_inputs<I, S>(mut self, inputs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.request.input = inputs.into_iter().map(Into::into).collect();
        self
    }

    /// Truncate inputs that exceed the context length instead of failing
    pub fn with_truncate(mut self, truncate: bool) -> Self {
        self.request.truncate = Some(truncate);
        self
    }

    pub fn with_keep_alive(mut self, keep_alive: impl Into<String>) -> Self {
        self.request.keep_alive = Some(keep_alive.into());
        self
    }

    pub fn with_options(mut self, options: Options) -> Self {
        self.request.options = Some(options);
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn request(&self) -> &EmbeddingRequest {
        &self.request
    }

    pub async fn execute(self) -> Result<EmbeddingResponse> {
        self.client
            .call::<Embed>(self.request, self.cancel.as_ref())
            .await
    }
}
