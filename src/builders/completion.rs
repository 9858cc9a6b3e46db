//! Completion request builder

use crate::api::endpoint::Generate;
use crate::builders::tune;
use crate::client::OllamaClient;
use crate::errors::Result;
use crate::types::{CompletionRequest, CompletionResponse, Options};
use serde_json::Value;
use tokio_util::sync::CancellationToken;

/// Builds and sends one `/api/generate` request
#[derive(Debug, Clone)]
#[must_use = "a builder does nothing until `execute` or `stream` is called"]
pub struct CompletionBuilder<'a> {
    client: &'a OllamaClient,
    request: CompletionRequest,
    cancel: Option<CancellationToken>,
}

impl<'a> CompletionBuilder<'a> {
    pub fn new(client: &'a OllamaClient) -> Self {
        Self {
            client,
            request: CompletionRequest::default(),
            cancel: None,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.request.model = model.into();
        self
    }

    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.request.prompt = prompt.into();
        self
    }

    /// Text after the insertion point, for fill-in-the-middle models
    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.request.suffix = Some(suffix.into());
        self
    }

    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.request.system = Some(system.into());
        self
    }

    /// Base64-encoded images
    pub fn with_images<I, S>(mut self, images: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.request.images.extend(images.into_iter().map(Into::into));
        self
    }

    pub fn with_format(mut self, format: impl Into<Value>) -> Self {
        self.request.format = Some(format.into());
        self
    }

    /// Skip the model's prompt template
    pub fn with_raw(mut self, raw: bool) -> Self {
        self.request.raw = raw;
        self
    }

    /// Continue from the `context` of a previous completion
    pub fn with_context(mut self, context: Vec<i64>) -> Self {
        self.request.context = context;
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

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        tune(&mut self.request.options, |o| o.temperature(temperature));
        self
    }

    pub fn with_top_p(mut self, top_p: f64) -> Self {
        tune(&mut self.request.options, |o| o.top_p(top_p));
        self
    }

    pub fn with_top_k(mut self, top_k: u32) -> Self {
        tune(&mut self.request.options, |o| o.top_k(top_k));
        self
    }

    pub fn with_num_predict(mut self, num_predict: i32) -> Self {
        tune(&mut self.request.options, |o| o.num_predict(num_predict));
        self
    }

    pub fn with_stop<I, S>(mut self, sequences: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        tune(&mut self.request.options, |o| o.stop(sequences));
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn request(&self) -> &CompletionRequest {
        &self.request
    }

    /// Send with `stream: false` and return the single reply
    pub async fn execute(self) -> Result<CompletionResponse> {
        self.client
            .call::<Generate>(self.request, self.cancel.as_ref())
            .await
    }

    /// Send with `stream: true`, passing every chunk to `callback` in order
    pub async fn stream<F>(self, callback: F) -> Result<usize>
    where
        F: FnMut(CompletionResponse),
    {
        self.client
            .call_streaming::<Generate, F>(self.request, self.cancel.as_ref(), callback)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;

    #[test]
    fn test_completion_builder() {
        let client = OllamaClient::new(ClientConfig::default()).unwrap();
        let builder = client
            .completion_builder()
            .with_model("codellama")
            .with_prompt("def add(a, b):")
            .with_suffix("return result")
            .with_raw(true)
            .with_num_predict(32)
            .with_stop(["\n\n"]);

        let req = builder.request();
        assert_eq!(req.model, "codellama");
        assert_eq!(req.suffix.as_deref(), Some("return result"));
        assert!(req.raw);
        assert!(!req.stream);

        let options = req.options.as_ref().unwrap();
        assert_eq!(options.num_predict, Some(32));
        assert_eq!(options.stop, Some(vec!["\n\n".to_string()]));
    }

    #[test]
    fn test_images_accumulate() {
        let client = OllamaClient::new(ClientConfig::default()).unwrap();
        let builder = client
            .completion_builder()
            .with_images(["aGVsbG8="])
            .with_images(vec![String::from("d29ybGQ=")]);
        assert_eq!(builder.request().images.len(), 2);
    }
}
