//! Ollama API client
//!
//! `OllamaClient` owns one [`Transport`] and exposes every endpoint as a
//! typed async method. It is cheap to clone and safe to share across tasks;
//! clones reuse the same connection pool and logger.

use crate::api::endpoint::{
    Chat, CopyModel, CreateModel, DeleteModel, Embed, Endpoint, Generate, ListModels, PullModel,
    PushModel, RunningModels, ShowModel, StreamingEndpoint, Version,
};
use crate::api::{ModelManager, StatusManager};
use crate::builders::{ChatBuilder, CompletionBuilder, EmbeddingsBuilder};
use crate::config::ClientConfig;
use crate::errors::Result;
use crate::logging::Logger;
use crate::streaming::Transport;
use crate::types::{
    ChatRequest, ChatResponse, CompletionRequest, CompletionResponse, CopyModelRequest,
    EmbeddingRequest, EmbeddingResponse, ModelListResponse, ModelManagementRequest,
    ModelProcessResponse, ShowModelRequest, ShowModelResponse, StatusResponse, Validate,
    VersionResponse,
};
use tokio_util::sync::CancellationToken;

/// Typed client for a local Ollama server
#[derive(Debug, Clone)]
pub struct OllamaClient {
    transport: Transport,
    config: ClientConfig,
}

impl OllamaClient {
    /// Create a client that logs nothing
    pub fn new(config: ClientConfig) -> Result<Self> {
        Self::with_logger(config, Logger::noop())
    }

    /// Create a client from `OLLAMA_*` environment variables, logging through `tracing`
    pub fn from_env() -> Result<Self> {
        let config = ClientConfig::from_env()?;
        let logger = Logger::tracing(config.effective_log_level());
        Self::with_logger(config, logger)
    }

    /// Create a client with an injected logger
    ///
    /// `config.debug` raises the logger to debug level.
    pub fn with_logger(config: ClientConfig, logger: Logger) -> Result<Self> {
        if config.debug {
            logger.set_level(config.effective_log_level());
        }
        let transport = Transport::new(&config, logger)?;
        Ok(Self::from_parts(transport, config))
    }

    /// Create a client over a preconfigured `reqwest::Client`
    ///
    /// Use this for proxies, custom TLS roots, connection pool tuning or
    /// default headers. `config` still supplies the base URL, API key and
    /// per-request timeout.
    pub fn with_http_client(
        config: ClientConfig,
        http_client: reqwest::Client,
        logger: Logger,
    ) -> Result<Self> {
        if config.debug {
            logger.set_level(config.effective_log_level());
        }
        let transport = Transport::with_http_client(&config, http_client, logger)?;
        Ok(Self::from_parts(transport, config))
    }

    fn from_parts(transport: Transport, config: ClientConfig) -> Self {
        transport.logger().debug(format!(
            "Created client for {} (timeout {}s)",
            config.base_url, config.timeout_secs
        ));
        Self { transport, config }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn logger(&self) -> &Logger {
        self.transport.logger()
    }

    pub fn transport(&self) -> &Transport {
        &self.transport
    }

    pub fn chat_builder(&self) -> ChatBuilder<'_> {
        ChatBuilder::new(self)
    }

    pub fn completion_builder(&self) -> CompletionBuilder<'_> {
        CompletionBuilder::new(self)
    }

    pub fn embeddings_builder(&self) -> EmbeddingsBuilder<'_> {
        EmbeddingsBuilder::new(self)
    }

    pub fn models(&self) -> ModelManager<'_> {
        ModelManager::new(self)
    }

    pub fn status(&self) -> StatusManager<'_> {
        StatusManager::new(self)
    }

    /// Invoke any endpoint once and decode its single response document
    ///
    /// Streaming-capable requests are forced into single-document mode.
    /// The request is validated before anything is sent.
    pub async fn call<E: Endpoint>(
        &self,
        mut request: E::Request,
        cancel: Option<&CancellationToken>,
    ) -> Result<E::Response> {
        E::single_shot(&mut request);
        request.validate()?;

        let body = if E::SENDS_BODY { Some(&request) } else { None };
        self.transport
            .invoke(E::METHOD, E::PATH, body, cancel)
            .await
    }

    /// Invoke a streaming endpoint, delivering each chunk to `on_chunk`
    ///
    /// Returns the number of chunks delivered once the server closes the
    /// stream.
    pub async fn call_streaming<E, F>(
        &self,
        mut request: E::Request,
        cancel: Option<&CancellationToken>,
        on_chunk: F,
    ) -> Result<usize>
    where
        E: StreamingEndpoint,
        F: FnMut(E::Response),
    {
        *E::stream_flag(&mut request) = true;
        request.validate()?;

        self.transport
            .invoke_streaming(E::METHOD, E::PATH, Some(&request), cancel, on_chunk)
            .await
    }

    /// Route on the request's own stream flag
    pub(crate) async fn dispatch<E, F>(
        &self,
        mut request: E::Request,
        cancel: Option<&CancellationToken>,
        on_chunk: F,
    ) -> Result<Option<E::Response>>
    where
        E: StreamingEndpoint,
        F: FnMut(E::Response),
    {
        if *E::stream_flag(&mut request) {
            self.call_streaming::<E, F>(request, cancel, on_chunk).await?;
            Ok(None)
        } else {
            self.call::<E>(request, cancel).await.map(Some)
        }
    }

    /// Send a chat request
    ///
    /// With `stream == false` the single response comes back as `Some` and
    /// `on_chunk` is never called. With `stream == true` every chunk goes
    /// through `on_chunk` in arrival order and the call returns `None` after
    /// the last one.
    pub async fn chat<F>(&self, request: ChatRequest, on_chunk: F) -> Result<Option<ChatResponse>>
    where
        F: FnMut(ChatResponse),
    {
        self.dispatch::<Chat, F>(request, None, on_chunk).await
    }

    /// Send a completion request; same streaming contract as [`chat`](Self::chat)
    pub async fn generate<F>(
        &self,
        request: CompletionRequest,
        on_chunk: F,
    ) -> Result<Option<CompletionResponse>>
    where
        F: FnMut(CompletionResponse),
    {
        self.dispatch::<Generate, F>(request, None, on_chunk).await
    }

    pub async fn embed(&self, request: EmbeddingRequest) -> Result<EmbeddingResponse> {
        self.call::<Embed>(request, None).await
    }

    pub async fn list_models(&self) -> Result<ModelListResponse> {
        self.call::<ListModels>((), None).await
    }

    pub async fn show_model(&self, request: ShowModelRequest) -> Result<ShowModelResponse> {
        self.call::<ShowModel>(request, None).await
    }

    pub async fn create_model(&self, request: ModelManagementRequest) -> Result<StatusResponse> {
        self.call::<CreateModel>(request, None).await
    }

    pub async fn delete_model(&self, model: &str) -> Result<()> {
        self.call::<DeleteModel>(ModelManagementRequest::new(model), None)
            .await
    }

    pub async fn copy_model(&self, source: &str, destination: &str) -> Result<()> {
        let request = CopyModelRequest {
            source: source.to_string(),
            destination: destination.to_string(),
        };
        self.call::<CopyModel>(request, None).await
    }

    pub async fn pull_model(&self, request: ModelManagementRequest) -> Result<StatusResponse> {
        self.call::<PullModel>(request, None).await
    }

    pub async fn push_model(&self, request: ModelManagementRequest) -> Result<StatusResponse> {
        self.call::<PushModel>(request, None).await
    }

    pub async fn version(&self) -> Result<VersionResponse> {
        self.call::<Version>((), None).await
    }

    pub async fn running_models(&self) -> Result<ModelProcessResponse> {
        self.call::<RunningModels>((), None).await
    }
}
