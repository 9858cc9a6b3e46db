//! Model management handle
//!
//! Name-based convenience over the model endpoints. Progress streaming for
//! pull/push/create is never requested; each call waits for the final
//! status document.

use crate::api::endpoint::{
    CopyModel, CreateModel, DeleteModel, ListModels, PullModel, PushModel, ShowModel,
};
use crate::client::OllamaClient;
use crate::errors::Result;
use crate::types::{
    CopyModelRequest, ModelListResponse, ModelManagementRequest, ShowModelRequest,
    ShowModelResponse, StatusResponse,
};
use tokio_util::sync::CancellationToken;

/// Borrowed handle for list/show/create/delete/copy/pull/push
#[derive(Debug, Clone)]
pub struct ModelManager<'a> {
    client: &'a OllamaClient,
    cancel: Option<CancellationToken>,
}

impl<'a> ModelManager<'a> {
    pub fn new(client: &'a OllamaClient) -> Self {
        Self {
            client,
            cancel: None,
        }
    }

    /// Abort calls made through this handle when `token` fires
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub async fn list(&self) -> Result<ModelListResponse> {
        self.client
            .call::<ListModels>((), self.cancel.as_ref())
            .await
    }

    pub async fn show(&self, model: &str) -> Result<ShowModelResponse> {
        let request = ShowModelRequest {
            model: model.to_string(),
            verbose: false,
        };
        self.client
            .call::<ShowModel>(request, self.cancel.as_ref())
            .await
    }

    /// Create `model` from an existing base model
    pub async fn create(&self, model: &str, from: &str) -> Result<StatusResponse> {
        self.create_with(ModelManagementRequest::new(model).from_model(from))
            .await
    }

    /// Create from a fully specified request (system prompt, template, quantization)
    pub async fn create_with(&self, request: ModelManagementRequest) -> Result<StatusResponse> {
        self.client
            .call::<CreateModel>(request, self.cancel.as_ref())
            .await
    }

    pub async fn delete(&self, model: &str) -> Result<()> {
        self.client
            .call::<DeleteModel>(ModelManagementRequest::new(model), self.cancel.as_ref())
            .await
    }

    pub async fn copy(&self, source: &str, destination: &str) -> Result<()> {
        let request = CopyModelRequest {
            source: source.to_string(),
            destination: destination.to_string(),
        };
        self.client
            .call::<CopyModel>(request, self.cancel.as_ref())
            .await
    }

    pub async fn pull(&self, model: &str) -> Result<StatusResponse> {
        self.client
            .call::<PullModel>(ModelManagementRequest::new(model), self.cancel.as_ref())
            .await
    }

    pub async fn push(&self, model: &str) -> Result<StatusResponse> {
        self.client
            .call::<PushModel>(ModelManagementRequest::new(model), self.cancel.as_ref())
            .await
    }
}
