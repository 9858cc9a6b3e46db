//! Server status handle

use crate::api::endpoint::{RunningModels, Version};
use crate::client::OllamaClient;
use crate::errors::Result;
use crate::types::{ModelProcessResponse, VersionResponse};
use tokio_util::sync::CancellationToken;

/// Borrowed handle for version and running-model queries
#[derive(Debug, Clone)]
pub struct StatusManager<'a> {
    client: &'a OllamaClient,
    cancel: Option<CancellationToken>,
}

impl<'a> StatusManager<'a> {
    pub fn new(client: &'a OllamaClient) -> Self {
        Self {
            client,
            cancel: None,
        }
    }

    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub async fn version(&self) -> Result<VersionResponse> {
        self.client.call::<Version>((), self.cancel.as_ref()).await
    }

    /// Models currently loaded in memory
    pub async fn running(&self) -> Result<ModelProcessResponse> {
        self.client
            .call::<RunningModels>((), self.cancel.as_ref())
            .await
    }
}
