//! HTTP transport for the Ollama API
//!
//! Issues JSON requests against the configured base URL and either decodes
//! one JSON document or feeds the newline-delimited body through
//! [`NdjsonParser`] one chunk at a time.
//! - HTTP/1.1 via reqwest, one shared connection pool per transport
//! - Status >= 400 fails the call before any decoding
//! - No retries; the configured timeout covers every call, streamed or not

use crate::config::ClientConfig;
use crate::errors::{ClientError, Result};
use crate::logging::Logger;
use crate::streaming::parser::{pump, NdjsonParser};
use futures_util::StreamExt;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Method, Response, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::future::Future;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Shared HTTP transport
#[derive(Debug, Clone)]
pub struct Transport {
    client: Client,
    base_url: Url,
    api_key: Option<String>,
    timeout: Duration,
    logger: Logger,
}

impl Transport {
    /// Create transport from configuration
    pub fn new(config: &ClientConfig, logger: Logger) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(ClientError::HttpError)?;

        Self::with_http_client(config, client, logger)
    }

    /// Create transport over a caller-built HTTP client
    ///
    /// The client keeps its own proxy, TLS, pool and default-header
    /// settings. The configured timeout is still applied to every request.
    pub fn with_http_client(config: &ClientConfig, client: Client, logger: Logger) -> Result<Self> {
        config.validate()?;

        let base_url = Url::parse(&config.base_url)
            .map_err(|e| ClientError::ConfigError(format!("Invalid base URL: {}", e)))?;

        Ok(Self {
            client,
            base_url,
            api_key: config.api_key.clone(),
            timeout: config.timeout(),
            logger,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn logger(&self) -> &Logger {
        &self.logger
    }

    /// Single-shot call: one request, one decoded JSON document
    ///
    /// An empty response body decodes as JSON `null`, so `R = ()` accepts
    /// endpoints that answer with nothing.
    pub async fn invoke<B, R>(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&B>,
        cancel: Option<&CancellationToken>,
    ) -> Result<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let call = async {
            let response = self.send(method, endpoint, body).await?;

            let bytes = response.bytes().await.map_err(|e| self.map_error(e))?;
            let document: &[u8] = if bytes.iter().all(u8::is_ascii_whitespace) {
                b"null"
            } else {
                &bytes
            };

            if self.logger.debug_enabled() {
                self.logger.debug(format!(
                    "Response body: {}",
                    String::from_utf8_lossy(document)
                ));
            }

            let decoded: R = serde_json::from_slice(document).map_err(|e| {
                self.logger
                    .error(format!("Failed to decode response: {}", e));
                ClientError::JsonParseError(format!("Failed to decode response: {}", e))
            })?;

            self.logger.debug("Successfully decoded response");
            Ok::<R, ClientError>(decoded)
        };

        with_cancel(cancel, call).await
    }

    /// Streaming call: every newline-terminated JSON line goes to `on_chunk`
    ///
    /// Returns once the server closes the stream and the last chunk has been
    /// handled; the result is the number of chunks delivered.
    pub async fn invoke_streaming<B, R, F>(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&B>,
        cancel: Option<&CancellationToken>,
        on_chunk: F,
    ) -> Result<usize>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
        F: FnMut(R),
    {
        let response = with_cancel(cancel, self.send(method, endpoint, body)).await?;

        self.logger.debug("Starting to process stream");
        let chunks = response
            .bytes_stream()
            .map(|item| item.map_err(|e| self.map_error(e)));

        let mut parser = NdjsonParser::new();
        let delivered = pump(chunks, &mut parser, &self.logger, cancel, on_chunk).await?;

        self.logger.debug("Streaming request completed successfully");
        Ok(delivered)
    }

    /// Build and send a request, failing on any status >= 400
    async fn send<B>(&self, method: Method, endpoint: &str, body: Option<&B>) -> Result<Response>
    where
        B: Serialize + ?Sized,
    {
        let url = self.url(endpoint)?;
        self.logger
            .debug(format!("Making {} request to {}", method, url));

        let payload = match body {
            Some(body) => serde_json::to_vec(body).map_err(|e| {
                self.logger
                    .error(format!("Failed to marshal request body: {}", e));
                ClientError::SerializationError(e)
            })?,
            None => Vec::new(),
        };

        if self.logger.debug_enabled() && !payload.is_empty() {
            self.logger.debug(format!(
                "Request body: {}",
                String::from_utf8_lossy(&payload)
            ));
        }

        let mut request = self
            .client
            .request(method, url.clone())
            .timeout(self.timeout)
            .header(CONTENT_TYPE, "application/json")
            .body(payload);

        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await.map_err(|e| {
            self.logger.error(format!("Request failed: {}", e));
            self.map_error(e)
        })?;

        let status = response.status();
        self.logger
            .debug(format!("Received response with status: {}", status));

        if status.as_u16() >= 400 {
            let text = response.text().await.unwrap_or_default();
            let message = error_message(&text, status.canonical_reason());
            self.logger.error(format!(
                "API request to {} failed with status {}: {}",
                url, status, message
            ));
            return Err(ClientError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response)
    }

    fn url(&self, endpoint: &str) -> Result<Url> {
        let joined = format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            endpoint.trim_start_matches('/')
        );
        Url::parse(&joined)
            .map_err(|e| ClientError::ConfigError(format!("Invalid endpoint '{}': {}", endpoint, e)))
    }

    fn map_error(&self, err: reqwest::Error) -> ClientError {
        if err.is_timeout() {
            ClientError::Timeout {
                duration_ms: self.timeout.as_millis() as u64,
            }
        } else if err.is_body() || err.is_decode() {
            ClientError::StreamingError(err.to_string())
        } else {
            ClientError::HttpError(err)
        }
    }
}

/// Race a call against the caller's cancellation token
async fn with_cancel<T>(
    cancel: Option<&CancellationToken>,
    call: impl Future<Output = Result<T>>,
) -> Result<T> {
    match cancel {
        Some(token) => tokio::select! {
            biased;
            _ = token.cancelled() => Err(ClientError::Cancelled),
            result = call => result,
        },
        None => call.await,
    }
}

/// Pull the server's `{"error": "..."}` message out of a failure body
fn error_message(body: &str, reason: Option<&str>) -> String {
    if let Ok(json) = serde_json::from_str::<serde_json::Value>(body) {
        if let Some(message) = json.get("error").and_then(|e| e.as_str()) {
            return message.to_string();
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        reason.unwrap_or("Unknown error").to_string()
    } else {
        trimmed.to_string()
    }
}
