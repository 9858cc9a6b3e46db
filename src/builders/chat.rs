//! Chat request builder

use crate::api::endpoint::Chat;
use crate::builders::tune;
use crate::client::OllamaClient;
use crate::errors::Result;
use crate::types::{ChatRequest, ChatResponse, Message, Options, Tool, ToolCallResult};
use serde_json::Value;
use tokio_util::sync::CancellationToken;

/// Builds and sends one `/api/chat` request
#[derive(Debug, Clone)]
#[must_use = "a builder does nothing until `execute` or `stream` is called"]
pub struct ChatBuilder<'a> {
    client: &'a OllamaClient,
    request: ChatRequest,
    cancel: Option<CancellationToken>,
}

impl<'a> ChatBuilder<'a> {
    pub fn new(client: &'a OllamaClient) -> Self {
        Self {
            client,
            request: ChatRequest::default(),
            cancel: None,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.request.model = model.into();
        self
    }

    pub fn with_system_message(self, content: impl Into<String>) -> Self {
        self.with_message(Message::system(content))
    }

    pub fn with_user_message(self, content: impl Into<String>) -> Self {
        self.with_message(Message::user(content))
    }

    pub fn with_assistant_message(self, content: impl Into<String>) -> Self {
        self.with_message(Message::assistant(content))
    }

    /// Append one message to the conversation
    pub fn with_message(mut self, message: Message) -> Self {
        self.request.messages.push(message);
        self
    }

    /// Replace the whole conversation
    pub fn with_messages(mut self, messages: Vec<Message>) -> Self {
        self.request.messages = messages;
        self
    }

    pub fn with_tool(mut self, tool: Tool) -> Self {
        self.request.tools.push(tool);
        self
    }

    pub fn with_tools(mut self, tools: impl IntoIterator<Item = Tool>) -> Self {
        self.request.tools.extend(tools);
        self
    }

    /// Feed a tool's outcome back to the model as a `tool` message
    pub fn with_tool_result(self, tool_name: &str, result: &ToolCallResult) -> Self {
        self.with_message(Message::tool_result(tool_name, result))
    }

    /// `"json"` or a JSON schema the reply must follow
    pub fn with_format(mut self, format: impl Into<Value>) -> Self {
        self.request.format = Some(format.into());
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

    pub fn with_seed(mut self, seed: i64) -> Self {
        tune(&mut self.request.options, |o| o.seed(seed));
        self
    }

    pub fn with_num_ctx(mut self, num_ctx: u32) -> Self {
        tune(&mut self.request.options, |o| o.num_ctx(num_ctx));
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// The request as accumulated so far
    pub fn request(&self) -> &ChatRequest {
        &self.request
    }

    /// Send with `stream: false` and return the single reply
    pub async fn execute(self) -> Result<ChatResponse> {
        self.client
            .call::<Chat>(self.request, self.cancel.as_ref())
            .await
    }

    /// Send with `stream: true`, passing every chunk to `callback` in order
    ///
    /// Returns the number of chunks delivered.
    pub async fn stream<F>(self, callback: F) -> Result<usize>
    where
        F: FnMut(ChatResponse),
    {
        self.client
            .call_streaming::<Chat, F>(self.request, self.cancel.as_ref(), callback)
            .await
    }
}
