//! Endpoint bindings
//!
//! Each endpoint is a zero-sized type tying one request shape and one
//! response shape to a method/path pair. Only chat and generate implement
//! [`StreamingEndpoint`], so asking any other operation to stream does not
//! compile.

use crate::types::{
    ChatRequest, ChatResponse, CompletionRequest, CompletionResponse, CopyModelRequest,
    EmbeddingRequest, EmbeddingResponse, ModelListResponse, ModelManagementRequest,
    ModelProcessResponse, ShowModelRequest, ShowModelResponse, StatusResponse, Validate,
    VersionResponse,
};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// One REST operation
pub trait Endpoint {
    type Request: Serialize + Validate + Sync;
    type Response: DeserializeOwned;

    const METHOD: Method;
    const PATH: &'static str;
    /// GET endpoints send no payload
    const SENDS_BODY: bool = true;

    /// Put the request into single-document mode before a plain call
    fn single_shot(_request: &mut Self::Request) {}
}

/// Operations whose response can arrive as a stream of chunks
///
/// Every chunk decodes as `Self::Response`; the last one has `done == true`.
pub trait StreamingEndpoint: Endpoint {
    fn stream_flag(request: &mut Self::Request) -> &mut bool;
}

/// POST /api/chat
#[derive(Debug, Clone, Copy)]
pub struct Chat;

impl Endpoint for Chat {
    type Request = ChatRequest;
    type Response = ChatResponse;
    const METHOD: Method = Method::POST;
    const PATH: &'static str = "/api/chat";

    fn single_shot(request: &mut ChatRequest) {
        request.stream = false;
    }
}

impl StreamingEndpoint for Chat {
    fn stream_flag(request: &mut ChatRequest) -> &mut bool {
        &mut request.stream
    }
}

/// POST /api/generate
#[derive(Debug, Clone, Copy)]
pub struct Generate;

impl Endpoint for Generate {
    type Request = CompletionRequest;
    type Response = CompletionResponse;
    const METHOD: Method = Method::POST;
    const PATH: &'static str = "/api/generate";

    fn single_shot(request: &mut CompletionRequest) {
        request.stream = false;
    }
}

impl StreamingEndpoint for Generate {
    fn stream_flag(request: &mut CompletionRequest) -> &mut bool {
        &mut request.stream
    }
}

/// POST /api/embed
#[derive(Debug, Clone, Copy)]
pub struct Embed;

impl Endpoint for Embed {
    type Request = EmbeddingRequest;
    type Response = EmbeddingResponse;
    const METHOD: Method = Method::POST;
    const PATH: &'static str = "/api/embed";
}

/// GET /api/tags
#[derive(Debug, Clone, Copy)]
pub struct ListModels;

impl Endpoint for ListModels {
    type Request = ();
    type Response = ModelListResponse;
    const METHOD: Method = Method::GET;
    const PATH: &'static str = "/api/tags";
    const SENDS_BODY: bool = false;
}

/// POST /api/show
#[derive(Debug, Clone, Copy)]
pub struct ShowModel;

impl Endpoint for ShowModel {
    type Request = ShowModelRequest;
    type Response = ShowModelResponse;
    const METHOD: Method = Method::POST;
    const PATH: &'static str = "/api/show";
}

/// POST /api/create
#[derive(Debug, Clone, Copy)]
pub struct CreateModel;

impl Endpoint for CreateModel {
    type Request = ModelManagementRequest;
    type Response = StatusResponse;
    const METHOD: Method = Method::POST;
    const PATH: &'static str = "/api/create";
}

/// DELETE /api/delete; the server answers with an empty body
#[derive(Debug, Clone, Copy)]
pub struct DeleteModel;

impl Endpoint for DeleteModel {
    type Request = ModelManagementRequest;
    type Response = ();
    const METHOD: Method = Method::DELETE;
    const PATH: &'static str = "/api/delete";
}

/// POST /api/copy
#[derive(Debug, Clone, Copy)]
pub struct CopyModel;

impl Endpoint for CopyModel {
    type Request = CopyModelRequest;
    type Response = ();
    const METHOD: Method = Method::POST;
    const PATH: &'static str = "/api/copy";
}

/// POST /api/pull
#[derive(Debug, Clone, Copy)]
pub struct PullModel;

impl Endpoint for PullModel {
    type Request = ModelManagementRequest;
    type Response = StatusResponse;
    const METHOD: Method = Method::POST;
    const PATH: &'static str = "/api/pull";
}

/// POST /api/push
#[derive(Debug, Clone, Copy)]
pub struct PushModel;

impl Endpoint for PushModel {
    type Request = ModelManagementRequest;
    type Response = StatusResponse;
    const METHOD: Method = Method::POST;
    const PATH: &'static str = "/api/push";
}

/// GET /api/version
#[derive(Debug, Clone, Copy)]
pub struct Version;

impl Endpoint for Version {
    type Request = ();
    type Response = VersionResponse;
    const METHOD: Method = Method::GET;
    const PATH: &'static str = "/api/version";
    const SENDS_BODY: bool = false;
}

/// GET /api/ps
#[derive(Debug, Clone, Copy)]
pub struct RunningModels;

impl Endpoint for RunningModels {
    type Request = ();
    type Response = ModelProcessResponse;
    const METHOD: Method = Method::GET;
    const PATH: &'static str = "/api/ps";
    const SENDS_BODY: bool = false;
}
