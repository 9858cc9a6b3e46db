//! Integration tests for chat and completion against a mock Ollama server

use ollamakit::types::{ChatRequest, ChatResponse, CompletionRequest, Message};
use ollamakit::{ClientConfig, ClientError, Logger, OllamaClient};
use serde_json::json;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(server: &MockServer) -> OllamaClient {
    OllamaClient::new(ClientConfig::default().with_base_url(server.uri())).unwrap()
}

fn chat_request(stream: bool) -> ChatRequest {
    ChatRequest {
        model: "llama3.2".to_string(),
        messages: vec![Message::user("Why is the sky blue?")],
        stream,
        ..Default::default()
    }
}

fn chat_chunk(content: &str, done: bool) -> String {
    let mut chunk = json!({
        "model": "llama3.2",
        "created_at": "2024-07-01T12:00:00.123456789Z",
        "message": {"role": "assistant", "content": content},
        "done": done,
    });
    if done {
        chunk["done_reason"] = json!("stop");
        chunk["eval_count"] = json!(3);
        chunk["eval_duration"] = json!(1_500_000_000u64);
    }
    format!("{}\n", chunk)
}

#[tokio::test]
async fn non_streaming_chat_returns_response_without_callback() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .and(body_partial_json(json!({"model": "llama3.2", "stream": false})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "model": "llama3.2",
            "created_at": "2024-07-01T12:00:00Z",
            "message": {"role": "assistant", "content": "Rayleigh scattering."},
            "done": true,
            "done_reason": "stop",
            "total_duration": 5_000_000_000u64
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server);
    let mut calls = 0;
    let response = client
        .chat(chat_request(false), |_| calls += 1)
        .await
        .unwrap()
        .expect("non-streaming chat returns the response");

    assert_eq!(calls, 0);
    assert_eq!(response.message.content, "Rayleigh scattering.");
    assert!(response.done);
    assert_eq!(response.stats.total_duration, Some(5_000_000_000));
}

#[tokio::test]
async fn streaming_chat_delivers_every_chunk_in_order() {
    let server = MockServer::start().await;

    let body = [
        chat_chunk("The sky ", false),
        chat_chunk("is blue.", false),
        chat_chunk("", true),
    ]
    .concat();

    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .and(body_partial_json(json!({"stream": true})))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server);
    let mut chunks: Vec<ChatResponse> = Vec::new();
    let result = client
        .chat(chat_request(true), |chunk| chunks.push(chunk))
        .await
        .unwrap();

    assert!(result.is_none());
    assert_eq!(chunks.len(), 3);
    assert!(!chunks[0].done);
    assert!(!chunks[1].done);
    assert!(chunks[2].done);
    assert_eq!(chunks[2].done_reason.as_deref(), Some("stop"));

    let text: String = chunks.iter().map(|c| c.message.content.as_str()).collect();
    assert_eq!(text, "The sky is blue.");
    assert_eq!(chunks[2].stats.tokens_per_second(), Some(2.0));
}

#[tokio::test]
async fn builder_stream_reports_chunk_count() {
    let server = MockServer::start().await;

    let body = [chat_chunk("a", false), chat_chunk("b", true)].concat();
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .and(body_partial_json(json!({"stream": true, "options": {"temperature": 0.1}})))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(&server)
        .await;

    let client = test_client(&server);
    let mut seen = Vec::new();
    let delivered = client
        .chat_builder()
        .with_model("llama3.2")
        .with_user_message("hi")
        .with_temperature(0.1)
        .stream(|chunk| seen.push(chunk.message.content))
        .await
        .unwrap();

    assert_eq!(delivered, 2);
    assert_eq!(seen, vec!["a", "b"]);
}

#[tokio::test]
async fn error_status_fails_streaming_call_with_zero_chunks() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({"error": "model 'llama3.2' not found"})),
        )
        .mount(&server)
        .await;

    let client = test_client(&server);
    let mut calls = 0;
    let err = client
        .chat(chat_request(true), |_| calls += 1)
        .await
        .unwrap_err();

    assert_eq!(calls, 0);
    assert_eq!(err.delivered_chunks(), 0);
    match err {
        ClientError::ApiError { status, message } => {
            assert_eq!(status, 404);
            assert_eq!(message, "model 'llama3.2' not found");
        }
        other => panic!("expected ApiError, got {:?}", other),
    }
}

#[tokio::test]
async fn error_status_with_plain_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal server error"))
        .mount(&server)
        .await;

    let client = test_client(&server);
    let err = client.chat(chat_request(false), |_| {}).await.unwrap_err();
    assert!(matches!(err, ClientError::ApiError { status: 500, ref message } if message == "internal server error"));
}

#[tokio::test]
async fn malformed_chunk_keeps_delivered_chunks() {
    let server = MockServer::start().await;

    let body = format!(
        "{}{}{}",
        chat_chunk("one", false),
        chat_chunk("two", false),
        "{not json}\n"
    );
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(&server)
        .await;

    let client = test_client(&server);
    let mut seen = Vec::new();
    let err = client
        .chat(chat_request(true), |chunk| seen.push(chunk.message.content))
        .await
        .unwrap_err();

    assert_eq!(seen, vec!["one", "two"]);
    assert_eq!(err.delivered_chunks(), 2);
    match err {
        ClientError::StreamInterrupted { delivered, source } => {
            assert_eq!(delivered, 2);
            assert!(matches!(*source, ClientError::JsonParseError(_)));
        }
        other => panic!("expected StreamInterrupted, got {:?}", other),
    }
}

#[tokio::test]
async fn unterminated_trailing_line_is_truncation() {
    let server = MockServer::start().await;

    let body = format!("{}{}", chat_chunk("whole", false), r#"{"model":"llama3.2","done":true}"#);
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(&server)
        .await;

    let client = test_client(&server);
    let mut seen = 0;
    let err = client
        .chat(chat_request(true), |_| seen += 1)
        .await
        .unwrap_err();

    assert_eq!(seen, 1);
    match err {
        ClientError::StreamInterrupted { delivered: 1, source } => {
            assert!(matches!(*source, ClientError::TruncatedStream { .. }));
        }
        other => panic!("expected truncated stream, got {:?}", other),
    }
}

#[tokio::test]
async fn malformed_non_streaming_body_is_parse_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{\"model\": "))
        .mount(&server)
        .await;

    let client = test_client(&server);
    let err = client.chat(chat_request(false), |_| {}).await.unwrap_err();
    assert!(matches!(err, ClientError::JsonParseError(_)));
}

#[tokio::test]
async fn streaming_generate() {
    let server = MockServer::start().await;

    let body = [
        json!({"model": "codellama", "response": "fn ", "done": false}).to_string(),
        json!({"model": "codellama", "response": "main()", "done": false}).to_string(),
        json!({"model": "codellama", "response": "", "done": true, "context": [1, 2, 3]})
            .to_string(),
    ]
    .join("\n")
        + "\n";

    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .and(body_partial_json(json!({"prompt": "write main", "stream": true})))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(&server)
        .await;

    let client = test_client(&server);
    let request = CompletionRequest {
        model: "codellama".to_string(),
        prompt: "write main".to_string(),
        stream: true,
        ..Default::default()
    };

    let mut text = String::new();
    let mut context = Vec::new();
    let result = client
        .generate(request, |chunk| {
            text.push_str(&chunk.response);
            if chunk.done {
                context = chunk.context;
            }
        })
        .await
        .unwrap();

    assert!(result.is_none());
    assert_eq!(text, "fn main()");
    assert_eq!(context, vec![1, 2, 3]);
}

#[tokio::test]
async fn completion_builder_execute_forces_single_document() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .and(body_partial_json(json!({"stream": false, "raw": true})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "model": "codellama",
            "response": "42",
            "done": true
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server);
    let response = client
        .completion_builder()
        .with_model("codellama")
        .with_prompt("6 * 7 =")
        .with_raw(true)
        .execute()
        .await
        .unwrap();
    assert_eq!(response.response, "42");
}

#[tokio::test]
async fn bearer_token_is_sent_when_configured() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/version"))
        .and(header("authorization", "Bearer secret-key"))
        .and(header("content-type", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"version": "0.5.1"})))
        .expect(1)
        .mount(&server)
        .await;

    let config = ClientConfig::default()
        .with_base_url(server.uri())
        .with_api_key("secret-key");
    let client = OllamaClient::new(config).unwrap();

    assert_eq!(client.version().await.unwrap().version, "0.5.1");
}

#[tokio::test]
async fn supplied_http_client_is_used() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/version"))
        .and(header("x-proxy-tenant", "team-a"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"version": "0.5.1"})))
        .expect(1)
        .mount(&server)
        .await;

    let mut headers = reqwest::header::HeaderMap::new();
    headers.insert(
        "x-proxy-tenant",
        reqwest::header::HeaderValue::from_static("team-a"),
    );
    let http_client = reqwest::Client::builder()
        .default_headers(headers)
        .build()
        .unwrap();

    let client = OllamaClient::with_http_client(
        ClientConfig::default().with_base_url(server.uri()),
        http_client,
        Logger::noop(),
    )
    .unwrap();

    assert_eq!(client.version().await.unwrap().version, "0.5.1");
}

#[tokio::test]
async fn validation_failure_sends_nothing() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = test_client(&server);
    let err = client
        .chat_builder()
        .with_user_message("no model set")
        .execute()
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::ValidationError { field: "model", .. }));
}

#[tokio::test]
async fn cancellation_aborts_in_flight_request() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(chat_chunk("late", true))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let client = test_client(&server);
    let token = CancellationToken::new();
    let trigger = token.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        trigger.cancel();
    });

    let err = client
        .chat_builder()
        .with_model("llama3.2")
        .with_user_message("hi")
        .with_cancellation(token)
        .stream(|_| {})
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Cancelled));
}

#[tokio::test]
async fn slow_server_times_out() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/tags"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"models": []}))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let config = ClientConfig::default()
        .with_base_url(server.uri())
        .with_timeout(Duration::from_secs(1));
    let client = OllamaClient::new(config).unwrap();

    let err = client.list_models().await.unwrap_err();
    assert!(matches!(err, ClientError::Timeout { duration_ms: 1000 }));
}
