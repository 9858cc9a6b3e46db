//! Tool-calling round trip: model asks for a tool, the registry runs it,
//! the result goes back to the model

use anyhow::Context;
use ollamakit::types::{ArgValue, Tool, ToolArguments, ToolParam, ToolStatus};
use ollamakit::{ClientConfig, OllamaClient, ToolRegistry};
use serde_json::{json, Value};
use wiremock::matchers::{body_partial_json, body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn multiply(args: &ToolArguments) -> anyhow::Result<Value> {
    let a = args.get("a").and_then(ArgValue::as_f64).context("argument `a` must be a number")?;
    let b = args.get("b").and_then(ArgValue::as_f64).context("argument `b` must be a number")?;
    Ok(json!(a * b))
}

fn multiply_tool() -> Tool {
    Tool::function("multiply", "Multiply two numbers")
        .required_param("a", ToolParam::number("First factor"))
        .required_param("b", ToolParam::number("Second factor"))
}

#[tokio::test]
async fn tool_call_round_trip() {
    let server = MockServer::start().await;

    // Second turn: the tool result is in the conversation
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .and(body_string_contains("multiply result: 12.0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "model": "llama3.2",
            "message": {"role": "assistant", "content": "3 times 4 is 12."},
            "done": true
        })))
        .with_priority(1)
        .expect(1)
        .mount(&server)
        .await;

    // First turn: the model asks for the tool
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .and(body_partial_json(json!({
            "tools": [{
                "type": "function",
                "function": {
                    "name": "multiply",
                    "parameters": {"type": "object", "required": ["a", "b"]}
                }
            }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "model": "llama3.2",
            "message": {
                "role": "assistant",
                "content": "",
                "tool_calls": [{"function": {"name": "multiply", "arguments": {"a": 3, "b": 4}}}]
            },
            "done": true
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = OllamaClient::new(ClientConfig::default().with_base_url(server.uri())).unwrap();
    let registry = ToolRegistry::new();
    registry.register(multiply_tool(), multiply);

    let first = client
        .chat_builder()
        .with_model("llama3.2")
        .with_user_message("What is 3 times 4?")
        .with_tools(registry.declarations())
        .execute()
        .await
        .unwrap();

    assert_eq!(first.tool_calls().len(), 1);
    let outcomes = registry.call_tool_calls(&first.message);
    assert_eq!(outcomes.len(), 1);

    let (name, outcome) = &outcomes[0];
    let result = outcome.as_ref().unwrap();
    assert_eq!(result.status, ToolStatus::Success);
    assert_eq!(result.result, json!(12.0));

    let second = client
        .chat_builder()
        .with_model("llama3.2")
        .with_user_message("What is 3 times 4?")
        .with_message(first.message.clone())
        .with_tool_result(name, result)
        .execute()
        .await
        .unwrap();

    assert_eq!(second.message.content, "3 times 4 is 12.");
}

#[tokio::test]
async fn bad_arguments_become_error_result() {
    let registry = ToolRegistry::new();
    registry.register(multiply_tool(), multiply);

    let mut args = ToolArguments::new();
    args.insert("a".to_string(), ArgValue::from("three"));
    args.insert("b".to_string(), ArgValue::Number(4.0));

    let result = registry.call_tool("multiply", &args).unwrap();
    assert_eq!(result.status, ToolStatus::Error);
    assert_eq!(
        result.error.as_deref(),
        Some("argument `a` must be a number")
    );
    assert!(result.to_message_content().starts_with("error: "));
}

#[tokio::test]
async fn registry_shared_across_tasks() {
    let registry = ToolRegistry::new();
    registry.register(multiply_tool(), multiply);

    let tasks: Vec<_> = (1..=16)
        .map(|n| {
            let registry = registry.clone();
            tokio::spawn(async move {
                let mut args = ToolArguments::new();
                args.insert("a".to_string(), ArgValue::Number(f64::from(n)));
                args.insert("b".to_string(), ArgValue::Number(2.0));
                registry.call_tool("multiply", &args).unwrap().result
            })
        })
        .collect();

    for (n, task) in (1..=16).zip(tasks) {
        assert_eq!(task.await.unwrap(), json!(f64::from(n) * 2.0));
    }
}
