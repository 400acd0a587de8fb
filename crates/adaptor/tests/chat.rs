use std::time::Duration;

use hf_adaptor::model::{FunctionCall, Message, ParamType, Role, Tool};
use hf_adaptor::{AdaptorConfigBuilder, ChatAdaptor, ErrorKind, Extractor};
use serde_json::{Value, json};
use wiremock::matchers::{header, method};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn adaptor(server: &MockServer, extractor: Extractor) -> ChatAdaptor {
    let config = AdaptorConfigBuilder::with_api_key("test-key")
        .with_url(server.uri())
        .with_model("test-model")
        .with_instruction("You are an assistant.")
        .with_max_retries(3)
        .with_retry_interval(Duration::from_millis(10))
        .build();
    ChatAdaptor::new(config, extractor)
}

fn completion(message: Value, finish_reason: &str) -> Value {
    json!({
        "object": "chat.completion",
        "id": "",
        "created": 1,
        "model": "test-model",
        "choices": [{
            "index": 0,
            "message": message,
            "logprobs": null,
            "finish_reason": finish_reason
        }],
        "usage": { "prompt_tokens": 1, "completion_tokens": 1, "total_tokens": 2 }
    })
}

async fn sent_body(server: &MockServer) -> Value {
    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    requests[0].body_json().unwrap()
}

#[tokio::test]
async fn test_send_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(header("authorization", "Bearer test-key"))
        .and(header("accept", "application/json"))
        .and(header("content-type", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(
            json!({
                "role": "assistant",
                "content": "This is a test response for SendRequest."
            }),
            "stop",
        )))
        .expect(1)
        .mount(&server)
        .await;

    let reply = adaptor(&server, Extractor::Chat)
        .send_request("Test message")
        .await
        .unwrap();
    assert_eq!(reply.content, "This is a test response for SendRequest.");
    assert!(reply.function_calls.is_empty());

    assert_eq!(
        sent_body(&server).await,
        json!({
            "model": "test-model",
            "messages": [
                { "role": "system", "content": "You are an assistant." },
                { "role": "user", "content": "Test message" }
            ]
        })
    );
}

#[tokio::test]
async fn test_function_call() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(
            json!({
                "role": "assistant",
                "content": "",
                "tool_calls": [{
                    "id": "call_123",
                    "type": "function",
                    "function": {
                        "description": null,
                        "name": "get_user_weather",
                        "arguments": "{\"location\": \"London\"}"
                    }
                }]
            }),
            "tool_calls",
        )))
        .expect(1)
        .mount(&server)
        .await;

    let tools = vec![
        Tool::builder("get_user_weather")
            .description("Get weather for a user")
            .required_param("location", ParamType::String, "City name")
            .build(),
    ];
    let reply = adaptor(&server, Extractor::Chat)
        .send_request_with_history("What's the weather in London?", &[], &tools)
        .await
        .unwrap();

    assert_eq!(reply.content, "");
    assert_eq!(reply.finish_reason.as_deref(), Some("tool_calls"));
    assert_eq!(reply.function_calls.len(), 1);
    let call = &reply.function_calls[0];
    assert_eq!(call.id.as_deref(), Some("call_123"));
    assert_eq!(call.name, "get_user_weather");
    assert_eq!(call.arguments, r#"{"location": "London"}"#);
    let params: Value = call.parse_arguments().unwrap();
    assert_eq!(params["location"], "London");

    let body = sent_body(&server).await;
    assert_eq!(body["tools"][0]["type"], "function");
    assert_eq!(body["tools"][0]["function"]["name"], "get_user_weather");
    assert_eq!(
        body["tools"][0]["function"]["parameters"]["required"],
        json!(["location"])
    );
}

#[tokio::test]
async fn test_system_request_keeps_history_order() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(
            json!({ "role": "assistant", "content": "Understood." }),
            "stop",
        )))
        .mount(&server)
        .await;

    let history = vec![
        Message::user("First"),
        Message::assistant_with_calls(
            "",
            vec![FunctionCall::new("lookup", "{}").with_id("call_1")],
        ),
        Message::assistant("Second"),
        Message::user("Third"),
    ];
    let reply = adaptor(&server, Extractor::Chat)
        .send_system_request_with_history(
            "Answer in French &amp; be brief.",
            &history,
            &[],
        )
        .await
        .unwrap();
    assert_eq!(reply.content, "Understood.");

    let body = sent_body(&server).await;
    assert!(body.get("tools").is_none());
    assert_eq!(
        body["messages"],
        json!([
            { "role": "system", "content": "You are an assistant." },
            { "role": "user", "content": "First" },
            {
                "role": "assistant",
                "content": "",
                "tool_calls": [{
                    "id": "call_1",
                    "type": "function",
                    "function": { "name": "lookup", "arguments": "{}" }
                }]
            },
            { "role": "assistant", "content": "Second" },
            { "role": "user", "content": "Third" },
            { "role": "system", "content": "Answer in French & be brief." }
        ])
    );
    let sent: Vec<Message> =
        serde_json::from_value(body["messages"].clone()).unwrap();
    assert_eq!(sent[1..5], history[..]);
    assert_eq!(sent[5].role, Role::System);
}

#[tokio::test]
async fn test_no_choices() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "choices": [] })),
        )
        .mount(&server)
        .await;

    let err = adaptor(&server, Extractor::Chat)
        .send_request("Hello")
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NoChoices);
}

#[tokio::test]
async fn test_not_found_is_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(404).set_body_string("model not found"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let err = adaptor(&server, Extractor::Chat)
        .send_request("Hello")
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Status);
    assert_eq!(err.status(), Some(404));
    assert_eq!(err.body(), Some("model not found"));
    assert!(err.to_string().contains("404"));
}

#[tokio::test]
async fn test_raw_extractor_returns_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"[{"generated_text": "Hi there"}]"#),
        )
        .mount(&server)
        .await;

    for extractor in [Extractor::Raw, Extractor::DebugRaw] {
        let reply = adaptor(&server, extractor)
            .send_request("Hello")
            .await
            .unwrap();
        assert_eq!(reply.content, r#"[{"generated_text": "Hi there"}]"#);
        assert!(reply.function_calls.is_empty());
    }
}

#[tokio::test]
async fn test_concurrent_calls_share_adaptor() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(
            json!({ "role": "assistant", "content": "ok" }),
            "stop",
        )))
        .expect(4)
        .mount(&server)
        .await;

    let adaptor = adaptor(&server, Extractor::DebugChat);
    let (a, b, c, d) = tokio::join!(
        adaptor.send_request("a"),
        adaptor.send_request("b"),
        adaptor.send_request("c"),
        adaptor.send_request("d"),
    );
    for reply in [a, b, c, d] {
        assert_eq!(reply.unwrap().content, "ok");
    }
}
