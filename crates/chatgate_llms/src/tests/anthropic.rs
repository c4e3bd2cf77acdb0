use futures::StreamExt;
use mockito::Matcher;
use serde_json::json;

use super::support::{TEST_KEY, UNREACHABLE, config_for, short_timeouts};
use crate::error::Error;
use crate::provider::ChatBackend;
use crate::providers::AnthropicAdapter;
use crate::types::{Backend, ChatTurn};

fn adapter(url: &str) -> AnthropicAdapter {
    AnthropicAdapter::new(config_for(Backend::Anthropic, url))
}

#[tokio::test]
async fn test_generate_sends_key_and_version_headers() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/chat/completions")
        .match_header("x-api-key", TEST_KEY)
        .match_header("anthropic-version", "2023-06-01")
        .match_body(Matcher::PartialJson(json!({
            "model": "claude-sonnet-4-20250514",
            "max_tokens": 2000,
            "messages": [
                {"role": "system", "content": "Be terse."},
                {"role": "user", "content": "Hi"},
                {"role": "user", "content": "What is 2+2?"}
            ]
        })))
        .with_status(200)
        .with_body(r#"{"id":"m1","object":"chat.completion","choices":[{"index":0,"message":{"role":"assistant","content":"4"},"finish_reason":"stop"}]}"#)
        .expect(1)
        .create_async()
        .await;

    let reply = adapter(&server.url())
        .generate("What is 2+2?", &[ChatTurn::user("Hi")], Some("Be terse."))
        .await
        .unwrap();

    assert_eq!(reply, "4");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_error_body_message_extracted() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/chat/completions")
        .with_status(529)
        .with_body(r#"{"type":"error","error":{"type":"overloaded_error","message":"Overloaded"}}"#)
        .create_async()
        .await;

    let err = adapter(&server.url()).generate("hi", &[], None).await.unwrap_err();
    assert_eq!(err.to_string(), "Anthropic API error (529): Overloaded");
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_missing_choices_is_malformed() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/chat/completions")
        .with_status(200)
        .with_body(r#"{"id":"m1","choices":[]}"#)
        .create_async()
        .await;

    let err = adapter(&server.url()).generate("hi", &[], None).await.unwrap_err();
    assert!(matches!(err, Error::MalformedResponse { backend: Backend::Anthropic, .. }));
}

#[tokio::test]
async fn test_non_json_success_body_is_malformed() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/chat/completions")
        .with_status(200)
        .with_body("<html>maintenance</html>")
        .create_async()
        .await;

    let err = adapter(&server.url()).generate("hi", &[], None).await.unwrap_err();
    assert!(matches!(err, Error::MalformedResponse { .. }));
}

#[tokio::test]
async fn test_stream_stops_at_done_sentinel() {
    let mut server = mockito::Server::new_async().await;
    let body = concat!(
        "data: {\"choices\":[{\"index\":0,\"delta\":{\"role\":\"assistant\",\"content\":\"\"}}]}\n\n",
        "data: {\"choices\":[{\"index\":0,\"delta\":{\"content\":\"Par\"}}]}\n\n",
        "data: {\"choices\":[{\"index\":0,\"delta\":{\"content\":\"is\"},\"finish_reason\":\"stop\"}]}\n\n",
        "data: [DONE]\n\n",
        "data: {\"choices\":[{\"index\":0,\"delta\":{\"content\":\"ignored\"}}]}\n\n",
    );
    server
        .mock("POST", "/chat/completions")
        .match_body(Matcher::PartialJson(json!({"stream": true})))
        .with_status(200)
        .with_header("content-type", "text/event-stream")
        .with_body(body)
        .create_async()
        .await;

    let text = adapter(&server.url())
        .generate_stream("Capital of France?", &[], None)
        .await
        .unwrap()
        .collect_text()
        .await
        .unwrap();

    assert_eq!(text, "Paris");
}

#[tokio::test]
async fn test_stream_error_event_ends_with_tagged_error() {
    let mut server = mockito::Server::new_async().await;
    let body = concat!(
        "data: {\"choices\":[{\"index\":0,\"delta\":{\"content\":\"Hal\"}}]}\n\n",
        "data: {\"error\":{\"type\":\"overloaded_error\",\"message\":\"Overloaded\"}}\n\n",
    );
    server
        .mock("POST", "/chat/completions")
        .with_status(200)
        .with_header("content-type", "text/event-stream")
        .with_body(body)
        .create_async()
        .await;

    let items: Vec<_> = adapter(&server.url())
        .generate_stream("hi", &[], None)
        .await
        .unwrap()
        .collect()
        .await;

    assert_eq!(items.len(), 2);
    assert_eq!(items[0].as_ref().unwrap(), "Hal");
    assert_eq!(items[1].as_ref().unwrap_err().to_string(), "Anthropic: Overloaded");
}

#[tokio::test]
async fn test_transport_error_never_leaks_key() {
    let config = config_for(Backend::Anthropic, UNREACHABLE).with_timeouts(short_timeouts(2000));
    let err = AnthropicAdapter::new(config)
        .generate("hi", &[], None)
        .await
        .unwrap_err();

    assert!(
        matches!(err, Error::Transport { .. } | Error::Timeout { .. }),
        "unexpected error: {err:?}"
    );
    assert!(err.to_string().starts_with("Anthropic"));
    assert!(!err.to_string().contains(TEST_KEY));
}

#[tokio::test]
async fn test_health_probe_expects_model_list() {
    let mut server = mockito::Server::new_async().await;
    let probe = server
        .mock("GET", "/models")
        .match_query(Matcher::UrlEncoded("limit".into(), "1".into()))
        .match_header("x-api-key", TEST_KEY)
        .with_status(200)
        .with_body(r#"{"data":[{"id":"claude-sonnet-4-20250514","type":"model"}],"has_more":true}"#)
        .expect(1)
        .create_async()
        .await;

    let adapter = adapter(&server.url());
    assert!(adapter.check_health().await);
    assert!(adapter.check_health().await);
    probe.assert_async().await;
}

#[tokio::test]
async fn test_health_false_on_html_success_body() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/models")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "text/html")
        .with_body("<html>sign in to continue</html>")
        .create_async()
        .await;

    assert!(!adapter(&server.url()).check_health().await);
}
