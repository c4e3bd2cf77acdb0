use futures::StreamExt;
use mockito::Matcher;
use serde_json::json;

use super::support::{TEST_KEY, config_for};
use crate::config::AdapterConfig;
use crate::error::Error;
use crate::provider::ChatBackend;
use crate::providers::CohereAdapter;
use crate::types::{Backend, ChatTurn};

fn adapter(url: &str) -> CohereAdapter {
    CohereAdapter::new(config_for(Backend::Cohere, url))
}

#[tokio::test]
async fn test_generate_uses_bearer_auth() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/v2/chat")
        .match_header("authorization", format!("Bearer {TEST_KEY}").as_str())
        .match_body(Matcher::PartialJson(json!({
            "model": "command-r-plus",
            "stream": false,
            "messages": [
                {"role": "user", "content": "Hi"},
                {"role": "assistant", "content": "Hello"},
                {"role": "user", "content": "Bye"}
            ]
        })))
        .with_status(200)
        .with_body(
            r#"{"id":"c1","finish_reason":"COMPLETE","message":{"role":"assistant","content":[{"type":"text","text":"Goodbye!"}]}}"#,
        )
        .expect(1)
        .create_async()
        .await;

    let history = vec![ChatTurn::user("Hi"), ChatTurn::assistant("Hello")];
    let reply = adapter(&server.url()).generate("Bye", &history, None).await.unwrap();

    assert_eq!(reply, "Goodbye!");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_missing_key_fails_fast_and_reports_unhealthy() {
    let mut server = mockito::Server::new_async().await;
    let mock = server.mock("POST", "/v2/chat").expect(0).create_async().await;
    let probe = server.mock("GET", "/v1/models").expect(0).create_async().await;

    let config = AdapterConfig::new(Backend::Cohere).with_base_url(server.url());
    let adapter = CohereAdapter::new(config);

    let err = adapter.generate("hi", &[], None).await.unwrap_err();
    assert!(matches!(err, Error::MissingApiKey { backend: Backend::Cohere }));
    assert!(!adapter.check_health().await);

    let status = adapter.status().await;
    assert!(!status.api_key_configured);
    assert!(!status.healthy);

    mock.assert_async().await;
    probe.assert_async().await;
}

#[tokio::test]
async fn test_health_probe_lists_models_once() {
    let mut server = mockito::Server::new_async().await;
    let probe = server
        .mock("GET", "/v1/models")
        .match_query(Matcher::Any)
        .match_header("authorization", format!("Bearer {TEST_KEY}").as_str())
        .with_status(200)
        .with_body(r#"{"models":[]}"#)
        .expect(1)
        .create_async()
        .await;

    let adapter = adapter(&server.url());
    assert!(adapter.check_health().await);
    assert!(adapter.check_health().await);
    probe.assert_async().await;
}

#[tokio::test]
async fn test_upstream_message_extracted_and_key_redacted() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/v2/chat")
        .with_status(401)
        .with_body(format!(r#"{{"message":"invalid api token '{TEST_KEY}'"}}"#))
        .create_async()
        .await;

    let err = adapter(&server.url()).generate("hi", &[], None).await.unwrap_err();
    let text = err.to_string();
    assert_eq!(text, "Cohere API error (401): invalid api token '***'");
    assert!(!text.contains(TEST_KEY));
    assert!(!format!("{err:?}").contains(TEST_KEY));
}

#[tokio::test]
async fn test_stream_decodes_content_deltas() {
    let mut server = mockito::Server::new_async().await;
    let body = concat!(
        "event: message-start\n",
        "data: {\"type\":\"message-start\",\"id\":\"c1\",\"delta\":{\"message\":{\"role\":\"assistant\"}}}\n\n",
        "event: content-start\n",
        "data: {\"type\":\"content-start\",\"index\":0,\"delta\":{\"message\":{\"content\":{\"type\":\"text\",\"text\":\"\"}}}}\n\n",
        "event: content-delta\n",
        "data: {\"type\":\"content-delta\",\"index\":0,\"delta\":{\"message\":{\"content\":{\"text\":\"Hel\"}}}}\n\n",
        ": keep-alive\n\n",
        "event: content-delta\n",
        "data: {\"type\":\"content-delta\",\"index\":0,\"delta\":{\"message\":{\"content\":{\"text\":\"lo\"}}}}\n\n",
        "event: content-end\n",
        "data: {\"type\":\"content-end\",\"index\":0}\n\n",
        "event: message-end\n",
        "data: {\"type\":\"message-end\",\"delta\":{\"finish_reason\":\"COMPLETE\"}}\n\n",
    );
    server
        .mock("POST", "/v2/chat")
        .match_header("accept", "text/event-stream")
        .match_body(Matcher::PartialJson(json!({"stream": true})))
        .with_status(200)
        .with_header("content-type", "text/event-stream")
        .with_body(body)
        .create_async()
        .await;

    let fragments: Vec<String> = adapter(&server.url())
        .generate_stream("hi", &[], None)
        .await
        .unwrap()
        .map(|f| f.unwrap())
        .collect()
        .await;

    assert_eq!(fragments, vec!["Hel", "lo"]);
}

#[tokio::test]
async fn test_stream_error_status_raised_before_first_fragment() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/v2/chat")
        .with_status(429)
        .with_body(r#"{"message":"too many requests"}"#)
        .create_async()
        .await;

    let err = adapter(&server.url())
        .generate_stream("hi", &[], None)
        .await
        .unwrap_err();
    assert!(err.is_retryable());
    assert_eq!(err.to_string(), "Cohere API error (429): too many requests");
}

#[tokio::test]
async fn test_health_false_when_models_missing() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/v1/models")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"status":"ok"}"#)
        .create_async()
        .await;

    assert!(!adapter(&server.url()).check_health().await);
}
