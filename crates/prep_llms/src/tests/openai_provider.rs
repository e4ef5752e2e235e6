use crate::error::Error;
use crate::provider::Provider;
use crate::providers::openai::{OpenAIConfig, OpenAIProvider};
use crate::types::{FinishReason, GenerateRequest, Headers, Message, ResponseFormat};
use mockito::Matcher;
use serde_json::json;

fn provider_for(server: &mockito::Server) -> OpenAIProvider {
    OpenAIProvider::with_id(
        "groq",
        OpenAIConfig::new("test-key").with_base_url(server.url()),
    )
    .unwrap()
}

fn json_request() -> GenerateRequest {
    GenerateRequest::new(
        "llama-3.1-8b-instant",
        vec![Message::system("json only"), Message::user("explain closures")],
    )
    .with_response_format(ResponseFormat::JsonObject)
    .with_max_tokens(2000)
    .with_temperature(0.1)
}

#[test]
fn test_missing_api_key() {
    let result = OpenAIProvider::new(OpenAIConfig::new(""));
    assert!(matches!(result, Err(Error::MissingApiKey(id)) if id == "openai"));
}

#[test]
fn test_base_url_accepts_full_endpoint() {
    let config = OpenAIConfig::new("k").with_base_url("http://localhost:9000/v1/chat/completions/");
    assert_eq!(config.base_url, "http://localhost:9000/v1");

    let groq = OpenAIConfig::groq("k");
    assert_eq!(groq.base_url, "https://api.groq.com/openai/v1");
}

#[test]
fn test_build_headers_merges_custom() {
    let provider = OpenAIProvider::new(OpenAIConfig::new("abc").with_organization_id("org-1")).unwrap();
    let mut custom = Headers::new();
    custom.insert("X-Trace", "1");

    let headers = provider.build_headers(Some(&custom));
    assert_eq!(headers.get("authorization"), Some("Bearer abc"));
    assert_eq!(headers.get("OpenAI-Organization"), Some("org-1"));
    assert_eq!(headers.get("x-trace"), Some("1"));
}

#[tokio::test]
async fn test_generate_sends_json_object_request() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/chat/completions")
        .match_header("authorization", "Bearer test-key")
        .match_body(Matcher::PartialJson(json!({
            "model": "llama-3.1-8b-instant",
            "messages": [
                { "role": "system", "content": "json only" },
                { "role": "user", "content": "explain closures" }
            ],
            "response_format": { "type": "json_object" },
            "max_tokens": 2000
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "id": "chatcmpl-1",
                "model": "llama-3.1-8b-instant",
                "choices": [{
                    "index": 0,
                    "message": { "role": "assistant", "content": "{\"title\":\"Closures\"}" },
                    "finish_reason": "stop"
                }],
                "usage": { "prompt_tokens": 12, "completion_tokens": 5, "total_tokens": 17 }
            })
            .to_string(),
        )
        .create_async()
        .await;

    let provider = provider_for(&server);
    let response = tokio_test::assert_ok!(provider.generate(json_request()).await);

    mock.assert_async().await;
    assert_eq!(response.content.as_deref(), Some("{\"title\":\"Closures\"}"));
    assert_eq!(response.finish_reason, Some(FinishReason::Stop));
    assert_eq!(response.usage.map(|u| u.total_tokens), Some(17));
}

#[tokio::test]
async fn test_generate_surfaces_api_error() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/chat/completions")
        .with_status(429)
        .with_body("rate limited")
        .create_async()
        .await;

    let provider = provider_for(&server);
    let err = provider.generate(json_request()).await.unwrap_err();
    match err {
        Error::ProviderError(message) => {
            assert!(message.contains("429"));
            assert!(message.contains("rate limited"));
        }
        other => panic!("expected provider error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_generate_null_content() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/chat/completions")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"choices":[{"message":{"role":"assistant","content":null},"finish_reason":"stop"}]}"#)
        .create_async()
        .await;

    let provider = provider_for(&server);
    let response = provider.generate(json_request()).await.unwrap();
    assert!(response.content.is_none());
}

#[tokio::test]
async fn test_generate_malformed_body_is_error() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/chat/completions")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body("not json")
        .create_async()
        .await;

    let provider = provider_for(&server);
    assert!(provider.generate(json_request()).await.is_err());
}
