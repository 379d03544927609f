//! HTTP-level tests for the Groq client against a local mock server.

use futures::StreamExt;
use hpgpt_llm::remote::GroqClient;
use hpgpt_llm::{ChatConfig, ChatMessage, ChatModel, ChatRequest, LlmError, RemoteLlmConfig};
use mockito::Matcher;
use serde_json::json;

fn client_for(server: &mockito::ServerGuard) -> GroqClient {
    let config = RemoteLlmConfig::new("test-key", server.url(), "llama-3.3-70b-versatile");
    GroqClient::new(config).expect("client")
}

fn capital_request() -> ChatRequest {
    ChatRequest::new(vec![
        ChatMessage::system("You are a helpful assistant"),
        ChatMessage::user("What is the capital of France?"),
    ])
    .with_config(ChatConfig::conversational())
}

#[tokio::test]
async fn test_chat_sends_openai_compatible_body() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/chat/completions")
        .match_header("authorization", "Bearer test-key")
        .match_body(Matcher::PartialJson(json!({
            "model": "llama-3.3-70b-versatile",
            "messages": [
                {"role": "system", "content": "You are a helpful assistant"},
                {"role": "user", "content": "What is the capital of France?"}
            ],
            "max_tokens": 8192,
            "stream": false
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "id": "chatcmpl-1",
                "object": "chat.completion",
                "model": "llama-3.3-70b-versatile",
                "choices": [{
                    "index": 0,
                    "message": {"role": "assistant", "content": "Paris is the capital of France."},
                    "finish_reason": "stop"
                }],
                "usage": {"prompt_tokens": 12, "completion_tokens": 7, "total_tokens": 19}
            })
            .to_string(),
        )
        .create_async()
        .await;

    let client = client_for(&server);
    let response = client.chat(capital_request()).await.unwrap();

    mock.assert_async().await;
    assert_eq!(response.content, "Paris is the capital of France.");
    assert_eq!(response.model, "llama-3.3-70b-versatile");
    assert_eq!(response.usage.unwrap().total_tokens, 19);
}

#[tokio::test]
async fn test_chat_maps_unauthorized() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/chat/completions")
        .with_status(401)
        .with_body(r#"{"error":{"message":"Invalid API Key"}}"#)
        .create_async()
        .await;

    let err = client_for(&server).chat(capital_request()).await.unwrap_err();

    assert!(err.is_auth_error());
    assert!(err.to_string().contains("Invalid API Key"));
}

#[tokio::test]
async fn test_chat_maps_rate_limit() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/chat/completions")
        .with_status(429)
        .with_body("quota exhausted")
        .create_async()
        .await;

    let err = client_for(&server).chat(capital_request()).await.unwrap_err();
    assert!(matches!(err, LlmError::RateLimitExceeded(_)));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_chat_maps_server_errors() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/chat/completions")
        .with_status(503)
        .with_body("maintenance")
        .create_async()
        .await;

    let err = client_for(&server).chat(capital_request()).await.unwrap_err();
    assert!(matches!(err, LlmError::ProviderError(ref m) if m.contains("503") && m.contains("maintenance")));
}

#[tokio::test]
async fn test_stream_decodes_event_stream() {
    let body = concat!(
        "data: {\"id\":\"c\",\"choices\":[{\"index\":0,\"delta\":{\"role\":\"assistant\",\"content\":\"\"},\"finish_reason\":null}]}\n\n",
        "data: {\"id\":\"c\",\"choices\":[{\"index\":0,\"delta\":{\"content\":\"Paris\"},\"finish_reason\":null}]}\n\n",
        ": keep-alive\n\n",
        "data: {\"id\":\"c\",\"choices\":[{\"index\":0,\"delta\":{\"content\":\" is\"},\"finish_reason\":null}]}\n\n",
        "data: {\"id\":\"c\",\"choices\":[{\"index\":0,\"delta\":{},\"finish_reason\":\"stop\"}],\"x_groq\":{\"id\":\"req_1\"}}\n\n",
        "data: [DONE]\n\n",
    );

    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/chat/completions")
        .match_header("accept", "text/event-stream")
        .match_body(Matcher::PartialJson(json!({"stream": true})))
        .with_status(200)
        .with_header("content-type", "text/event-stream")
        .with_body(body)
        .create_async()
        .await;

    let client = client_for(&server);
    let chunks: Vec<_> = client
        .stream(capital_request())
        .await
        .unwrap()
        .collect()
        .await;

    mock.assert_async().await;
    let chunks: Vec<_> = chunks.into_iter().map(|c| c.unwrap()).collect();
    assert_eq!(chunks.len(), 4);
    assert_eq!(chunks[0].content.as_deref(), Some(""));
    assert_eq!(chunks[1].content.as_deref(), Some("Paris"));
    assert_eq!(chunks[2].content.as_deref(), Some(" is"));
    assert_eq!(chunks[3].finish_reason.as_deref(), Some("stop"));
}

#[tokio::test]
async fn test_stream_setup_failure_is_returned_directly() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/chat/completions")
        .with_status(401)
        .with_body("nope")
        .create_async()
        .await;

    let result = client_for(&server).stream(capital_request()).await;
    assert!(matches!(result, Err(LlmError::AuthenticationError(_))));
}
