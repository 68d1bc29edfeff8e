//! Chat client tests against a mock completion endpoint

use transcript_manager::{
    ChatClient, ChatConfig, CompletionBackend, Message, MessageContent, TranscriptError,
};

fn test_config(server_url: &str, max_retries: usize) -> ChatConfig {
    ChatConfig {
        endpoint: format!("{}/v1/chat/completions", server_url),
        model: "gpt-3.5-turbo".to_string(),
        api_key_env: "TEST_KEY_THAT_IS_NOT_SET".to_string(),
        timeout_ms: 5_000,
        max_retries,
    }
}

#[tokio::test]
async fn test_completion_with_usage() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/chat/completions")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{
                "choices": [{"message": {"role": "assistant", "content": "Hello there!"}}],
                "usage": {"prompt_tokens": 9, "completion_tokens": 3, "total_tokens": 12}
            }"#,
        )
        .create_async()
        .await;

    let client = ChatClient::new(test_config(&server.url(), 1)).unwrap();
    let messages = vec![Message::system("Be brief."), Message::user("Hi")];

    let completion = client.complete(&messages, None).await.unwrap();

    mock.assert_async().await;
    assert_eq!(
        completion.message.content,
        MessageContent::Text("Hello there!".to_string())
    );
    assert_eq!(completion.usage.unwrap().total_tokens, 12);
    assert!(completion.tool_calls.is_empty());
}

#[tokio::test]
async fn test_upstream_error_is_retried_then_surfaced() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/chat/completions")
        .with_status(500)
        .with_body("upstream exploded")
        .expect(2)
        .create_async()
        .await;

    let client = ChatClient::new(test_config(&server.url(), 2)).unwrap();
    let messages = vec![Message::user("Hi")];

    let result = client.complete(&messages, None).await;

    mock.assert_async().await;
    assert!(matches!(result, Err(TranscriptError::Api(_))));
}

#[tokio::test]
async fn test_empty_choices_is_an_api_error() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/v1/chat/completions")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"choices": []}"#)
        .create_async()
        .await;

    let client = ChatClient::new(test_config(&server.url(), 3)).unwrap();
    let messages = vec![Message::user("Hi")];

    let result = client.complete(&messages, None).await;
    assert!(matches!(result, Err(TranscriptError::Api(_))));
}

#[tokio::test]
async fn test_tool_call_response() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/v1/chat/completions")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{
                "choices": [{"message": {
                    "role": "assistant",
                    "content": null,
                    "tool_calls": [{
                        "id": "call_42",
                        "type": "function",
                        "function": {"name": "lookup", "arguments": "{\"q\":\"rust\"}"}
                    }]
                }}],
                "usage": {"prompt_tokens": 20, "completion_tokens": 8, "total_tokens": 28}
            }"#,
        )
        .create_async()
        .await;

    let client = ChatClient::new(test_config(&server.url(), 1)).unwrap();
    let messages = vec![Message::user("look up rust")];

    let completion = client.complete(&messages, None).await.unwrap();

    assert_eq!(completion.tool_calls.len(), 1);
    assert_eq!(completion.tool_calls[0].function.name, "lookup");
    // Null content arrives as empty text
    assert_eq!(
        completion.message.content,
        MessageContent::Text(String::new())
    );
}
