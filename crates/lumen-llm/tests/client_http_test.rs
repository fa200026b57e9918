use lumen_llm::{
    ChatClient, ChatOptions, ChatRequest, GeminiClient, GeminiConfig, Message, OpenAIClient,
    OpenAIConfig,
};

#[tokio::test]
async fn test_openai_chat_parses_completion() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/chat/completions")
        .match_header("authorization", "Bearer test-key")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{
                "id": "chatcmpl-1",
                "object": "chat.completion",
                "created": 1700000000,
                "model": "gpt-5",
                "choices": [{
                    "index": 0,
                    "message": {"role": "assistant", "content": "{\"content\": \"hi\"}"},
                    "finish_reason": "stop"
                }],
                "usage": {"prompt_tokens": 10, "completion_tokens": 5, "total_tokens": 15}
            }"#,
        )
        .create_async()
        .await;

    let client = OpenAIClient::from_config(&OpenAIConfig::new("test-key").with_base_url(server.url())).unwrap();
    let response = client
        .chat(ChatRequest::new("gpt-5", vec![Message::human("hello")]).with_options(ChatOptions::new().json()))
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(response.content.as_deref(), Some("{\"content\": \"hi\"}"));
    assert_eq!(response.usage.unwrap().total_tokens, 15);
    assert_eq!(response.finish_reason.as_deref(), Some("stop"));
}

#[tokio::test]
async fn test_openai_error_status_is_an_error() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/chat/completions")
        .with_status(503)
        .with_body("service unavailable")
        .create_async()
        .await;

    let client = OpenAIClient::from_config(&OpenAIConfig::new("test-key").with_base_url(server.url())).unwrap();
    let err = client
        .chat(ChatRequest::new("gpt-5", vec![Message::human("hello")]))
        .await
        .unwrap_err();

    assert!(err.to_string().contains("503"));
}

#[tokio::test]
async fn test_gemini_chat_joins_parts() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/models/gemini-2.5-flash:generateContent")
        .match_header("x-goog-api-key", "test-key")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{
                "candidates": [{
                    "content": {"role": "model", "parts": [{"text": "Hello, "}, {"text": "world"}]},
                    "finishReason": "STOP"
                }],
                "usageMetadata": {"promptTokenCount": 3, "candidatesTokenCount": 2, "totalTokenCount": 5}
            }"#,
        )
        .create_async()
        .await;

    let client = GeminiClient::from_config(&GeminiConfig::new("test-key").with_base_url(server.url())).unwrap();
    let response = client
        .chat(ChatRequest::new(
            "gemini-2.5-flash",
            vec![Message::system("be nice"), Message::human("hello")],
        ))
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(response.content.as_deref(), Some("Hello, world"));
    assert_eq!(response.usage.unwrap().input_tokens, 3);
}

#[tokio::test]
async fn test_gemini_blocked_prompt_has_no_content() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/models/gemini-2.5-flash:generateContent")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"promptFeedback": {"blockReason": "SAFETY"}}"#)
        .create_async()
        .await;

    let client = GeminiClient::from_config(&GeminiConfig::new("test-key").with_base_url(server.url())).unwrap();
    let response = client
        .chat(ChatRequest::new("gemini-2.5-flash", vec![Message::human("hello")]))
        .await
        .unwrap();

    assert!(response.content.is_none());
}
