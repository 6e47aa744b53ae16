use chat_gateway::{ChatCompletion, Conversation, GenerationParameters, NormalizedRequest};
use wiremock::MockServer;

use super::providers::{
    anthropic::AnthropicTestSetup, base_url, local::LocalTestSetup, openai::OpenAITestSetup,
    DialectTestSetup,
};

const PIECES: [&str; 3] = ["Hello", ", streaming", " world!"];

fn build_request<T: DialectTestSetup>(stream: bool) -> NormalizedRequest {
    let conversation = Conversation::system("You are a helpful assistant.").with_user("Hi");
    let params = GenerationParameters::new(0.7, 150, stream);
    NormalizedRequest::from_conversation(T::get_config().model, &conversation, &params)
}

/// Run a blocking completion for a specific dialect
async fn run_blocking_test<T: DialectTestSetup>() {
    let config = T::get_config();
    let mock_server = MockServer::start().await;
    let base = base_url(&mock_server);

    // The caller's stream preference is overridden by the blocking call
    let request = build_request::<T>(true);
    T::mount_blocking_mocks(&mock_server, &request, "Hello!").await;

    let gateway = T::create_gateway(&base);
    let result = gateway
        .complete(&request, &T::descriptor(&base), &T::credentials())
        .await
        .unwrap_or_else(|e| panic!("{} blocking completion failed: {e}", config.name));

    assert_eq!(result.text, "Hello!", "{}", config.name);
}

/// Run a streaming completion for a specific dialect
async fn run_streaming_test<T: DialectTestSetup>() {
    let config = T::get_config();
    let mock_server = MockServer::start().await;
    let base = base_url(&mock_server);

    let request = build_request::<T>(false);
    T::mount_streaming_mocks(&mock_server, &request, &PIECES).await;

    let gateway = T::create_gateway(&base);
    let mut chunks = Vec::new();
    let mut completions = Vec::new();

    gateway
        .stream_complete(
            &request,
            &T::descriptor(&base),
            &T::credentials(),
            |chunk| chunks.push(chunk.text.clone()),
            |result| completions.push(result.text.clone()),
        )
        .await
        .unwrap_or_else(|e| panic!("{} streaming completion failed: {e}", config.name));

    assert_eq!(chunks, PIECES, "{}", config.name);
    assert_eq!(completions, vec![PIECES.concat()], "{}", config.name);
}

/// Drive the same call through the trait object the UI layer holds
async fn run_trait_object_test<T: DialectTestSetup>() {
    let mock_server = MockServer::start().await;
    let base = base_url(&mock_server);

    let request = build_request::<T>(true);
    T::mount_streaming_mocks(&mock_server, &request, &PIECES).await;

    let service: Box<dyn ChatCompletion> = Box::new(T::create_gateway(&base));
    let stream = service
        .open_stream(&request, &T::descriptor(&base), &T::credentials())
        .await
        .expect("stream should open");
    let result = stream.text().await.expect("stream should complete");

    assert_eq!(result.text, PIECES.concat());
}

#[tokio::test]
async fn test_openai_blocking() {
    run_blocking_test::<OpenAITestSetup>().await;
}

#[tokio::test]
async fn test_anthropic_blocking() {
    run_blocking_test::<AnthropicTestSetup>().await;
}

#[tokio::test]
async fn test_local_blocking() {
    run_blocking_test::<LocalTestSetup>().await;
}

#[tokio::test]
async fn test_openai_streaming() {
    run_streaming_test::<OpenAITestSetup>().await;
}

#[tokio::test]
async fn test_anthropic_streaming() {
    run_streaming_test::<AnthropicTestSetup>().await;
}

#[tokio::test]
async fn test_local_streaming() {
    run_streaming_test::<LocalTestSetup>().await;
}

#[tokio::test]
async fn test_openai_trait_object() {
    run_trait_object_test::<OpenAITestSetup>().await;
}

#[tokio::test]
async fn test_anthropic_trait_object() {
    run_trait_object_test::<AnthropicTestSetup>().await;
}

#[tokio::test]
async fn test_local_sends_no_authorization_header() {
    let mock_server = MockServer::start().await;
    let base = base_url(&mock_server);
    let request = build_request::<LocalTestSetup>(false);
    LocalTestSetup::mount_blocking_mocks(&mock_server, &request, "ok").await;

    LocalTestSetup::create_gateway(&base)
        .complete(&request, &LocalTestSetup::descriptor(&base), &LocalTestSetup::credentials())
        .await
        .expect("local completion should succeed");

    let received = mock_server.received_requests().await.expect("recording is enabled");
    assert_eq!(received.len(), 1);
    assert!(received[0].headers.get("authorization").is_none());
}
