use super::{sse_body, DialectConfig, DialectTestSetup};
use chat_gateway::{
    CompletionCredentials, CompletionGateway, GatewayConfig, ModelDescriptor, NormalizedRequest,
    ProviderKind,
};
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub struct OpenAITestSetup;

#[async_trait::async_trait]
impl DialectTestSetup for OpenAITestSetup {
    fn get_config() -> DialectConfig {
        DialectConfig {
            name: "OpenAI",
            model: "gpt-3.5-turbo",
        }
    }

    fn create_gateway(_base_url: &Url) -> CompletionGateway {
        CompletionGateway::new(GatewayConfig::default()).expect("Failed to create gateway")
    }

    fn descriptor(base_url: &Url) -> ModelDescriptor {
        ModelDescriptor::cloud("gpt-3.5-turbo", "GPT-3.5 Turbo", ProviderKind::OpenAI)
            .with_endpoint(base_url.clone())
    }

    fn credentials() -> CompletionCredentials {
        CompletionCredentials::with_key("test-api-key")
    }

    async fn mount_blocking_mocks(
        mock_server: &MockServer,
        request: &NormalizedRequest,
        reply: &str,
    ) {
        let expected = serde_json::to_value(request.clone().stream(false)).unwrap();

        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("authorization", "Bearer test-api-key"))
            .and(header("content-type", "application/json"))
            .and(body_json(expected))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "chatcmpl-123",
                "object": "chat.completion",
                "choices": [{
                    "index": 0,
                    "message": {"role": "assistant", "content": reply},
                    "finish_reason": "stop"
                }]
            })))
            .expect(1)
            .mount(mock_server)
            .await;
    }

    async fn mount_streaming_mocks(
        mock_server: &MockServer,
        request: &NormalizedRequest,
        pieces: &[&str],
    ) {
        let expected = serde_json::to_value(request.clone().stream(true)).unwrap();

        let mut payloads =
            vec![json!({"choices": [{"index": 0, "delta": {"role": "assistant"}}]}).to_string()];
        for (i, piece) in pieces.iter().enumerate() {
            if i == 1 {
                payloads.push("{\"choices\":[{\"delta\":".to_string());
            }
            payloads
                .push(json!({"choices": [{"index": 0, "delta": {"content": piece}}]}).to_string());
        }
        payloads.push(
            json!({"choices": [{"index": 0, "delta": {}, "finish_reason": "stop"}]}).to_string(),
        );
        payloads.push("[DONE]".to_string());

        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("authorization", "Bearer test-api-key"))
            .and(header("accept", "text/event-stream"))
            .and(body_json(expected))
            .respond_with(
                ResponseTemplate::new(200).set_body_raw(sse_body(&payloads), "text/event-stream"),
            )
            .expect(1)
            .mount(mock_server)
            .await;
    }
}
