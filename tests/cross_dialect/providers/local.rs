use super::{sse_body, DialectConfig, DialectTestSetup};
use chat_gateway::{
    CompletionCredentials, CompletionGateway, GatewayConfig, ModelDescriptor, NormalizedRequest,
    ProviderKind,
};
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// A local server reached through the gateway's local default address, with
/// no credentials at all
pub struct LocalTestSetup;

#[async_trait::async_trait]
impl DialectTestSetup for LocalTestSetup {
    fn get_config() -> DialectConfig {
        DialectConfig {
            name: "Local",
            model: "llama3",
        }
    }

    fn create_gateway(base_url: &Url) -> CompletionGateway {
        let config = GatewayConfig::default().with_local_default_url(base_url.clone());
        CompletionGateway::new(config).expect("Failed to create gateway")
    }

    fn descriptor(_base_url: &Url) -> ModelDescriptor {
        ModelDescriptor::local("llama3", "Llama 3", ProviderKind::Local)
    }

    fn credentials() -> CompletionCredentials {
        CompletionCredentials::none()
    }

    async fn mount_blocking_mocks(
        mock_server: &MockServer,
        request: &NormalizedRequest,
        reply: &str,
    ) {
        let expected = serde_json::to_value(request.clone().stream(false)).unwrap();

        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(body_json(expected))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{"message": {"role": "assistant", "content": reply}}]
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

        let mut payloads = Vec::new();
        for (i, piece) in pieces.iter().enumerate() {
            if i == 1 {
                payloads.push("not json at all".to_string());
            }
            payloads.push(json!({"choices": [{"delta": {"content": piece}}]}).to_string());
        }
        payloads.push("[DONE]".to_string());

        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
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
