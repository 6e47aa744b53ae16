use super::{sse_body, DialectConfig, DialectTestSetup};
use chat_gateway::{
    CompletionCredentials, CompletionGateway, GatewayConfig, ModelDescriptor, NormalizedRequest,
    ProviderKind,
};
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub struct AnthropicTestSetup;

/// Anthropic bodies carry only model, messages and max_tokens
fn expected_body(request: &NormalizedRequest) -> serde_json::Value {
    json!({
        "model": request.model_id,
        "messages": request.turns,
        "max_tokens": request.max_output_tokens.unwrap_or(1024),
    })
}

#[async_trait::async_trait]
impl DialectTestSetup for AnthropicTestSetup {
    fn get_config() -> DialectConfig {
        DialectConfig {
            name: "Anthropic",
            model: "claude-3-opus",
        }
    }

    fn create_gateway(_base_url: &Url) -> CompletionGateway {
        CompletionGateway::new(GatewayConfig::default()).expect("Failed to create gateway")
    }

    fn descriptor(base_url: &Url) -> ModelDescriptor {
        ModelDescriptor::cloud("claude-3-opus", "Claude 3 Opus", ProviderKind::Anthropic)
            .with_endpoint(base_url.clone())
    }

    fn credentials() -> CompletionCredentials {
        CompletionCredentials::with_key("test-anthropic-key")
    }

    async fn mount_blocking_mocks(
        mock_server: &MockServer,
        request: &NormalizedRequest,
        reply: &str,
    ) {
        Mock::given(method("POST"))
            .and(path("/v1/messages"))
            .and(header("x-api-key", "test-anthropic-key"))
            .and(header("anthropic-version", "2023-06-01"))
            .and(body_json(expected_body(request)))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "msg_123",
                "type": "message",
                "role": "assistant",
                "model": request.model_id,
                "content": [{"type": "text", "text": reply}],
                "stop_reason": "end_turn",
                "usage": {"input_tokens": 10, "output_tokens": 5}
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
        let mut payloads = vec![
            json!({
                "type": "message_start",
                "message": {"id": "msg_123", "role": "assistant", "content": []}
            })
            .to_string(),
            json!({
                "type": "content_block_start",
                "index": 0,
                "content_block": {"type": "text", "text": ""}
            })
            .to_string(),
        ];
        for (i, piece) in pieces.iter().enumerate() {
            if i == 1 {
                payloads.push("{\"type\":\"content_block_delta\",".to_string());
                payloads.push(json!({"type": "ping"}).to_string());
            }
            payloads.push(
                json!({
                    "type": "content_block_delta",
                    "index": 0,
                    "delta": {"type": "text_delta", "text": piece}
                })
                .to_string(),
            );
        }
        payloads.push(json!({"type": "content_block_stop", "index": 0}).to_string());
        payloads.push(
            json!({"type": "message_delta", "delta": {"stop_reason": "end_turn"}}).to_string(),
        );
        payloads.push(json!({"type": "message_stop"}).to_string());

        Mock::given(method("POST"))
            .and(path("/v1/messages"))
            .and(header("x-api-key", "test-anthropic-key"))
            .and(header("accept", "text/event-stream"))
            .and(body_json(expected_body(request)))
            .respond_with(
                ResponseTemplate::new(200).set_body_raw(sse_body(&payloads), "text/event-stream"),
            )
            .expect(1)
            .mount(mock_server)
            .await;
    }
}
