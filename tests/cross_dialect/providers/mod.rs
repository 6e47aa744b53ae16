pub mod anthropic;
pub mod local;
pub mod openai;

use chat_gateway::{CompletionCredentials, CompletionGateway, ModelDescriptor, NormalizedRequest};
use url::Url;
use wiremock::MockServer;

/// Dialect configuration for cross-dialect testing
#[derive(Debug, Clone)]
pub struct DialectConfig {
    pub name: &'static str,
    pub model: &'static str,
}

/// Trait for dialect-specific test setup
#[async_trait::async_trait]
pub trait DialectTestSetup {
    /// Get the dialect configuration
    fn get_config() -> DialectConfig;

    /// Create the gateway; `base_url` points at the mock server
    fn create_gateway(base_url: &Url) -> CompletionGateway;

    /// Describe the model under test
    fn descriptor(base_url: &Url) -> ModelDescriptor;

    fn credentials() -> CompletionCredentials;

    /// Mount a blocking reply that answers `request` with `reply`
    async fn mount_blocking_mocks(
        mock_server: &MockServer,
        request: &NormalizedRequest,
        reply: &str,
    );

    /// Mount a streamed reply that emits `pieces` in order, with one malformed
    /// event in the middle
    async fn mount_streaming_mocks(
        mock_server: &MockServer,
        request: &NormalizedRequest,
        pieces: &[&str],
    );
}

/// Base URL the mocks are served under
pub fn base_url(mock_server: &MockServer) -> Url {
    Url::parse(&format!("{}/v1", mock_server.uri())).expect("mock server uri is a valid URL")
}

/// Render an event stream body from `data:` payloads
pub fn sse_body(payloads: &[String]) -> String {
    payloads
        .iter()
        .map(|payload| format!("data: {payload}\n\n"))
        .collect()
}
