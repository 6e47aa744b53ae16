//! The single entry point for chat completions.

use reqwest::Client;
use tracing::Instrument;
use url::Url;
use uuid::Uuid;

use crate::config::GatewayConfig;
use crate::provider::ChatCompletion;
use crate::providers::{Dialect, EncodedRequest};
use crate::registry::{dialect_for, explicit_address, resolve_address};
use crate::response::{CompletionStream, NormalizedResult};
use crate::sse_stream::ChunkStreamExt;
use crate::types::{
    CompletionCredentials, ModelDescriptor, NormalizedChunk, NormalizedRequest, StreamPhase,
};
use crate::Error;

/// Executes normalized chat requests against any supported backend.
///
/// Cheap to clone; clones share one connection pool. Every call is
/// independent and no state is kept between calls.
#[derive(Debug, Clone)]
pub struct CompletionGateway {
    client: Client,
    config: GatewayConfig,
}

/// A request fully resolved for one backend.
struct PreparedCall {
    dialect: Dialect,
    url: Url,
    encoded: EncodedRequest,
}

impl CompletionGateway {
    /// Create a gateway with the given configuration.
    pub fn new(config: GatewayConfig) -> Result<Self, Error> {
        let client = Client::builder().timeout(config.request_timeout).build()?;
        Ok(Self { client, config })
    }

    /// Create a gateway configured from environment variables.
    pub fn from_env() -> Result<Self, Error> {
        Self::new(GatewayConfig::from_env()?)
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Resolve address and dialect, then encode with the given stream flag.
    fn prepare(
        &self,
        request: &NormalizedRequest,
        descriptor: &ModelDescriptor,
        credentials: &CompletionCredentials,
        stream: bool,
    ) -> Result<PreparedCall, Error> {
        let dialect = dialect_for(descriptor.provider_kind);
        let base = resolve_address(descriptor, credentials, &self.config)?;
        let url = dialect.completions_url(&base)?;

        let auth_required = dialect.requires_auth()
            && !descriptor.is_local()
            && explicit_address(descriptor, credentials).is_none();

        let mut request = request.clone();
        request.stream = stream;
        let encoded = dialect.encode_request(&request, credentials, auth_required)?;

        tracing::debug!(
            dialect = dialect.name(),
            %url,
            turns = request.turns.len(),
            stream,
            "prepared chat request"
        );

        Ok(PreparedCall {
            dialect,
            url,
            encoded,
        })
    }

    /// POST the call; non-2xx statuses become [`Error::HttpStatus`].
    async fn send(&self, call: PreparedCall) -> Result<reqwest::Response, Error> {
        let response = self
            .client
            .post(call.url)
            .headers(call.encoded.headers)
            .body(call.encoded.body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), "backend returned an error status");
            return Err(Error::HttpStatus {
                code: status.as_u16(),
                body,
            });
        }

        Ok(response)
    }

    /// Produce the full reply in a single exchange. No retries.
    pub async fn complete(
        &self,
        request: &NormalizedRequest,
        descriptor: &ModelDescriptor,
        credentials: &CompletionCredentials,
    ) -> Result<NormalizedResult, Error> {
        let span = call_span(request, descriptor, "blocking");
        async move {
            let call = self.prepare(request, descriptor, credentials, false)?;
            let dialect = call.dialect;
            let response = self.send(call).await?;
            let body = response.bytes().await?;
            let result = dialect.decode_response(&body)?;
            tracing::debug!(chars = result.text.len(), "completion received");
            Ok(result)
        }
        .instrument(span)
        .await
    }

    /// Open a streamed reply.
    ///
    /// Returns once the backend has accepted the request; the body is decoded
    /// lazily as the returned stream is polled.
    pub async fn open_stream(
        &self,
        request: &NormalizedRequest,
        descriptor: &ModelDescriptor,
        credentials: &CompletionCredentials,
    ) -> Result<CompletionStream, Error> {
        let mut phase = StreamPhase::Idle;
        phase.advance(StreamPhase::Connecting);

        let opened = async {
            let call = self.prepare(request, descriptor, credentials, true)?;
            let dialect = call.dialect;
            let response = self.send(call).await?;
            Ok::<_, Error>((dialect, response))
        }
        .await;

        let (dialect, response) = match opened {
            Ok(opened) => opened,
            Err(e) => {
                phase.advance(StreamPhase::Failed);
                return Err(e);
            }
        };

        phase.advance(StreamPhase::Streaming);
        let chunks = Box::pin(response.bytes_stream()).completion_chunks(dialect);
        Ok(CompletionStream::with_phase(chunks, phase))
    }

    /// Stream a reply to callbacks.
    ///
    /// `on_chunk` is invoked synchronously for each chunk in arrival order and
    /// `on_complete` exactly once with the concatenated text when the stream
    /// ends gracefully. Any failure is returned without calling `on_complete`.
    /// Dropping the returned future aborts the connection and stops delivery.
    pub async fn stream_complete<F, G>(
        &self,
        request: &NormalizedRequest,
        descriptor: &ModelDescriptor,
        credentials: &CompletionCredentials,
        on_chunk: F,
        on_complete: G,
    ) -> Result<(), Error>
    where
        F: FnMut(&NormalizedChunk),
        G: FnOnce(&NormalizedResult),
    {
        let span = call_span(request, descriptor, "streaming");
        async move {
            let stream = self.open_stream(request, descriptor, credentials).await?;
            stream.drive(on_chunk, on_complete).await?;
            Ok(())
        }
        .instrument(span)
        .await
    }

    /// Run the request in the mode it asks for.
    ///
    /// Streaming requests feed `on_chunk` as text arrives; blocking requests
    /// never call it. Either way the full reply is returned.
    pub async fn execute<F>(
        &self,
        request: &NormalizedRequest,
        descriptor: &ModelDescriptor,
        credentials: &CompletionCredentials,
        on_chunk: F,
    ) -> Result<NormalizedResult, Error>
    where
        F: FnMut(&NormalizedChunk),
    {
        if !request.stream {
            return self.complete(request, descriptor, credentials).await;
        }

        let span = call_span(request, descriptor, "streaming");
        async move {
            let stream = self.open_stream(request, descriptor, credentials).await?;
            stream.drive(on_chunk, |_| {}).await
        }
        .instrument(span)
        .await
    }
}

#[async_trait::async_trait]
impl ChatCompletion for CompletionGateway {
    async fn complete(
        &self,
        request: &NormalizedRequest,
        descriptor: &ModelDescriptor,
        credentials: &CompletionCredentials,
    ) -> Result<NormalizedResult, Error> {
        CompletionGateway::complete(self, request, descriptor, credentials).await
    }

    async fn open_stream(
        &self,
        request: &NormalizedRequest,
        descriptor: &ModelDescriptor,
        credentials: &CompletionCredentials,
    ) -> Result<CompletionStream, Error> {
        CompletionGateway::open_stream(self, request, descriptor, credentials).await
    }
}

fn call_span(
    request: &NormalizedRequest,
    descriptor: &ModelDescriptor,
    mode: &'static str,
) -> tracing::Span {
    tracing::info_span!(
        "chat_completion",
        request_id = %Uuid::new_v4(),
        model = %request.model_id,
        provider = %descriptor.provider_kind,
        dialect = dialect_for(descriptor.provider_kind).name(),
        mode,
    )
}
