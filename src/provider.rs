use crate::response::{CompletionStream, NormalizedResult};
use crate::types::{CompletionCredentials, ModelDescriptor, NormalizedRequest};
use crate::Error;

/// A service that can answer normalized chat requests.
///
/// Implemented by [`crate::CompletionGateway`]; callers that need to swap in a
/// test double depend on this trait instead of the concrete gateway.
#[async_trait::async_trait]
pub trait ChatCompletion: Send + Sync {
    /// Produce the full reply in one exchange.
    async fn complete(
        &self,
        request: &NormalizedRequest,
        descriptor: &ModelDescriptor,
        credentials: &CompletionCredentials,
    ) -> Result<NormalizedResult, Error>;

    /// Open a streamed reply. Setup failures are returned here; later failures
    /// surface through the stream.
    async fn open_stream(
        &self,
        request: &NormalizedRequest,
        descriptor: &ModelDescriptor,
        credentials: &CompletionCredentials,
    ) -> Result<CompletionStream, Error>;
}
