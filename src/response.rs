//! Normalized results and the streamed completion handle.

use futures_util::stream::Stream;
use futures_util::StreamExt;
use serde::{Deserialize, Serialize};
use std::pin::Pin;

use crate::accumulator::TextAccumulator;
use crate::types::{NormalizedChunk, StreamPhase};
use crate::Error;

/// The full assistant reply.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NormalizedResult {
    pub text: String,
}

impl NormalizedResult {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

type ChunkStreamBox = Pin<Box<dyn Stream<Item = Result<NormalizedChunk, Error>> + Send>>;

/// An open streaming completion.
///
/// Chunks are only read from the connection as the stream is polled. Dropping
/// the handle closes the connection.
pub struct CompletionStream {
    stream: ChunkStreamBox,
    phase: StreamPhase,
}

impl CompletionStream {
    /// Create a handle from a stream of chunks that is already open.
    pub fn from_stream<S>(stream: S) -> Self
    where
        S: Stream<Item = Result<NormalizedChunk, Error>> + Send + 'static,
    {
        let mut phase = StreamPhase::Idle;
        phase.advance(StreamPhase::Connecting);
        phase.advance(StreamPhase::Streaming);
        Self::with_phase(stream, phase)
    }

    /// Continue a call whose setup already moved `phase` to `Streaming`.
    pub(crate) fn with_phase<S>(stream: S, phase: StreamPhase) -> Self
    where
        S: Stream<Item = Result<NormalizedChunk, Error>> + Send + 'static,
    {
        debug_assert_eq!(phase, StreamPhase::Streaming);
        Self {
            stream: Box::pin(stream),
            phase,
        }
    }

    /// Where the call currently is in its lifecycle.
    pub fn phase(&self) -> StreamPhase {
        self.phase
    }

    /// Stream the chunks.
    pub fn stream(self) -> ChunkStreamBox {
        self.stream
    }

    /// Buffer the whole reply.
    pub async fn text(self) -> Result<NormalizedResult, Error> {
        self.drive(|_| {}, |_| {}).await
    }

    /// Deliver chunks to `on_chunk` in arrival order, then the full text to
    /// `on_complete` exactly once.
    ///
    /// On a mid-stream failure the error is returned and `on_complete` is not
    /// called. The accumulated result is also returned on success.
    pub async fn drive<F, G>(
        self,
        mut on_chunk: F,
        on_complete: G,
    ) -> Result<NormalizedResult, Error>
    where
        F: FnMut(&NormalizedChunk),
        G: FnOnce(&NormalizedResult),
    {
        let Self { mut stream, mut phase } = self;
        let mut accumulator = TextAccumulator::new();

        while let Some(next) = stream.next().await {
            match next {
                Ok(chunk) => {
                    phase.advance(StreamPhase::Streaming);
                    on_chunk(&chunk);
                    accumulator.push(&chunk);
                }
                Err(e) => {
                    phase.advance(StreamPhase::Failed);
                    tracing::warn!(
                        error = %e,
                        chunks = accumulator.chunk_count(),
                        "stream terminated by error"
                    );
                    return Err(e);
                }
            }
        }

        phase.advance(StreamPhase::Completed);
        tracing::debug!(chunks = accumulator.chunk_count(), "stream completed");
        let result = accumulator.finalize();
        on_complete(&result);
        Ok(result)
    }
}
