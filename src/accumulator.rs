//! Chunk accumulation for streaming responses.

use crate::response::NormalizedResult;
use crate::types::NormalizedChunk;

/// Accumulates streamed chunks into the full reply text.
#[derive(Debug, Default)]
pub struct TextAccumulator {
    text: String,
    chunks: usize,
}

impl TextAccumulator {
    /// Create a new accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one chunk, in arrival order.
    pub fn push(&mut self, chunk: &NormalizedChunk) {
        self.text.push_str(&chunk.text);
        self.chunks += 1;
    }

    /// Text accumulated so far.
    pub fn current_content(&self) -> &str {
        &self.text
    }

    /// Number of chunks seen.
    pub fn chunk_count(&self) -> usize {
        self.chunks
    }

    /// Finalize into the complete result.
    pub fn finalize(self) -> NormalizedResult {
        NormalizedResult::new(self.text)
    }
}
