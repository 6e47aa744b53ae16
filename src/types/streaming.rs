//! Types for streaming responses.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One incremental unit of assistant output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedChunk {
    pub text: String,
}

impl NormalizedChunk {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// Interpretation of a single line of an event stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamLine {
    /// The line carried content.
    Chunk(NormalizedChunk),
    /// The dialect's end-of-data marker. Nothing after it is consulted.
    EndOfStream,
    /// Blank, non-data, empty-delta, or malformed line.
    Skip,
}

/// Lifecycle of a single streaming call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamPhase {
    Idle,
    Connecting,
    Streaming,
    Completed,
    Failed,
}

impl StreamPhase {
    pub fn is_terminal(self) -> bool {
        matches!(self, StreamPhase::Completed | StreamPhase::Failed)
    }

    /// Whether moving from `self` to `next` is a legal transition.
    pub fn can_transition_to(self, next: StreamPhase) -> bool {
        use StreamPhase::*;
        matches!(
            (self, next),
            (Idle, Connecting)
                | (Connecting, Streaming)
                | (Connecting, Failed)
                | (Streaming, Streaming)
                | (Streaming, Completed)
                | (Streaming, Failed)
        )
    }

    /// Move to `next`, logging the transition.
    pub fn advance(&mut self, next: StreamPhase) {
        debug_assert!(
            self.can_transition_to(next),
            "illegal stream transition {self} -> {next}"
        );
        if *self != next {
            tracing::debug!(from = %self, to = %next, "stream phase");
        }
        *self = next;
    }
}

impl fmt::Display for StreamPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}
