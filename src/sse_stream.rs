//! Stream adapter decoding `data:` event lines from byte chunks.

use futures_util::{Stream, StreamExt};
use std::collections::VecDeque;
use std::pin::Pin;
use std::task::{ready, Context, Poll};

use crate::error::TransportErrorKind;
use crate::providers::Dialect;
use crate::types::{NormalizedChunk, StreamLine};
use crate::Error;

/// Upper bound on buffered bytes without a line break.
pub const MAX_LINE_BYTES: usize = 1_000_000;

/// Buffers raw bytes and yields complete lines.
///
/// Lines are only decoded as UTF-8 once complete, so multi-byte characters
/// split across reads are reassembled.
#[derive(Debug, Default)]
pub struct LineBuffer {
    buffer: Vec<u8>,
}

impl LineBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a chunk and return every line it completed, without terminators.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.buffer.extend_from_slice(chunk);

        let mut lines = Vec::new();
        let mut start = 0;
        while let Some(pos) = memchr::memchr(b'\n', &self.buffer[start..]) {
            let end = start + pos;
            if let Some(line) = Self::decode_line(&self.buffer[start..end]) {
                lines.push(line);
            }
            start = end + 1;
        }

        if start > 0 {
            self.buffer.drain(..start);
        }
        lines
    }

    /// Take whatever is left once the input has ended.
    pub fn finish(&mut self) -> Option<String> {
        if self.buffer.is_empty() {
            return None;
        }
        let rest = std::mem::take(&mut self.buffer);
        Self::decode_line(&rest)
    }

    /// Bytes held back waiting for a line break.
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }

    fn decode_line(bytes: &[u8]) -> Option<String> {
        let bytes = bytes.strip_suffix(b"\r").unwrap_or(bytes);
        match std::str::from_utf8(bytes) {
            Ok(line) => Some(line.to_string()),
            Err(e) => {
                tracing::warn!(error = %e, "skipping stream line with invalid UTF-8");
                None
            }
        }
    }
}

/// Lazily decodes a byte stream into [`NormalizedChunk`]s for one dialect.
///
/// Ends at the dialect's end marker (no later line is consulted) or when the
/// underlying stream closes. A failure of the underlying stream is yielded
/// once as [`Error::Transport`] and ends the stream.
pub struct ChunkStream<S> {
    inner: S,
    dialect: Dialect,
    lines: LineBuffer,
    pending: VecDeque<String>,
    finished: bool,
}

impl<S> ChunkStream<S> {
    pub fn new(stream: S, dialect: Dialect) -> Self {
        Self {
            inner: stream,
            dialect,
            lines: LineBuffer::new(),
            pending: VecDeque::new(),
            finished: false,
        }
    }

    /// Decode queued lines until one yields a chunk or the end marker.
    fn next_queued(&mut self) -> Option<NormalizedChunk> {
        while let Some(line) = self.pending.pop_front() {
            match self.dialect.decode_stream_event(&line) {
                StreamLine::Chunk(chunk) => return Some(chunk),
                StreamLine::EndOfStream => {
                    tracing::debug!(dialect = self.dialect.name(), "end-of-stream marker received");
                    self.finish();
                    return None;
                }
                StreamLine::Skip => {}
            }
        }
        None
    }

    fn finish(&mut self) {
        self.finished = true;
        self.pending.clear();
    }
}

impl<S, E> Stream for ChunkStream<S>
where
    S: Stream<Item = Result<bytes::Bytes, E>> + Unpin,
    E: Into<Error>,
{
    type Item = Result<NormalizedChunk, Error>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        loop {
            if let Some(chunk) = self.next_queued() {
                return Poll::Ready(Some(Ok(chunk)));
            }
            if self.finished {
                return Poll::Ready(None);
            }

            match ready!(self.inner.poll_next_unpin(cx)) {
                Some(Ok(bytes)) => {
                    let lines = self.lines.push(&bytes);
                    self.pending.extend(lines);

                    if self.lines.pending() > MAX_LINE_BYTES {
                        self.finish();
                        return Poll::Ready(Some(Err(Error::transport(
                            TransportErrorKind::Body,
                            "stream line exceeded maximum size",
                        ))));
                    }
                }
                Some(Err(e)) => {
                    self.finish();
                    return Poll::Ready(Some(Err(e.into())));
                }
                None => {
                    // Connection closed; the last line may lack a terminator.
                    if let Some(rest) = self.lines.finish() {
                        self.pending.push_back(rest);
                    }
                    let chunk = self.next_queued();
                    self.finish();
                    return Poll::Ready(chunk.map(Ok));
                }
            }
        }
    }
}

/// Extension trait to decode byte streams as chat completion chunks.
pub trait ChunkStreamExt: Stream {
    fn completion_chunks(self, dialect: Dialect) -> ChunkStream<Self>
    where
        Self: Sized,
    {
        ChunkStream::new(self, dialect)
    }
}

impl<S: Stream> ChunkStreamExt for S {}
