//! OpenAI chat-completions dialect, also spoken by local servers.

pub mod types;

use bytes::Bytes;
use reqwest::header::{HeaderMap, AUTHORIZATION};

use self::types::{ChatCompletionChunk, ChatCompletionResponse};
use super::header_value;
use crate::response::NormalizedResult;
use crate::types::{NormalizedChunk, NormalizedRequest, StreamLine};
use crate::Error;

pub const COMPLETIONS_PATH: &str = "chat/completions";

/// Payload that terminates an OpenAI event stream.
pub const DONE_MARKER: &str = "[DONE]";

pub(crate) fn insert_auth(headers: &mut HeaderMap, secret: &str) -> Result<(), Error> {
    headers.insert(AUTHORIZATION, header_value(&format!("Bearer {secret}"), "API key")?);
    Ok(())
}

/// The normalized envelope is already the OpenAI body shape.
pub(crate) fn encode_body(request: &NormalizedRequest) -> Result<Bytes, Error> {
    Ok(Bytes::from(serde_json::to_vec(request)?))
}

/// Extract `choices[0].message.content`.
pub(crate) fn decode_response(body: &[u8]) -> Result<NormalizedResult, Error> {
    let response: ChatCompletionResponse = serde_json::from_slice(body)
        .map_err(|e| Error::malformed(format!("invalid chat completion body: {e}")))?;

    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message)
        .and_then(|message| message.content)
        .map(NormalizedResult::new)
        .ok_or_else(|| Error::malformed("missing choices[0].message.content"))
}

/// Decode the JSON payload of one `data:` line.
pub(crate) fn decode_stream_payload(payload: &str) -> StreamLine {
    let chunk: ChatCompletionChunk = match serde_json::from_str(payload) {
        Ok(chunk) => chunk,
        Err(e) => {
            tracing::warn!(error = %e, payload, "skipping malformed stream event");
            return StreamLine::Skip;
        }
    };

    match chunk
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.delta)
        .and_then(|delta| delta.content)
    {
        Some(text) if !text.is_empty() => StreamLine::Chunk(NormalizedChunk::new(text)),
        _ => StreamLine::Skip,
    }
}
