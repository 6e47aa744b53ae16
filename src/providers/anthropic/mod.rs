//! Anthropic messages dialect.

pub mod types;

use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderValue};

use self::types::{
    ContentBlock, ContentDelta, MessagesRequest, MessagesResponse, MessagesStreamEvent,
};
use super::header_value;
use crate::response::NormalizedResult;
use crate::types::{NormalizedChunk, NormalizedRequest, StreamLine};
use crate::Error;

pub const MESSAGES_PATH: &str = "messages";
pub const API_VERSION: &str = "2023-06-01";

/// Sent when the caller did not set an output budget; the API requires one.
pub const DEFAULT_MAX_TOKENS: u32 = 1024;

pub(crate) fn insert_headers(headers: &mut HeaderMap, secret: Option<&str>) -> Result<(), Error> {
    if let Some(secret) = secret {
        headers.insert("x-api-key", header_value(secret, "API key")?);
    }
    headers.insert("anthropic-version", HeaderValue::from_static(API_VERSION));
    Ok(())
}

pub(crate) fn encode_body(request: &NormalizedRequest) -> Result<Bytes, Error> {
    let body = MessagesRequest {
        model: &request.model_id,
        messages: &request.turns,
        max_tokens: request.max_output_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
    };
    Ok(Bytes::from(serde_json::to_vec(&body)?))
}

/// Concatenate the text blocks of a messages response.
pub(crate) fn decode_response(body: &[u8]) -> Result<NormalizedResult, Error> {
    let response: MessagesResponse = serde_json::from_slice(body)
        .map_err(|e| Error::malformed(format!("invalid messages body: {e}")))?;

    let text: String = response
        .content
        .into_iter()
        .filter_map(|block| match block {
            ContentBlock::Text { text } => Some(text),
            ContentBlock::Other => None,
        })
        .collect();

    Ok(NormalizedResult::new(text))
}

pub(crate) fn decode_stream_payload(payload: &str) -> StreamLine {
    let event: MessagesStreamEvent = match serde_json::from_str(payload) {
        Ok(event) => event,
        Err(e) => {
            tracing::warn!(error = %e, payload, "skipping malformed stream event");
            return StreamLine::Skip;
        }
    };

    match event {
        MessagesStreamEvent::ContentBlockDelta {
            delta: ContentDelta::TextDelta { text },
        } if !text.is_empty() => StreamLine::Chunk(NormalizedChunk::new(text)),
        MessagesStreamEvent::MessageStop => StreamLine::EndOfStream,
        MessagesStreamEvent::Error { error } => {
            tracing::warn!(
                kind = error.kind.as_deref().unwrap_or("unknown"),
                message = error.message.as_deref().unwrap_or(""),
                "server reported an error event mid-stream"
            );
            StreamLine::Skip
        }
        _ => StreamLine::Skip,
    }
}
