//! Wire dialects spoken by the supported backends.
//!
//! Each dialect is a set of pure translation functions between the normalized
//! request/result types and one backend's HTTP shapes. The gateway picks a
//! dialect through [`crate::registry::dialect_for`] and never inspects wire
//! payloads itself.

pub mod anthropic;
pub mod openai;

use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use url::Url;

use crate::response::NormalizedResult;
use crate::types::{CompletionCredentials, NormalizedRequest, StreamLine};
use crate::Error;

/// Prefix of every line that carries event data.
pub const DATA_MARKER: &str = "data:";

pub const EVENT_STREAM: &str = "text/event-stream";

/// The closed set of wire protocols.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dialect {
    /// OpenAI chat completions, spoken by OpenAI itself.
    OpenAICompatible,
    /// Anthropic messages API.
    AnthropicMessages,
    /// Self-hosted servers emulating OpenAI chat completions. Auth is optional.
    LocalGeneric,
}

/// Headers and body ready to be POSTed.
#[derive(Debug, Clone)]
pub struct EncodedRequest {
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl Dialect {
    pub fn name(self) -> &'static str {
        match self {
            Dialect::OpenAICompatible => "openai",
            Dialect::AnthropicMessages => "anthropic",
            Dialect::LocalGeneric => "local",
        }
    }

    /// Whether cloud calls in this dialect must carry a secret key.
    pub fn requires_auth(self) -> bool {
        match self {
            Dialect::OpenAICompatible | Dialect::AnthropicMessages => true,
            Dialect::LocalGeneric => false,
        }
    }

    /// Path appended to the resolved base address.
    pub fn completions_path(self) -> &'static str {
        match self {
            Dialect::OpenAICompatible | Dialect::LocalGeneric => openai::COMPLETIONS_PATH,
            Dialect::AnthropicMessages => anthropic::MESSAGES_PATH,
        }
    }

    /// Build the full request URL from a base address.
    ///
    /// The path is appended to the base's segments; any query is kept.
    pub fn completions_url(self, base: &Url) -> Result<Url, Error> {
        let mut url = base.clone();
        url.path_segments_mut()
            .map_err(|_| Error::config(format!("endpoint {base} cannot carry a path")))?
            .pop_if_empty()
            .extend(self.completions_path().split('/'));
        Ok(url)
    }

    /// Literal payload that ends the event stream, if the dialect uses one.
    pub fn end_marker(self) -> Option<&'static str> {
        match self {
            Dialect::OpenAICompatible | Dialect::LocalGeneric => Some(openai::DONE_MARKER),
            Dialect::AnthropicMessages => None,
        }
    }

    /// Encode a normalized request into headers and body.
    ///
    /// With `auth_required` set, a missing secret key fails with
    /// [`Error::MissingCredentials`]; otherwise the auth header is only sent
    /// when a key is present.
    pub fn encode_request(
        self,
        request: &NormalizedRequest,
        credentials: &CompletionCredentials,
        auth_required: bool,
    ) -> Result<EncodedRequest, Error> {
        let secret = credentials.secret();
        if auth_required && secret.is_none() {
            return Err(Error::missing_credentials(format!(
                "an API key is required for the {} dialect",
                self.name()
            )));
        }

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if request.stream {
            headers.insert(ACCEPT, HeaderValue::from_static(EVENT_STREAM));
        }

        let body = match self {
            Dialect::OpenAICompatible | Dialect::LocalGeneric => {
                if let Some(secret) = secret {
                    openai::insert_auth(&mut headers, secret)?;
                }
                openai::encode_body(request)?
            }
            Dialect::AnthropicMessages => {
                anthropic::insert_headers(&mut headers, secret)?;
                anthropic::encode_body(request)?
            }
        };

        Ok(EncodedRequest { headers, body })
    }

    /// Decode a complete (non-streaming) response body.
    pub fn decode_response(self, body: &[u8]) -> Result<NormalizedResult, Error> {
        match self {
            Dialect::OpenAICompatible | Dialect::LocalGeneric => openai::decode_response(body),
            Dialect::AnthropicMessages => anthropic::decode_response(body),
        }
    }

    /// Interpret one line of an event stream.
    pub fn decode_stream_event(self, line: &str) -> StreamLine {
        let line = line.trim_end();
        if line.is_empty() {
            return StreamLine::Skip;
        }
        let Some(payload) = line.strip_prefix(DATA_MARKER) else {
            return StreamLine::Skip;
        };
        let payload = payload.trim_start();

        if self.end_marker() == Some(payload) {
            return StreamLine::EndOfStream;
        }

        match self {
            Dialect::OpenAICompatible | Dialect::LocalGeneric => {
                openai::decode_stream_payload(payload)
            }
            Dialect::AnthropicMessages => anthropic::decode_stream_payload(payload),
        }
    }
}

pub(crate) fn header_value(raw: &str, what: &str) -> Result<HeaderValue, Error> {
    HeaderValue::from_str(raw)
        .map_err(|_| Error::config(format!("{what} contains invalid header characters")))
}
