use serde::{Deserialize, Serialize};

use super::config::GenerationParameters;
use super::message::ChatTurn;
use super::prompt::Conversation;

/// The canonical request envelope accepted by the gateway.
///
/// Serializes to the OpenAI chat-completions body shape, which is also the body
/// sent verbatim by the OpenAI-compatible dialects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedRequest {
    #[serde(rename = "messages")]
    pub turns: Vec<ChatTurn>,
    #[serde(rename = "model")]
    pub model_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(rename = "max_tokens", skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u32>,
    pub stream: bool,
}

impl NormalizedRequest {
    /// Create a request with no sampling overrides.
    pub fn new(model_id: impl Into<String>, turns: Vec<ChatTurn>) -> Self {
        Self {
            turns,
            model_id: model_id.into(),
            temperature: None,
            max_output_tokens: None,
            stream: false,
        }
    }

    /// Assemble a request from conversation state and generation parameters.
    pub fn from_conversation(
        model_id: impl Into<String>,
        conversation: &Conversation,
        params: &GenerationParameters,
    ) -> Self {
        Self {
            turns: conversation.turns().to_vec(),
            model_id: model_id.into(),
            temperature: Some(params.temperature),
            max_output_tokens: Some(params.max_output_tokens),
            stream: params.streaming_requested,
        }
    }

    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn max_output_tokens(mut self, max_output_tokens: u32) -> Self {
        self.max_output_tokens = Some(max_output_tokens);
        self
    }

    pub fn stream(mut self, stream: bool) -> Self {
        self.stream = stream;
        self
    }
}
