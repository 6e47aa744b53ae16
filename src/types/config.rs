use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::str::FromStr;
use url::Url;

use crate::Error;

/// Backend family a model is served by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    OpenAI,
    Anthropic,
    Local,
    Other,
}

impl FromStr for ProviderKind {
    type Err = Error;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        match tag.trim().to_lowercase().as_str() {
            "openai" => Ok(ProviderKind::OpenAI),
            "anthropic" => Ok(ProviderKind::Anthropic),
            "local" | "lmstudio" | "ollama" => Ok(ProviderKind::Local),
            "mistral" | "meta" | "other" => Ok(ProviderKind::Other),
            other => Err(Error::unsupported(format!("unknown provider tag '{other}'"))),
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            ProviderKind::OpenAI => "openai",
            ProviderKind::Anthropic => "anthropic",
            ProviderKind::Local => "local",
            ProviderKind::Other => "other",
        };
        f.write_str(tag)
    }
}

/// Where a model runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locality {
    Cloud,
    Local,
}

/// Identifies which dialect and address a model is reached through.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelDescriptor {
    pub id: String,
    pub display_name: String,
    pub provider_kind: ProviderKind,
    pub locality: Locality,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint_override: Option<Url>,
}

impl ModelDescriptor {
    /// Describe a cloud-hosted model.
    pub fn cloud(
        id: impl Into<String>,
        display_name: impl Into<String>,
        provider_kind: ProviderKind,
    ) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            provider_kind,
            locality: Locality::Cloud,
            endpoint_override: None,
        }
    }

    /// Describe a self-hosted model.
    pub fn local(
        id: impl Into<String>,
        display_name: impl Into<String>,
        provider_kind: ProviderKind,
    ) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            provider_kind,
            locality: Locality::Local,
            endpoint_override: None,
        }
    }

    /// Pin this model to an explicit base address.
    pub fn with_endpoint(mut self, endpoint: Url) -> Self {
        self.endpoint_override = Some(endpoint);
        self
    }

    pub fn is_local(&self) -> bool {
        self.locality == Locality::Local
    }
}

/// Sampling and delivery settings for one call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationParameters {
    pub temperature: f32,
    pub max_output_tokens: u32,
    pub streaming_requested: bool,
}

impl GenerationParameters {
    pub const MAX_TEMPERATURE: f32 = 2.0;

    /// Build parameters, clamping temperature into `[0, 2]` and tokens to at least 1.
    pub fn new(temperature: f32, max_output_tokens: u32, streaming_requested: bool) -> Self {
        let temperature = if temperature.is_nan() {
            0.0
        } else {
            temperature.clamp(0.0, Self::MAX_TEMPERATURE)
        };
        Self {
            temperature,
            max_output_tokens: max_output_tokens.max(1),
            streaming_requested,
        }
    }
}

impl Default for GenerationParameters {
    fn default() -> Self {
        Self::new(0.7, 2000, true)
    }
}

/// Per-call secrets and address override. Never persisted by the gateway.
#[derive(Clone, Default, PartialEq)]
pub struct CompletionCredentials {
    pub secret_key: Option<String>,
    pub base_url_override: Option<Url>,
}

impl fmt::Debug for CompletionCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompletionCredentials")
            .field("secret_key", &self.secret_key.as_ref().map(|_| "<redacted>"))
            .field("base_url_override", &self.base_url_override)
            .finish()
    }
}

impl CompletionCredentials {
    /// Credentials with just a secret key.
    pub fn with_key(secret_key: impl Into<String>) -> Self {
        Self {
            secret_key: Some(secret_key.into()),
            base_url_override: None,
        }
    }

    /// No key and no override, as used for unauthenticated local servers.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn base_url(mut self, base_url: Url) -> Self {
        self.base_url_override = Some(base_url);
        self
    }

    /// The secret key, treating an empty string as absent.
    pub fn secret(&self) -> Option<&str> {
        self.secret_key.as_deref().filter(|key| !key.is_empty())
    }

    /// Load credentials for a provider from environment variables.
    ///
    /// Reads `<PREFIX>_API_KEY` and `<PREFIX>_BASE_URL`, where the prefix is
    /// `OPENAI`, `ANTHROPIC`, or `LOCAL_LLM`. Missing variables are left unset.
    pub fn from_env(kind: ProviderKind) -> Result<Self, Error> {
        let prefix = match kind {
            ProviderKind::OpenAI => "OPENAI",
            ProviderKind::Anthropic => "ANTHROPIC",
            ProviderKind::Local | ProviderKind::Other => "LOCAL_LLM",
        };

        let secret_key = env::var(format!("{prefix}_API_KEY")).ok();
        let base_url_override = match env::var(format!("{prefix}_BASE_URL")) {
            Ok(raw) => Some(Url::parse(&raw).map_err(|e| {
                Error::config(format!("{prefix}_BASE_URL is not a valid URL: {e}"))
            })?),
            Err(_) => None,
        };

        Ok(Self {
            secret_key,
            base_url_override,
        })
    }
}
