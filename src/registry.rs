//! Static description of the supported backends.

use url::Url;

use crate::config::GatewayConfig;
use crate::providers::Dialect;
use crate::types::{CompletionCredentials, Locality, ModelDescriptor, ProviderKind};
use crate::Error;

pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const ANTHROPIC_BASE_URL: &str = "https://api.anthropic.com/v1";

/// Id of the model selected when the user has not picked one.
pub const DEFAULT_MODEL_ID: &str = "gpt-3.5-turbo";

/// Map a provider kind to the wire dialect used to talk to it.
pub fn dialect_for(kind: ProviderKind) -> Dialect {
    match kind {
        ProviderKind::OpenAI => Dialect::OpenAICompatible,
        ProviderKind::Anthropic => Dialect::AnthropicMessages,
        ProviderKind::Local | ProviderKind::Other => Dialect::LocalGeneric,
    }
}

/// The address explicitly configured for this call, if any.
///
/// Descriptor endpoint wins over the credentials' base URL.
pub fn explicit_address<'a>(
    descriptor: &'a ModelDescriptor,
    credentials: &'a CompletionCredentials,
) -> Option<&'a Url> {
    descriptor
        .endpoint_override
        .as_ref()
        .or(credentials.base_url_override.as_ref())
}

/// Resolve the base address a request for `descriptor` is sent to.
///
/// Precedence: descriptor endpoint, then credentials base URL, then the
/// provider default. Local models without an override use the configured
/// loopback default. `Other` providers have no default.
pub fn resolve_address(
    descriptor: &ModelDescriptor,
    credentials: &CompletionCredentials,
    config: &GatewayConfig,
) -> Result<Url, Error> {
    if let Some(address) = explicit_address(descriptor, credentials) {
        return Ok(address.clone());
    }

    let default = match (descriptor.provider_kind, descriptor.locality) {
        (ProviderKind::Other, _) => {
            return Err(Error::unsupported(format!(
                "no endpoint configured for {} ({})",
                descriptor.display_name, descriptor.provider_kind
            )));
        }
        (ProviderKind::Local, _) | (_, Locality::Local) => {
            return Ok(config.local_default_url.clone())
        }
        (ProviderKind::OpenAI, Locality::Cloud) => OPENAI_BASE_URL,
        (ProviderKind::Anthropic, Locality::Cloud) => ANTHROPIC_BASE_URL,
    };

    Url::parse(default)
        .map_err(|e| Error::config(format!("invalid default address {default}: {e}")))
}

/// The models offered out of the box.
pub fn builtin_models() -> Vec<ModelDescriptor> {
    vec![
        ModelDescriptor::cloud("gpt-3.5-turbo", "GPT-3.5 Turbo", ProviderKind::OpenAI),
        ModelDescriptor::cloud("gpt-4", "GPT-4", ProviderKind::OpenAI),
        ModelDescriptor::cloud("claude-3-opus", "Claude 3 Opus", ProviderKind::Anthropic),
        ModelDescriptor::local("llama-3-70b", "Llama 3 (70B)", ProviderKind::Other),
        ModelDescriptor::local("mistral-7b", "Mistral (7B)", ProviderKind::Other),
    ]
}

/// Look up a built-in model by id.
pub fn find_model(id: &str) -> Option<ModelDescriptor> {
    builtin_models().into_iter().find(|model| model.id == id)
}
