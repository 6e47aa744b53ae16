use std::env;
use std::time::Duration;
use url::Url;

use crate::Error;

/// Default overall timeout for one call, streaming included.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Default address of an OpenAI-compatible server on the loopback interface.
pub const DEFAULT_LOCAL_BASE_URL: &str = "http://localhost:11434/v1";

/// Configuration for constructing a [`crate::CompletionGateway`].
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Applied uniformly to blocking and streaming calls.
    pub request_timeout: Duration,
    /// Used for `local` models that have no explicit address.
    pub local_default_url: Url,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            local_default_url: default_local_url(),
        }
    }
}

impl GatewayConfig {
    pub fn with_timeout(mut self, request_timeout: Duration) -> Self {
        self.request_timeout = request_timeout;
        self
    }

    pub fn with_local_default_url(mut self, local_default_url: Url) -> Self {
        self.local_default_url = local_default_url;
        self
    }

    /// Create configuration from environment variables.
    ///
    /// `CHAT_GATEWAY_TIMEOUT_SECS` overrides the request timeout and
    /// `CHAT_GATEWAY_LOCAL_URL` the local default address. Unset variables keep
    /// the defaults.
    pub fn from_env() -> Result<Self, Error> {
        let mut config = Self::default();

        if let Ok(raw) = env::var("CHAT_GATEWAY_TIMEOUT_SECS") {
            let secs: u64 = raw.trim().parse().map_err(|_| {
                Error::config(format!(
                    "CHAT_GATEWAY_TIMEOUT_SECS must be a whole number of seconds, got '{raw}'"
                ))
            })?;
            if secs == 0 {
                return Err(Error::config("CHAT_GATEWAY_TIMEOUT_SECS must be greater than zero"));
            }
            config.request_timeout = Duration::from_secs(secs);
        }

        if let Ok(raw) = env::var("CHAT_GATEWAY_LOCAL_URL") {
            config.local_default_url = Url::parse(&raw).map_err(|e| {
                Error::config(format!("CHAT_GATEWAY_LOCAL_URL is not a valid URL: {e}"))
            })?;
        }

        Ok(config)
    }
}

fn default_local_url() -> Url {
    Url::parse(DEFAULT_LOCAL_BASE_URL).expect("DEFAULT_LOCAL_BASE_URL is a valid URL")
}
