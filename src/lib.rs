//! A provider-abstraction and streaming-completion gateway for chat clients.
//!
//! One normalized request type is translated to the OpenAI chat-completions
//! dialect, the Anthropic messages dialect, or a self-hosted OpenAI-compatible
//! server, and the heterogeneous replies are decoded back into one normalized
//! result, either in a single exchange or as an incremental chunk stream.

pub mod accumulator;
pub mod config;
pub mod error;
pub mod gateway;
pub mod provider;
pub mod providers;
pub mod registry;
pub mod response;
pub mod sse_stream;
pub mod types;

// Re-export core types for easy usage
pub use config::GatewayConfig;
pub use error::{Error, TransportErrorKind};
pub use gateway::CompletionGateway;
pub use provider::ChatCompletion;
pub use providers::Dialect;
pub use response::{CompletionStream, NormalizedResult};
pub use types::*;
