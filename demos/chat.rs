//! Send one question to a built-in model and stream the reply to stdout.
//!
//! ```bash
//! export OPENAI_API_KEY=your_api_key_here
//! cargo run --example chat -- gpt-3.5-turbo "Tell me a joke about compilers."
//! ```
//!
//! Local models are reached through `CHAT_GATEWAY_LOCAL_URL` or
//! `LOCAL_LLM_BASE_URL`. Set `RUST_LOG=chat_gateway=debug` to see each call.

use std::io::Write;

use chat_gateway::registry::{builtin_models, find_model, DEFAULT_MODEL_ID};
use chat_gateway::{
    CompletionCredentials, CompletionGateway, Conversation, Error, GatewayConfig,
    GenerationParameters, NormalizedRequest,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Error> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let mut args = std::env::args().skip(1);
    let model_id = args.next().unwrap_or_else(|| DEFAULT_MODEL_ID.to_string());
    let question = args
        .next()
        .unwrap_or_else(|| "Say hello in French.".to_string());

    let Some(descriptor) = find_model(&model_id) else {
        eprintln!("Unknown model '{model_id}'. Available models:");
        for model in builtin_models() {
            eprintln!("  {:<16} {}", model.id, model.display_name);
        }
        return Err(Error::unsupported(model_id));
    };

    let gateway = CompletionGateway::new(GatewayConfig::from_env()?)?;
    let credentials = CompletionCredentials::from_env(descriptor.provider_kind)?;

    let conversation = Conversation::system("You are a helpful assistant that answers concisely.")
        .with_user(question);
    let request = NormalizedRequest::from_conversation(
        &descriptor.id,
        &conversation,
        &GenerationParameters::default(),
    );

    println!("{} says:", descriptor.display_name);
    let result = gateway
        .execute(&request, &descriptor, &credentials, |chunk| {
            print!("{}", chunk.text);
            let _ = std::io::stdout().flush();
        })
        .await?;

    if !request.stream {
        print!("{}", result.text);
    }
    println!();

    let conversation = conversation.with_result(&result);
    println!("[{} turns in conversation]", conversation.len());
    Ok(())
}
