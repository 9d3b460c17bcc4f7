//! Disputare binary - composition root.
//!
//! 1. Parse CLI args and load configuration from TOML
//! 2. Install the tracing subscriber (stderr)
//! 3. Resolve the API key and build the completion transport
//! 4. Show the disclaimer, then run the conversation loop

mod cli;
mod terminal;

use std::sync::Arc;

use clap::Parser;
use tokio::io::BufReader;

use disputare_chat::{
    ApiKey, CompletionGateway, CompletionTransport, ConversationController, HttpTransport,
    MockTransport, SessionState,
};
use disputare_core::config::DisputareConfig;

use cli::CliArgs;

const OFFLINE_REPLY: &str = "\u{2022} (offline) What would change your mind about that?\n\
\u{2022} (offline) Who disagrees with you, and what is their best argument?";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    // .env is optional.
    let _ = dotenvy::dotenv();

    // Config.
    let config_file = args.resolve_config_path();
    let mut config = DisputareConfig::load_or_default(&config_file);
    args.apply_overrides(&mut config);

    // Tracing.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new(args.resolve_log_level(&config))
            }),
        )
        .init();

    tracing::info!("Starting Disputare v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(path = %config_file.display(), "Configuration resolved");

    // Credential and transport.
    let mut credential = config.completion.api_key_from_env().map(ApiKey::new);
    let transport: Arc<dyn CompletionTransport> = if args.offline {
        tracing::info!("Offline mode: replies are canned");
        if credential.is_none() {
            credential = Some(ApiKey::new("offline"));
        }
        Arc::new(MockTransport::with_default_reply(OFFLINE_REPLY))
    } else {
        tracing::info!(endpoint = %config.completion.endpoint, model = %config.completion.model, "Using remote completions");
        Arc::new(HttpTransport::new(config.completion.endpoint.clone()))
    };
    if credential.is_none() {
        tracing::warn!(
            env = %config.completion.api_key_env,
            "API key not set; replies will report the missing key"
        );
    }

    let gateway = CompletionGateway::new(transport, credential, config.completion.clone());
    let controller = ConversationController::new(
        gateway,
        config.conversation.default_depth,
        config.conversation.overlap_policy,
    );

    // Session.
    let mut session = SessionState::start();
    let mut stdin = BufReader::new(tokio::io::stdin());
    let mut stdout = std::io::stdout();

    if args.accept_disclaimer {
        session.acknowledge();
    } else if !terminal::acknowledge_disclaimer(&mut session, &mut stdin, &mut stdout).await? {
        tracing::info!("Disclaimer declined; exiting");
        return Ok(());
    }

    terminal::run(&controller, &session, &mut stdin, &mut stdout).await?;

    Ok(())
}
