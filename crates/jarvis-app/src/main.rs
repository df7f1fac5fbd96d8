//! Jarvis application binary - composition root.
//!
//! Ties together all Jarvis crates into a single executable:
//! 1. Parse CLI flags and load configuration from TOML
//! 2. Open the chat log and contact book
//! 3. Build the automation and conversational handlers behind the router
//! 4. Wire speech input and output
//! 5. Start the axum REST API server

mod cli;

use std::sync::Arc;

use clap::Parser;

use jarvis_api::routes;
use jarvis_api::state::AppState;
use jarvis_automation::AutomationHandler;
use jarvis_chat::ConversationalHandler;
use jarvis_core::config::JarvisConfig;
use jarvis_router::{Dispatcher, Handlers, Router};
use jarvis_storage::{ChatLog, ContactBook};
use jarvis_voice::{Announcer, HttpRecognizer, SpeechRecognizer};

use crate::cli::{expand_home, CliArgs};

/// Fold CLI and environment overrides into the loaded configuration.
fn apply_overrides(config: &mut JarvisConfig, args: &CliArgs) {
    config.general.port = args.resolve_port(config.general.port);
    if let Some(dir) = args.resolve_data_dir() {
        config.general.data_dir = dir;
    }
    if let Some(level) = args.resolve_log_level() {
        config.general.log_level = level;
    }
    if args.dry_run {
        config.automation.dry_run = true;
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    // Config.
    let config_file = args.resolve_config_path();
    let mut config = JarvisConfig::load_or_default(&config_file);
    apply_overrides(&mut config, &args);

    // Tracing. RUST_LOG wins over the configured level.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.general.log_level)),
        )
        .init();

    tracing::info!("Starting Jarvis v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(path = %config_file.display(), "Configuration resolved");

    // Storage.
    let data_dir = expand_home(&config.general.data_dir);
    if let Err(e) = std::fs::create_dir_all(&data_dir) {
        tracing::error!(path = %data_dir.display(), error = %e, "Failed to create data directory");
        return Err(e.into());
    }
    let chat_log = ChatLog::open(data_dir.join("chats.json"))?;
    let contacts = ContactBook::open(data_dir.join("contacts.json"))?;
    tracing::info!(path = %data_dir.display(), "Data files opened");

    // Handlers.
    let automation = Arc::new(AutomationHandler::from_config(&config)?);
    let conversational = Arc::new(ConversationalHandler::from_config(&config.llm)?);
    let llm_configured = conversational.has_model();
    if llm_configured {
        tracing::info!(model = %config.llm.model, "Language model configured");
    } else {
        tracing::warn!(
            key_env = %config.llm.api_key_env,
            "No language model API key, conversation uses canned replies"
        );
    }
    if config.automation.dry_run {
        tracing::info!("Automation dry run: actions are logged, not performed");
    }

    let handlers = Handlers::new()
        .with_automation(automation)
        .with_conversational(conversational);
    let router = Router::new(handlers, Dispatcher::new(config.router.enforce_timeouts));

    // Speech.
    let speech = Arc::new(Announcer::from_config(&config.tts));
    let recognizer = HttpRecognizer::from_config(&config.voice)?
        .map(|r| Arc::new(r) as Arc<dyn SpeechRecognizer>);
    if recognizer.is_none() {
        tracing::info!("No speech recognition service configured, voice chat disabled");
    }

    let mut state = AppState::new(config.clone(), router, chat_log, contacts, speech)
        .with_llm_configured(llm_configured);
    if let Some(recognizer) = recognizer {
        state = state.with_recognizer(recognizer);
    }

    // === API server ===

    if let Err(e) = routes::start_server(&config, state).await {
        tracing::error!(port = config.general.port, error = %e, "API server stopped");
        tracing::error!("Try: JARVIS_PORT={} jarvis", config.general.port.saturating_add(1));
        return Err(e.into());
    }

    Ok(())
}
