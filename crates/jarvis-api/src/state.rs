//! Application state shared across all route handlers.
//!
//! AppState holds references to the intent router, the storage files and
//! the voice components. It is passed to handlers via axum's State extractor.

use std::sync::Arc;
use std::time::Instant;

use jarvis_core::config::JarvisConfig;
use jarvis_router::Router;
use jarvis_storage::{ChatLog, ContactBook};
use jarvis_voice::{SpeechRecognizer, SpeechSink};

/// Shared application state.
///
/// All fields use `Arc` for cheap cloning across handler tasks.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<JarvisConfig>,
    /// Classifier, resolver and dispatcher with the wired handlers.
    pub router: Arc<Router>,
    /// Persisted chat transcript.
    pub chat_log: Arc<ChatLog>,
    pub contacts: Arc<ContactBook>,
    /// Speech input; `None` when no recognition service is configured.
    pub recognizer: Option<Arc<dyn SpeechRecognizer>>,
    /// Speech output for replies.
    pub speech: Arc<dyn SpeechSink>,
    /// Whether the conversational handler has a language model behind it.
    pub llm_configured: bool,
    /// Server start time for uptime calculation.
    pub start_time: Instant,
}

impl AppState {
    /// Create a new AppState without speech input.
    pub fn new(
        config: JarvisConfig,
        router: Router,
        chat_log: ChatLog,
        contacts: ContactBook,
        speech: Arc<dyn SpeechSink>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            router: Arc::new(router),
            chat_log: Arc::new(chat_log),
            contacts: Arc::new(contacts),
            recognizer: None,
            speech,
            llm_configured: false,
            start_time: Instant::now(),
        }
    }

    pub fn with_recognizer(mut self, recognizer: Arc<dyn SpeechRecognizer>) -> Self {
        self.recognizer = Some(recognizer);
        self
    }

    pub fn with_llm_configured(mut self, configured: bool) -> Self {
        self.llm_configured = configured;
        self
    }
}
