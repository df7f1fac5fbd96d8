//! Speech-to-text.
//!
//! Recognisers never hand back error text as if it were speech; every
//! non-speech outcome is its own [`Transcription`] variant.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use jarvis_core::config::VoiceConfig;

use crate::error::VoiceError;

/// Outcome of one listening attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transcription {
    Text(String),
    TimedOut,
    Unrecognized,
    ServiceError(String),
}

impl Transcription {
    /// The recognised text, if any speech was understood.
    pub fn text(&self) -> Option<&str> {
        match self {
            Transcription::Text(t) => Some(t),
            _ => None,
        }
    }

    /// What to tell the user about this outcome.
    pub fn user_message(&self) -> String {
        match self {
            Transcription::Text(t) => t.clone(),
            Transcription::TimedOut => "Listening timeout - no speech detected".to_string(),
            Transcription::Unrecognized => {
                "Could not understand audio - please speak clearly".to_string()
            }
            Transcription::ServiceError(detail) => {
                format!("Speech recognition service error: {}", detail)
            }
        }
    }
}

/// Captures one utterance from the user.
#[async_trait]
pub trait SpeechRecognizer: Send + Sync {
    async fn listen_once(&self) -> Transcription;
}

#[derive(Debug, Deserialize)]
struct ListenResponse {
    status: String,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    detail: Option<String>,
}

impl ListenResponse {
    fn into_transcription(self) -> Transcription {
        match self.status.as_str() {
            "ok" => match self.text.map(|t| t.trim().to_string()) {
                Some(text) if !text.is_empty() => Transcription::Text(text),
                _ => Transcription::Unrecognized,
            },
            "timeout" => Transcription::TimedOut,
            "unrecognized" => Transcription::Unrecognized,
            _ => Transcription::ServiceError(
                self.detail
                    .unwrap_or_else(|| format!("unexpected status '{}'", self.status)),
            ),
        }
    }
}

/// Client timeout for one listen: the listen window, the phrase and a margin.
fn listen_budget_secs(config: &VoiceConfig) -> u64 {
    u64::from(config.listen_timeout_secs)
        .saturating_add(u64::from(config.phrase_limit_secs))
        .saturating_add(15)
}

/// Asks a speech service to record and transcribe one phrase.
///
/// `GET {base}/listen?timeout=&phrase_limit=&language=` answers
/// `{"status": "ok" | "timeout" | "unrecognized" | "error", "text", "detail"}`.
pub struct HttpRecognizer {
    client: reqwest::Client,
    base_url: String,
    config: VoiceConfig,
}

impl HttpRecognizer {
    pub fn new(base_url: impl Into<String>, config: VoiceConfig) -> Result<Self, VoiceError> {
        // Listening can take the whole timeout plus the phrase.
        let budget = listen_budget_secs(&config);
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(budget))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            config,
        })
    }

    /// Build from configuration; `None` when no service URL is set.
    pub fn from_config(config: &VoiceConfig) -> Result<Option<Self>, VoiceError> {
        match &config.stt_url {
            Some(url) if !url.trim().is_empty() => Self::new(url.clone(), config.clone()).map(Some),
            _ => Ok(None),
        }
    }

    async fn request(&self) -> Result<ListenResponse, VoiceError> {
        let url = format!("{}/listen", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("timeout", self.config.listen_timeout_secs.to_string()),
                ("phrase_limit", self.config.phrase_limit_secs.to_string()),
                ("language", self.config.language.clone()),
            ])
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json().await?)
    }
}

#[async_trait]
impl SpeechRecognizer for HttpRecognizer {
    async fn listen_once(&self) -> Transcription {
        tracing::info!("Listening for speech");
        match self.request().await {
            Ok(response) => {
                let transcription = response.into_transcription();
                tracing::info!(outcome = ?transcription, "Speech recognition finished");
                transcription
            }
            Err(e) => {
                tracing::warn!(error = %e, "Speech service request failed");
                Transcription::ServiceError(e.to_string())
            }
        }
    }
}

/// Replays a fixed sequence of outcomes, then times out.
#[derive(Default)]
pub struct ScriptedRecognizer {
    script: Mutex<VecDeque<Transcription>>,
}

impl ScriptedRecognizer {
    pub fn new(script: impl IntoIterator<Item = Transcription>) -> Self {
        Self {
            script: Mutex::new(script.into_iter().collect()),
        }
    }
}

#[async_trait]
impl SpeechRecognizer for ScriptedRecognizer {
    async fn listen_once(&self) -> Transcription {
        self.script
            .lock()
            .ok()
            .and_then(|mut s| s.pop_front())
            .unwrap_or(Transcription::TimedOut)
    }
}
