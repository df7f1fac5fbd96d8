use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{JarvisError, Result};

/// Top-level configuration for the Jarvis backend.
///
/// Loaded from `~/.jarvis/config.toml` by default. Every section falls back
/// to its defaults when missing, so an empty file is a valid configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JarvisConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub router: RouterConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub automation: AutomationConfig,
    #[serde(default)]
    pub email: EmailConfig,
    #[serde(default)]
    pub voice: VoiceConfig,
    #[serde(default)]
    pub tts: TtsConfig,
}

impl JarvisConfig {
    /// Load configuration from a TOML file.
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: JarvisConfig = toml::from_str(&content)?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the
    /// file does not exist or cannot be parsed.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    "Failed to load config from {}: {}. Using defaults.",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Save the current configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| JarvisError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }
}

/// Read a secret from the environment variable named in config.
///
/// Empty values count as unset.
pub fn secret_from_env(var: &str) -> Option<String> {
    std::env::var(var)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Directory holding `chats.json` and `contacts.json`.
    pub data_dir: String,
    /// Log level: trace, debug, info, warn, error.
    pub log_level: String,
    /// HTTP port (the server always binds to 127.0.0.1).
    pub port: u16,
    /// Sustained `/api` requests per second; also the burst size.
    pub rate_limit_per_sec: u32,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            data_dir: "~/.jarvis/data".to_string(),
            log_level: "info".to_string(),
            port: 5000,
            rate_limit_per_sec: 50,
        }
    }
}

/// Routing policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RouterConfig {
    /// Bound each handler call by the strategy's timeout.
    pub enforce_timeouts: bool,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            enforce_timeouts: true,
        }
    }
}

/// OpenAI-compatible chat completion endpoint used by the conversational handler.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Base URL; `/v1/chat/completions` is appended.
    pub base_url: String,
    pub model: String,
    /// Environment variable holding the API key. No key means no LLM.
    pub api_key_env: String,
    pub temperature: f32,
    pub max_tokens: u32,
    /// Number of history messages kept per conversation.
    pub history_turns: usize,
    pub system_prompt: String,
    /// Request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.groq.com/openai".to_string(),
            model: "llama-3.1-8b-instant".to_string(),
            api_key_env: "GROQ_API_KEY".to_string(),
            temperature: 0.7,
            max_tokens: 1024,
            history_turns: 10,
            system_prompt: "You are Jarvis, an intelligent AI assistant. Be helpful, concise, \
                            and friendly. Provide informative answers."
                .to_string(),
            request_timeout_secs: 30,
        }
    }
}

/// Desktop and web automation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AutomationConfig {
    /// Log desktop actions instead of performing them.
    pub dry_run: bool,
    /// Query URL prefix for web searches.
    pub search_url: String,
    /// Query URL prefix for YouTube searches.
    pub youtube_url: String,
    pub weather_url: String,
    pub news_url: String,
    /// Base URL of the Wikipedia REST API.
    pub wikipedia_url: String,
    /// Sentences kept from a Wikipedia summary.
    pub wikipedia_sentences: usize,
}

impl Default for AutomationConfig {
    fn default() -> Self {
        Self {
            dry_run: false,
            search_url: "https://www.google.com/search?q=".to_string(),
            youtube_url: "https://www.youtube.com/results?search_query=".to_string(),
            weather_url: "https://www.google.com/search?q=weather".to_string(),
            news_url: "https://news.google.com".to_string(),
            wikipedia_url: "https://en.wikipedia.org/api/rest_v1".to_string(),
            wikipedia_sentences: 2,
        }
    }
}

/// Outgoing mail settings for the "send email" command.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmailConfig {
    pub smtp_host: String,
    pub smtp_port: u16,
    pub sender: String,
    pub recipient: String,
    /// Environment variable holding the SMTP app password.
    pub password_env: String,
    pub subject: String,
    pub body: String,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            smtp_host: "smtp.gmail.com".to_string(),
            smtp_port: 587,
            sender: String::new(),
            recipient: String::new(),
            password_env: "JARVIS_SMTP_PASSWORD".to_string(),
            subject: "Message from Jarvis AI Assistant".to_string(),
            body: "Hello,\n\nThis is an automated message sent from Jarvis AI Assistant.\n\n\
                   Best regards,\nJarvis AI Assistant"
                .to_string(),
        }
    }
}

/// Speech-to-text service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VoiceConfig {
    /// Base URL of the speech service. Voice chat is disabled when unset.
    pub stt_url: Option<String>,
    /// Seconds to wait for speech to start.
    pub listen_timeout_secs: u32,
    /// Maximum phrase length in seconds.
    pub phrase_limit_secs: u32,
    pub language: String,
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            stt_url: None,
            listen_timeout_secs: 5,
            phrase_limit_secs: 10,
            language: "en-US".to_string(),
        }
    }
}

/// Text-to-speech output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TtsConfig {
    pub enabled: bool,
    /// Program invoked with the text as its last argument (e.g. `espeak`).
    /// When unset, announcements are only logged.
    pub command: Option<String>,
    /// Words per minute, passed as `-s <rate>` to the program.
    pub rate: u32,
}

impl Default for TtsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            command: None,
            rate: 170,
        }
    }
}
