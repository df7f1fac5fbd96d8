//! Text-to-speech output.
//!
//! Announcements are queued on an unbounded channel and spoken one at a
//! time by a background task, so `announce` returns immediately and
//! speech never overlaps.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::process::Command;
use tokio::sync::mpsc;

use jarvis_core::config::TtsConfig;

use crate::error::VoiceError;

/// Something that can say a line of text out loud.
#[async_trait]
pub trait SpeechEngine: Send + Sync {
    async fn speak(&self, text: &str) -> Result<(), VoiceError>;
}

/// Runs an external TTS program as `<program> -s <rate> -- <text>`.
#[derive(Debug, Clone)]
pub struct CommandEngine {
    program: String,
    rate: u32,
}

impl CommandEngine {
    pub fn new(program: impl Into<String>, rate: u32) -> Self {
        Self {
            program: program.into(),
            rate,
        }
    }

    /// `<program> -s <rate> -- <text>`; text after `--` is never an option.
    fn command(&self, text: &str) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.arg("-s")
            .arg(self.rate.to_string())
            .arg("--")
            .arg(text);
        cmd
    }
}

#[async_trait]
impl SpeechEngine for CommandEngine {
    async fn speak(&self, text: &str) -> Result<(), VoiceError> {
        let status = self
            .command(text)
            .stdout(std::process::Stdio::null())
            .stderr(std::process::Stdio::null())
            .status()
            .await
            .map_err(|e| VoiceError::Engine(format!("{}: {}", self.program, e)))?;

        if !status.success() {
            return Err(VoiceError::Engine(format!(
                "{} exited with {}",
                self.program, status
            )));
        }
        Ok(())
    }
}

/// Logs instead of speaking.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentEngine;

#[async_trait]
impl SpeechEngine for SilentEngine {
    async fn speak(&self, text: &str) -> Result<(), VoiceError> {
        tracing::info!(text = %text, "Speaking");
        Ok(())
    }
}

/// Fire-and-forget speech output.
pub trait SpeechSink: Send + Sync {
    fn announce(&self, text: &str);
}

/// Queues announcements for a single background speaker task.
#[derive(Clone)]
pub struct Announcer {
    tx: mpsc::UnboundedSender<String>,
}

impl Announcer {
    /// Start the speaker task. Must be called inside a tokio runtime.
    pub fn spawn(engine: Arc<dyn SpeechEngine>) -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel::<String>();
        tokio::spawn(async move {
            while let Some(text) = rx.recv().await {
                if let Err(e) = engine.speak(&text).await {
                    tracing::warn!(error = %e, "Text-to-speech failed");
                }
            }
            tracing::debug!("Announcer stopped");
        });
        Self { tx }
    }

    /// Pick the engine from configuration and start the speaker task.
    pub fn from_config(config: &TtsConfig) -> Self {
        let engine: Arc<dyn SpeechEngine> = match (&config.command, config.enabled) {
            (Some(program), true) if !program.trim().is_empty() => {
                tracing::info!(program = %program, rate = config.rate, "Text-to-speech enabled");
                Arc::new(CommandEngine::new(program.clone(), config.rate))
            }
            _ => Arc::new(SilentEngine),
        };
        Self::spawn(engine)
    }
}

impl SpeechSink for Announcer {
    fn announce(&self, text: &str) {
        let text = text.trim();
        if text.is_empty() {
            return;
        }
        if self.tx.send(text.to_string()).is_err() {
            tracing::warn!("Announcer task is gone, dropping announcement");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::time::Duration;

    #[derive(Default)]
    struct Recorder {
        spoken: Mutex<Vec<String>>,
        fail_on: Option<&'static str>,
    }

    #[async_trait]
    impl SpeechEngine for Recorder {
        async fn speak(&self, text: &str) -> Result<(), VoiceError> {
            if self.fail_on == Some(text) {
                return Err(VoiceError::Engine("no audio device".to_string()));
            }
            self.spoken.lock().unwrap().push(text.to_string());
            Ok(())
        }
    }

    async fn wait_for(recorder: &Recorder, n: usize) {
        for _ in 0..100 {
            if recorder.spoken.lock().unwrap().len() >= n {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    }

    #[tokio::test]
    async fn test_announcements_spoken_in_order() {
        let recorder = Arc::new(Recorder::default());
        let announcer = Announcer::spawn(recorder.clone());
        announcer.announce("one");
        announcer.announce("two");
        announcer.announce("three");
        wait_for(&recorder, 3).await;
        assert_eq!(
            recorder.spoken.lock().unwrap().as_slice(),
            ["one", "two", "three"]
        );
    }

    #[tokio::test]
    async fn test_blank_announcement_skipped() {
        let recorder = Arc::new(Recorder::default());
        let announcer = Announcer::spawn(recorder.clone());
        announcer.announce("   ");
        announcer.announce("after");
        wait_for(&recorder, 1).await;
        assert_eq!(recorder.spoken.lock().unwrap().as_slice(), ["after"]);
    }

    #[tokio::test]
    async fn test_engine_error_does_not_stop_queue() {
        let recorder = Arc::new(Recorder {
            fail_on: Some("bad"),
            ..Recorder::default()
        });
        let announcer = Announcer::spawn(recorder.clone());
        announcer.announce("bad");
        announcer.announce("good");
        wait_for(&recorder, 1).await;
        assert_eq!(recorder.spoken.lock().unwrap().as_slice(), ["good"]);
    }

    #[test]
    fn test_text_starting_with_dash_is_not_an_option() {
        let engine = CommandEngine::new("espeak", 170);
        let cmd = engine.command("-w /tmp/owned.wav");
        let args: Vec<_> = cmd.as_std().get_args().collect();
        assert_eq!(args, ["-s", "170", "--", "-w /tmp/owned.wav"]);
    }

    #[tokio::test]
    async fn test_missing_program_is_engine_error() {
        let engine = CommandEngine::new("definitely-not-a-tts-binary", 170);
        let err = engine.speak("hello").await.unwrap_err();
        assert!(matches!(err, VoiceError::Engine(_)));
    }

    #[tokio::test]
    async fn test_from_config_defaults_to_silent() {
        let announcer = Announcer::from_config(&TtsConfig::default());
        announcer.announce("nobody hears this");
        assert!(SilentEngine.speak("x").await.is_ok());
    }
}
