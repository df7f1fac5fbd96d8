//! Speech input and output collaborators for Jarvis.
//!
//! Speech-to-text is delegated to an HTTP service and reported as a tagged
//! [`Transcription`]; text-to-speech runs on a background task so callers
//! never wait for audio.

pub mod error;
pub mod stt;
pub mod tts;

pub use error::VoiceError;
pub use stt::{HttpRecognizer, ScriptedRecognizer, SpeechRecognizer, Transcription};
pub use tts::{Announcer, CommandEngine, SilentEngine, SpeechEngine, SpeechSink};
