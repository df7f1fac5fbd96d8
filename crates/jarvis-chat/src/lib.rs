//! Conversational handler for Jarvis.
//!
//! Answers free-form utterances with an OpenAI-compatible language model,
//! keeping a short rolling history, and falls back to canned replies when
//! the model is unavailable.

pub mod error;
pub mod handler;
pub mod history;
pub mod llm;
pub mod replies;

pub use error::ChatError;
pub use handler::ConversationalHandler;
pub use history::{ChatMessage, ConversationHistory, Role};
pub use llm::{ChatModel, LlmClient, SecretString};
