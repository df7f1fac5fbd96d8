//! Error types for the conversational handler.

/// Errors from the language model client.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("LLM is not configured")]
    NotConfigured,
    #[error("LLM request failed: {0}")]
    LlmError(String),
    #[error("LLM returned an empty response")]
    EmptyResponse,
}

impl From<reqwest::Error> for ChatError {
    fn from(err: reqwest::Error) -> Self {
        ChatError::LlmError(err.to_string())
    }
}
