//! Error types for the voice collaborators.

#[derive(Debug, thiserror::Error)]
pub enum VoiceError {
    #[error("Speech service error: {0}")]
    Service(String),
    #[error("Speech engine error: {0}")]
    Engine(String),
}

impl From<reqwest::Error> for VoiceError {
    fn from(err: reqwest::Error) -> Self {
        VoiceError::Service(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_voice_error_display() {
        assert_eq!(
            VoiceError::Service("connection refused".to_string()).to_string(),
            "Speech service error: connection refused"
        );
        assert_eq!(
            VoiceError::Engine("espeak exited with 1".to_string()).to_string(),
            "Speech engine error: espeak exited with 1"
        );
    }
}
