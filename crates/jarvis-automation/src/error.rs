//! Error types for the automation handler.

/// Errors from a collaborator while carrying out a command.
#[derive(Debug, thiserror::Error)]
pub enum ActionError {
    #[error("Failed to launch '{target}': {reason}")]
    Launch { target: String, reason: String },
    #[error("Refusing to launch '{target}': {reason}")]
    InvalidTarget { target: String, reason: String },
    #[error("Invalid email address: {0}")]
    InvalidAddress(String),
    #[error("Knowledge lookup failed: {0}")]
    Lookup(String),
    #[error("Not configured: {0}")]
    NotConfigured(String),
    #[error("Mail delivery failed: {0}")]
    Mail(String),
}

impl From<reqwest::Error> for ActionError {
    fn from(err: reqwest::Error) -> Self {
        ActionError::Lookup(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_error_display() {
        let err = ActionError::Launch {
            target: "xdg-open".to_string(),
            reason: "No such file or directory".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Failed to launch 'xdg-open': No such file or directory"
        );

        let err = ActionError::InvalidTarget {
            target: "calc&whoami".to_string(),
            reason: "character '&' not allowed".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Refusing to launch 'calc&whoami': character '&' not allowed"
        );

        let err = ActionError::InvalidAddress("recipient: missing domain".to_string());
        assert_eq!(err.to_string(), "Invalid email address: recipient: missing domain");

        let err = ActionError::Lookup("404 Not Found".to_string());
        assert_eq!(err.to_string(), "Knowledge lookup failed: 404 Not Found");

        let err = ActionError::NotConfigured("smtp password".to_string());
        assert_eq!(err.to_string(), "Not configured: smtp password");

        let err = ActionError::Mail("connection refused".to_string());
        assert_eq!(err.to_string(), "Mail delivery failed: connection refused");
    }

    #[test]
    fn test_errors_implement_debug() {
        let dbg = format!("{:?}", ActionError::Lookup("x".to_string()));
        assert!(dbg.contains("Lookup"));
    }
}
