use thiserror::Error;

/// Top-level error type for the Jarvis backend.
///
/// Subsystem crates define their own error enums for internal failures and
/// convert into `JarvisError` where a failure has to cross a crate boundary
/// (configuration, persistence, server startup).
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum JarvisError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<toml::de::Error> for JarvisError {
    fn from(err: toml::de::Error) -> Self {
        JarvisError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for JarvisError {
    fn from(err: toml::ser::Error) -> Self {
        JarvisError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for JarvisError {
    fn from(err: serde_json::Error) -> Self {
        JarvisError::Serialization(err.to_string())
    }
}

/// A specialized `Result` type for Jarvis operations.
pub type Result<T> = std::result::Result<T, JarvisError>;
