//! Persisted chat transcript.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use jarvis_core::error::Result;

use crate::json_file::JsonArrayFile;
use crate::timestamp_now;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

impl fmt::Display for ChatRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChatRole::User => write!(f, "user"),
            ChatRole::Assistant => write!(f, "assistant"),
        }
    }
}

/// One line of the transcript, as `{"type", "message", "timestamp"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatEntry {
    #[serde(rename = "type")]
    pub role: ChatRole,
    pub message: String,
    pub timestamp: String,
}

/// Append-only chat transcript, cleared only as a whole.
pub struct ChatLog {
    file: JsonArrayFile<ChatEntry>,
}

impl ChatLog {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        Ok(Self {
            file: JsonArrayFile::open(path)?,
        })
    }

    pub fn append(&self, role: ChatRole, message: &str) -> Result<()> {
        let entry = ChatEntry {
            role,
            message: message.to_string(),
            timestamp: timestamp_now(),
        };
        self.file.update(|entries| entries.push(entry))
    }

    /// Record a user message and the reply in one write.
    pub fn append_exchange(&self, user: &str, assistant: &str) -> Result<()> {
        let user = ChatEntry {
            role: ChatRole::User,
            message: user.to_string(),
            timestamp: timestamp_now(),
        };
        let assistant = ChatEntry {
            role: ChatRole::Assistant,
            message: assistant.to_string(),
            timestamp: timestamp_now(),
        };
        self.file.update(|entries| {
            entries.push(user);
            entries.push(assistant);
        })?;
        tracing::debug!("Chat exchange saved");
        Ok(())
    }

    pub fn list(&self) -> Vec<ChatEntry> {
        self.file.load()
    }

    pub fn clear(&self) -> Result<()> {
        self.file.clear()?;
        tracing::info!("Chat history cleared");
        Ok(())
    }
}
