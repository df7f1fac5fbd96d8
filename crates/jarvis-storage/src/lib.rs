//! File-backed persistence for Jarvis.
//!
//! Chat transcripts and contacts are stored as pretty-printed JSON arrays,
//! one file each, under the configured data directory.

pub mod chat_log;
pub mod contacts;
pub mod json_file;

pub use chat_log::{ChatEntry, ChatLog, ChatRole};
pub use contacts::{Contact, ContactBook};
pub use json_file::JsonArrayFile;

/// Local time in ISO-8601 without offset, e.g. `2024-03-15T15:45:00.123456`.
pub(crate) fn timestamp_now() -> String {
    chrono::Local::now()
        .naive_local()
        .format("%Y-%m-%dT%H:%M:%S%.6f")
        .to_string()
}
