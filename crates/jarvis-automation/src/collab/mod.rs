//! Side-effecting collaborators used by the automation handler.
//!
//! Each concern sits behind a trait so the handler can be exercised
//! without a desktop session, network access or an SMTP server.

pub mod clock;
pub mod desktop;
pub mod knowledge;
pub mod mail;

use async_trait::async_trait;
use chrono::NaiveDateTime;

use crate::error::ActionError;

pub use clock::SystemClock;
pub use desktop::{DryRunDesktop, SystemDesktop};
pub use knowledge::WikipediaClient;
pub use mail::SmtpMailer;

/// Opens things on the user's desktop.
#[async_trait]
pub trait Desktop: Send + Sync {
    async fn open_url(&self, url: &str) -> Result<(), ActionError>;

    async fn launch_app(&self, name: &str) -> Result<(), ActionError>;
}

/// Looks up short encyclopedia summaries.
#[async_trait]
pub trait Knowledge: Send + Sync {
    /// Summary of `term`, cut to at most `sentences` sentences.
    async fn summary(&self, term: &str, sentences: usize) -> Result<String, ActionError>;
}

/// Sends the assistant's canned email.
#[async_trait]
pub trait Mailer: Send + Sync {
    /// `ActionError::NotConfigured` when no credentials are available.
    async fn send(&self) -> Result<(), ActionError>;
}

/// Source of local wall-clock time.
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}
