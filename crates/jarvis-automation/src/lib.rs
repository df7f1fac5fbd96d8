//! Local command automation for Jarvis.
//!
//! Parses an utterance into a desktop command (open an app, search the web,
//! tell the time, send the canned email, ...) and runs it through
//! pluggable collaborators.

pub mod collab;
pub mod command;
pub mod error;
pub mod handler;

pub use collab::{
    Clock, Desktop, DryRunDesktop, Knowledge, Mailer, SmtpMailer, SystemClock, SystemDesktop,
    WikipediaClient,
};
pub use command::AutomationCommand;
pub use error::ActionError;
pub use handler::AutomationHandler;
