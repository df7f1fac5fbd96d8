//! Intent routing for Jarvis.
//!
//! Classifies an utterance into an intent category, resolves the category
//! into a processing strategy, and dispatches the utterance to the primary
//! handler with a single fallback.

pub mod dispatcher;
pub mod error;
pub mod handler;
pub mod intent;
pub mod router;
pub mod strategy;
pub mod types;

pub use dispatcher::{Dispatcher, SERVICE_UNAVAILABLE};
pub use error::RouterError;
pub use handler::{Handler, Handlers};
pub use intent::classifier::Classifier;
pub use intent::rules::{IntentRule, RuleSet, DEFAULT_RULES};
pub use router::Router;
pub use strategy::resolve;
pub use types::{
    kind, CategoryScores, Classification, DispatchOutcome, HandlerKind, HandlerResult, HandlerUsed,
    IntentCategory, Priority, ProcessingStrategy,
};
