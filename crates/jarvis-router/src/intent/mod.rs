//! Intent classification from raw utterances.
//!
//! The rule table is plain data; `classifier` applies it.

pub mod classifier;
pub mod rules;
