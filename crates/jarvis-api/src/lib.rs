//! Jarvis API crate - axum HTTP server and route handlers.
//!
//! Exposes chat, voice chat, classification, chat history, contacts and
//! health endpoints over the intent router and its collaborators.

pub mod error;
pub mod handlers;
pub mod rate_limit;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use routes::{create_router, start_server};
pub use state::AppState;
