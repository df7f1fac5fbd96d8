//! Route handler functions for all API endpoints.
//!
//! Chat endpoints run the utterance through the intent router, persist
//! the exchange and announce the reply. Contacts and chat history are
//! thin wrappers over the JSON stores.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use jarvis_router::{Classification, DispatchOutcome, HandlerKind, HandlerUsed, Priority};
use jarvis_storage::{ChatEntry, Contact};

use crate::error::ApiError;
use crate::state::AppState;

/// Spoken by `GET /api/tts/test`.
pub const TTS_TEST_PHRASE: &str = "Hello! I am Jarvis, your AI assistant. TTS is working perfectly!";

// =============================================================================
// Request / response types
// =============================================================================

/// Request body for POST /api/chat/message.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub success: bool,
    pub user_message: String,
    pub ai_response: String,
    pub classification: Classification,
    pub handler_used: HandlerUsed,
    /// Handler whose reply was returned.
    pub handler: Option<HandlerKind>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct VoiceChatResponse {
    pub success: bool,
    pub recognized_text: String,
    pub ai_response: String,
    pub classification: Classification,
    pub handler_used: HandlerUsed,
    pub handler: Option<HandlerKind>,
}

/// Request body for POST /api/contacts.
#[derive(Debug, Deserialize)]
pub struct ContactRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ContactResponse {
    pub success: bool,
    pub message: String,
    pub contact: Contact,
}

/// Request body for POST /api/classify.
#[derive(Debug, Deserialize)]
pub struct ClassifyRequest {
    #[serde(default)]
    pub query: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ClassifyResponse {
    pub success: bool,
    pub query: String,
    pub classification: Classification,
    pub recommended_handler: HandlerKind,
    pub fallback_handler: HandlerKind,
    pub priority: Priority,
    pub timeout_seconds: u64,
}

/// `{success, message}` acknowledgement.
#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    pub success: bool,
    pub message: String,
}

impl StatusResponse {
    fn new(success: bool, message: impl Into<String>) -> Self {
        Self {
            success,
            message: message.into(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
    pub llm_configured: bool,
    pub speech_configured: bool,
}

// =============================================================================
// Helpers
// =============================================================================

/// Trimmed value of a required text field, or 400.
fn required(value: Option<String>, field: &str) -> Result<String, ApiError> {
    match value.map(|v| v.trim().to_string()) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(ApiError::BadRequest(format!("'{}' must not be empty", field))),
    }
}

/// Route one utterance, then record and speak the reply.
///
/// A failed chat log write is logged and does not fail the request.
async fn converse(state: &AppState, utterance: &str) -> DispatchOutcome {
    let outcome = state.router.route(utterance).await;

    if let Err(e) = state
        .chat_log
        .append_exchange(utterance, &outcome.final_message)
    {
        tracing::warn!(error = %e, "Failed to persist chat exchange");
    }
    state.speech.announce(&outcome.final_message);

    tracing::info!(
        category = %outcome.classification.category,
        handler_used = %outcome.handler_used,
        success = outcome.success,
        "Utterance handled"
    );
    outcome
}

/// A reply was produced unless no handler could run at all.
fn replied(outcome: &DispatchOutcome) -> bool {
    outcome.handler_used != HandlerUsed::None
}

// =============================================================================
// Chat endpoints
// =============================================================================

/// POST /api/chat/message - route a typed message.
pub async fn chat_message(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, ApiError> {
    let Json(body) = payload?;
    let message = required(body.message, "message")?;

    let outcome = converse(&state, &message).await;

    Ok(Json(ChatResponse {
        success: replied(&outcome),
        user_message: message,
        ai_response: outcome.final_message,
        classification: outcome.classification,
        handler_used: outcome.handler_used,
        handler: outcome.handler,
    }))
}

/// POST /api/voice-chat - listen once, then route what was heard.
///
/// Silence or unintelligible audio answers `{success: false, message}`.
pub async fn voice_chat(State(state): State<AppState>) -> Result<Response, ApiError> {
    let recognizer = state.recognizer.clone().ok_or_else(|| {
        ApiError::ServiceUnavailable("Speech recognition is not configured".to_string())
    })?;

    let transcription = recognizer.listen_once().await;
    let Some(text) = transcription.text().map(str::to_string) else {
        tracing::info!(outcome = ?transcription, "No usable speech");
        let body = StatusResponse::new(false, transcription.user_message());
        return Ok(Json(body).into_response());
    };

    let outcome = converse(&state, &text).await;

    Ok(Json(VoiceChatResponse {
        success: replied(&outcome),
        recognized_text: text,
        ai_response: outcome.final_message,
        classification: outcome.classification,
        handler_used: outcome.handler_used,
        handler: outcome.handler,
    })
    .into_response())
}

/// GET /api/chats - full chat transcript, oldest first.
pub async fn list_chats(State(state): State<AppState>) -> Json<Vec<ChatEntry>> {
    Json(state.chat_log.list())
}

/// DELETE /api/chats - clear the transcript.
pub async fn clear_chats(State(state): State<AppState>) -> Result<Json<StatusResponse>, ApiError> {
    state.chat_log.clear()?;
    tracing::info!("Chat history cleared");
    Ok(Json(StatusResponse::new(true, "Chat history cleared")))
}

// =============================================================================
// Contacts
// =============================================================================

/// GET /api/contacts
pub async fn list_contacts(State(state): State<AppState>) -> Json<Vec<Contact>> {
    Json(state.contacts.list())
}

/// POST /api/contacts - add a contact; every field is required.
pub async fn add_contact(
    State(state): State<AppState>,
    payload: Result<Json<ContactRequest>, JsonRejection>,
) -> Result<Json<ContactResponse>, ApiError> {
    let Json(body) = payload?;
    let name = required(body.name, "name")?;
    let phone = required(body.phone, "phone")?;
    let email = required(body.email, "email")?;

    let contact = state.contacts.add(&name, &phone, &email)?;
    tracing::info!(name = %contact.name, "Contact added");

    Ok(Json(ContactResponse {
        success: true,
        message: "Contact added successfully".to_string(),
        contact,
    }))
}

/// DELETE /api/contacts/{index}
pub async fn delete_contact(
    State(state): State<AppState>,
    Path(index): Path<usize>,
) -> Result<Json<StatusResponse>, ApiError> {
    if state.contacts.delete(index)? {
        tracing::info!(index, "Contact deleted");
        Ok(Json(StatusResponse::new(true, "Contact deleted successfully")))
    } else {
        Ok(Json(StatusResponse::new(false, "Contact not found")))
    }
}

// =============================================================================
// Diagnostics
// =============================================================================

/// GET /api/tts/test - speak a fixed phrase.
pub async fn tts_test(State(state): State<AppState>) -> Json<StatusResponse> {
    state.speech.announce(TTS_TEST_PHRASE);
    Json(StatusResponse::new(true, "TTS test initiated"))
}

/// POST /api/classify - classification and strategy without dispatching.
pub async fn classify(
    State(state): State<AppState>,
    payload: Result<Json<ClassifyRequest>, JsonRejection>,
) -> Result<Json<ClassifyResponse>, ApiError> {
    let Json(body) = payload?;
    let query = required(body.query, "query")?;

    let strategy = state.router.plan(&query);

    Ok(Json(ClassifyResponse {
        success: true,
        query,
        recommended_handler: strategy.primary,
        fallback_handler: strategy.fallback,
        priority: strategy.priority,
        timeout_seconds: strategy.timeout_seconds,
        classification: strategy.classification,
    }))
}

/// GET /health - liveness and component status.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
        llm_configured: state.llm_configured,
        speech_configured: state.recognizer.is_some(),
    })
}
