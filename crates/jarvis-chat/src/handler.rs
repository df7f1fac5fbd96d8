//! The conversational handler.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use jarvis_core::config::LlmConfig;
use jarvis_router::{kind, Handler, HandlerKind, HandlerResult};

use crate::error::ChatError;
use crate::history::ConversationHistory;
use crate::llm::{ChatModel, LlmClient};
use crate::replies::{canned_reply, GENERIC_REPLY};

/// Answers with the language model, then canned replies.
///
/// Owns one conversation history. A reply from neither source is a
/// failed result carrying the generic help message.
pub struct ConversationalHandler {
    model: Option<Arc<dyn ChatModel>>,
    system_prompt: String,
    history: Mutex<ConversationHistory>,
}

impl ConversationalHandler {
    pub fn new(
        model: Option<Arc<dyn ChatModel>>,
        system_prompt: impl Into<String>,
        history_turns: usize,
    ) -> Self {
        Self {
            model,
            system_prompt: system_prompt.into(),
            history: Mutex::new(ConversationHistory::new(history_turns)),
        }
    }

    /// Wire the LLM client from configuration when an API key is present.
    pub fn from_config(config: &LlmConfig) -> Result<Self, ChatError> {
        let model = LlmClient::from_config(config)?.map(|c| Arc::new(c) as Arc<dyn ChatModel>);
        Ok(Self::new(
            model,
            config.system_prompt.clone(),
            config.history_turns,
        ))
    }

    pub fn has_model(&self) -> bool {
        self.model.is_some()
    }

    /// Produce a reply for one utterance. Never fails.
    pub async fn respond(&self, utterance: &str) -> HandlerResult {
        let text = utterance.trim().to_lowercase();

        if let Some(model) = &self.model {
            match self.ask_model(model.as_ref(), &text).await {
                Ok(reply) => return HandlerResult::ok(reply, kind::CONVERSATION),
                Err(e) => {
                    tracing::warn!(error = %e, "LLM request failed, using canned replies");
                }
            }
        }

        match canned_reply(&text) {
            Some(reply) => HandlerResult::ok(reply, kind::CONVERSATION),
            None => HandlerResult::failure(GENERIC_REPLY, kind::CONVERSATION),
        }
    }

    async fn ask_model(&self, model: &dyn ChatModel, text: &str) -> Result<String, ChatError> {
        let prompt = {
            let history = self
                .history
                .lock()
                .map_err(|e| ChatError::LlmError(format!("history lock poisoned: {}", e)))?;
            history.prompt(&self.system_prompt, text)
        };

        let reply = model.complete(&prompt).await?;

        let mut history = self
            .history
            .lock()
            .map_err(|e| ChatError::LlmError(format!("history lock poisoned: {}", e)))?;
        history.push_exchange(text, reply.clone());
        Ok(reply)
    }

    pub fn clear_history(&self) {
        match self.history.lock() {
            Ok(mut history) => history.clear(),
            Err(poisoned) => poisoned.into_inner().clear(),
        }
        tracing::info!("Conversation history cleared");
    }

    pub fn history_len(&self) -> usize {
        self.history.lock().map(|h| h.len()).unwrap_or(0)
    }
}

#[async_trait]
impl Handler for ConversationalHandler {
    fn kind(&self) -> HandlerKind {
        HandlerKind::Conversational
    }

    async fn handle(&self, utterance: &str) -> HandlerResult {
        self.respond(utterance).await
    }
}
