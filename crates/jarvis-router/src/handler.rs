//! The handler seam between the router and the concrete responders.

use std::sync::Arc;

use async_trait::async_trait;

use crate::types::{HandlerKind, HandlerResult};

/// A responder the dispatcher can route an utterance to.
///
/// Implementations must be safe to call from concurrent requests.
/// Failures are reported through `HandlerResult::success`, not panics.
#[async_trait]
pub trait Handler: Send + Sync {
    fn kind(&self) -> HandlerKind;

    async fn handle(&self, utterance: &str) -> HandlerResult;
}

/// The configured handlers. Either may be absent.
#[derive(Clone, Default)]
pub struct Handlers {
    automation: Option<Arc<dyn Handler>>,
    conversational: Option<Arc<dyn Handler>>,
}

impl Handlers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_automation(mut self, handler: Arc<dyn Handler>) -> Self {
        self.automation = Some(handler);
        self
    }

    pub fn with_conversational(mut self, handler: Arc<dyn Handler>) -> Self {
        self.conversational = Some(handler);
        self
    }

    pub fn get(&self, kind: HandlerKind) -> Option<&Arc<dyn Handler>> {
        match kind {
            HandlerKind::Automation => self.automation.as_ref(),
            HandlerKind::Conversational => self.conversational.as_ref(),
        }
    }

    pub fn is_available(&self, kind: HandlerKind) -> bool {
        self.get(kind).is_some()
    }
}

impl std::fmt::Debug for Handlers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Handlers")
            .field("automation", &self.automation.is_some())
            .field("conversational", &self.conversational.is_some())
            .finish()
    }
}
