//! Primary-then-fallback dispatch of one utterance.
//!
//! Handlers run strictly one after the other. The fallback is only
//! started once the primary has returned (or been cut off by its time
//! budget), and never after a successful primary.

use std::sync::Arc;
use std::time::Duration;

use crate::error::RouterError;
use crate::handler::{Handler, Handlers};
use crate::types::{
    kind, DispatchOutcome, HandlerKind, HandlerResult, HandlerUsed, ProcessingStrategy,
};

/// Returned when no configured handler could produce a message.
pub const SERVICE_UNAVAILABLE: &str = "Service unavailable";

const TIMEOUT_MESSAGE: &str = "Sorry, that took too long. Please try again.";
const HANDLER_ERROR_MESSAGE: &str = "Sorry, I encountered an error";

/// Runs a strategy against the configured handlers.
///
/// With `enforce_timeouts` set, every handler call is bounded by the
/// strategy's `timeout_seconds`; expiry counts as a failed result.
#[derive(Debug, Clone, Copy)]
pub struct Dispatcher {
    enforce_timeouts: bool,
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new(true)
    }
}

impl Dispatcher {
    pub fn new(enforce_timeouts: bool) -> Self {
        Self { enforce_timeouts }
    }

    pub fn enforces_timeouts(&self) -> bool {
        self.enforce_timeouts
    }

    /// Dispatch `utterance` according to `strategy`. Never fails.
    pub async fn dispatch(
        &self,
        strategy: &ProcessingStrategy,
        utterance: &str,
        handlers: &Handlers,
    ) -> DispatchOutcome {
        tracing::debug!(
            primary = %strategy.primary,
            fallback = %strategy.fallback,
            priority = %strategy.priority,
            timeout_secs = strategy.timeout_seconds,
            "Dispatching utterance"
        );

        let fallback = handlers.get(strategy.fallback);

        let Some(primary) = handlers.get(strategy.primary) else {
            tracing::warn!(handler = %strategy.primary, "Primary handler not configured");
            return match fallback {
                Some(handler) => {
                    let result = self.invoke(handler, utterance, strategy.timeout()).await;
                    self.finish(strategy, HandlerUsed::Fallback, Some(strategy.fallback), result)
                }
                None => self.unavailable(strategy),
            };
        };

        let result = self.invoke(primary, utterance, strategy.timeout()).await;
        if result.success {
            return self.finish(strategy, HandlerUsed::Primary, Some(strategy.primary), result);
        }

        tracing::info!(
            handler = %strategy.primary,
            kind = %result.kind,
            "Primary handler failed, trying fallback"
        );

        match fallback {
            Some(handler) => {
                let result = self.invoke(handler, utterance, strategy.timeout()).await;
                self.finish(strategy, HandlerUsed::Fallback, Some(strategy.fallback), result)
            }
            None => {
                tracing::warn!(handler = %strategy.fallback, "Fallback handler not configured");
                let mut result = result;
                if result.message.trim().is_empty() {
                    result.message = SERVICE_UNAVAILABLE.to_string();
                }
                self.finish(strategy, HandlerUsed::Primary, Some(strategy.primary), result)
            }
        }
    }

    /// Call one handler, folding timeouts and panics into a failed result.
    async fn invoke(
        &self,
        handler: &Arc<dyn Handler>,
        utterance: &str,
        limit: Duration,
    ) -> HandlerResult {
        match self.run(handler, utterance, limit).await {
            Ok(result) => result,
            Err(RouterError::Timeout(secs)) => {
                tracing::warn!(handler = %handler.kind(), timeout_secs = secs, "Handler timed out");
                HandlerResult::failure(TIMEOUT_MESSAGE, kind::TIMEOUT)
            }
            Err(e) => {
                tracing::error!(handler = %handler.kind(), error = %e, "Handler aborted");
                HandlerResult::failure(HANDLER_ERROR_MESSAGE, kind::ERROR)
            }
        }
    }

    async fn run(
        &self,
        handler: &Arc<dyn Handler>,
        utterance: &str,
        limit: Duration,
    ) -> Result<HandlerResult, RouterError> {
        let handler = Arc::clone(handler);
        let utterance = utterance.to_string();
        let mut task = tokio::spawn(async move { handler.handle(&utterance).await });

        if !self.enforce_timeouts {
            return Ok(task.await?);
        }

        match tokio::time::timeout(limit, &mut task).await {
            Ok(joined) => Ok(joined?),
            Err(_) => {
                task.abort();
                Err(RouterError::Timeout(limit.as_secs()))
            }
        }
    }

    fn finish(
        &self,
        strategy: &ProcessingStrategy,
        handler_used: HandlerUsed,
        handler: Option<HandlerKind>,
        result: HandlerResult,
    ) -> DispatchOutcome {
        tracing::info!(
            category = %strategy.classification.category,
            handler_used = %handler_used,
            success = result.success,
            kind = %result.kind,
            "Dispatch complete"
        );
        DispatchOutcome {
            final_message: result.message,
            handler_used,
            handler,
            success: result.success,
            classification: strategy.classification.clone(),
        }
    }

    fn unavailable(&self, strategy: &ProcessingStrategy) -> DispatchOutcome {
        tracing::warn!("No handler configured for this strategy");
        DispatchOutcome {
            final_message: SERVICE_UNAVAILABLE.to_string(),
            handler_used: HandlerUsed::None,
            handler: None,
            success: false,
            classification: strategy.classification.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intent::classifier::Classifier;
    use crate::strategy::resolve;
    use crate::types::IntentCategory;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    // =========================================================================
    // Spy handlers
    // =========================================================================

    enum Behaviour {
        Reply(HandlerResult),
        Sleep(Duration),
        Panic,
    }

    struct Spy {
        kind: HandlerKind,
        behaviour: Behaviour,
        calls: AtomicUsize,
        seen: std::sync::Mutex<Vec<String>>,
    }

    impl Spy {
        fn new(kind: HandlerKind, behaviour: Behaviour) -> Arc<Self> {
            Arc::new(Self {
                kind,
                behaviour,
                calls: AtomicUsize::new(0),
                seen: std::sync::Mutex::new(Vec::new()),
            })
        }

        fn replying(kind: HandlerKind, success: bool, message: &str) -> Arc<Self> {
            let result = HandlerResult {
                success,
                message: message.to_string(),
                kind: "test".to_string(),
            };
            Self::new(kind, Behaviour::Reply(result))
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Handler for Spy {
        fn kind(&self) -> HandlerKind {
            self.kind
        }

        async fn handle(&self, utterance: &str) -> HandlerResult {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.seen.lock().unwrap().push(utterance.to_string());
            match &self.behaviour {
                Behaviour::Reply(result) => result.clone(),
                Behaviour::Sleep(d) => {
                    tokio::time::sleep(*d).await;
                    HandlerResult::ok("late", "test")
                }
                Behaviour::Panic => panic!("handler blew up"),
            }
        }
    }

    fn strategy_for(text: &str) -> ProcessingStrategy {
        resolve(Classifier::default().classify(text))
    }

    fn handlers(automation: Option<Arc<Spy>>, conversational: Option<Arc<Spy>>) -> Handlers {
        let mut h = Handlers::new();
        if let Some(a) = automation {
            h = h.with_automation(a);
        }
        if let Some(c) = conversational {
            h = h.with_conversational(c);
        }
        h
    }

    // =========================================================================
    // Routing scenarios
    // =========================================================================

    #[tokio::test]
    async fn test_time_query_served_by_automation() {
        let automation = Spy::replying(
            HandlerKind::Automation,
            true,
            "The current time is 03:45 PM",
        );
        let conversational = Spy::replying(HandlerKind::Conversational, true, "chat");
        let strategy = strategy_for("what time is it");
        assert_eq!(strategy.classification.category, IntentCategory::Realtime);
        assert_eq!(strategy.primary, HandlerKind::Automation);
        assert_eq!(strategy.timeout_seconds, 5);

        let outcome = Dispatcher::default()
            .dispatch(
                &strategy,
                "what time is it",
                &handlers(Some(automation.clone()), Some(conversational.clone())),
            )
            .await;

        assert_eq!(outcome.final_message, "The current time is 03:45 PM");
        assert_eq!(outcome.handler_used, HandlerUsed::Primary);
        assert_eq!(outcome.handler, Some(HandlerKind::Automation));
        assert!(outcome.success);
        assert_eq!(conversational.calls(), 0);
    }

    #[tokio::test]
    async fn test_greeting_served_by_conversation() {
        let automation = Spy::replying(HandlerKind::Automation, true, "unused");
        let conversational = Spy::replying(HandlerKind::Conversational, true, "Hi there!");
        let strategy = strategy_for("hello");
        assert_eq!(strategy.classification.category, IntentCategory::General);
        assert_eq!(strategy.primary, HandlerKind::Conversational);

        let outcome = Dispatcher::default()
            .dispatch(
                &strategy,
                "hello",
                &handlers(Some(automation.clone()), Some(conversational.clone())),
            )
            .await;

        assert_eq!(outcome.final_message, "Hi there!");
        assert_eq!(outcome.handler_used, HandlerUsed::Primary);
        assert_eq!(automation.calls(), 0);
    }

    #[tokio::test]
    async fn test_unknown_input_falls_back_to_automation() {
        let automation = Spy::replying(HandlerKind::Automation, false, "Command not recognized");
        let conversational = Spy::replying(HandlerKind::Conversational, false, "I'm here to help!");
        let strategy = strategy_for("xyzzy nonsense");
        assert_eq!(strategy.classification.category, IntentCategory::General);
        assert!((strategy.classification.confidence - 0.5).abs() < 1e-6);

        let outcome = Dispatcher::default()
            .dispatch(
                &strategy,
                "xyzzy nonsense",
                &handlers(Some(automation.clone()), Some(conversational.clone())),
            )
            .await;

        assert_eq!(outcome.final_message, "Command not recognized");
        assert_eq!(outcome.handler_used, HandlerUsed::Fallback);
        assert_eq!(outcome.handler, Some(HandlerKind::Automation));
        assert!(!outcome.success);
        assert_eq!(conversational.calls(), 1);
        assert_eq!(automation.calls(), 1);
    }

    // =========================================================================
    // Invariants
    // =========================================================================

    #[tokio::test]
    async fn test_successful_primary_never_calls_fallback() {
        // Even an empty successful message stops dispatch.
        for message in ["done", ""] {
            let primary = Spy::replying(HandlerKind::Automation, true, message);
            let fallback = Spy::replying(HandlerKind::Conversational, true, "fallback");
            let outcome = Dispatcher::default()
                .dispatch(
                    &strategy_for("open calculator"),
                    "open calculator",
                    &handlers(Some(primary.clone()), Some(fallback.clone())),
                )
                .await;
            assert_eq!(outcome.final_message, message);
            assert_eq!(fallback.calls(), 0);
            assert_eq!(primary.calls(), 1);
        }
    }

    #[tokio::test]
    async fn test_fallback_message_used_verbatim_regardless_of_success() {
        for fallback_success in [true, false] {
            let primary = Spy::replying(HandlerKind::Automation, false, "primary failed");
            let fallback =
                Spy::replying(HandlerKind::Conversational, fallback_success, "from fallback");
            let outcome = Dispatcher::default()
                .dispatch(
                    &strategy_for("open calculator"),
                    "open calculator",
                    &handlers(Some(primary), Some(fallback)),
                )
                .await;
            assert_eq!(outcome.final_message, "from fallback");
            assert_eq!(outcome.handler_used, HandlerUsed::Fallback);
            assert_eq!(outcome.success, fallback_success);
        }
    }

    #[tokio::test]
    async fn test_fallback_receives_same_utterance() {
        let primary = Spy::replying(HandlerKind::Conversational, false, "no");
        let fallback = Spy::replying(HandlerKind::Automation, true, "yes");
        Dispatcher::default()
            .dispatch(
                &strategy_for("Purple Monkey"),
                "Purple Monkey",
                &handlers(Some(fallback.clone()), Some(primary.clone())),
            )
            .await;
        assert_eq!(primary.seen.lock().unwrap().as_slice(), ["Purple Monkey"]);
        assert_eq!(fallback.seen.lock().unwrap().as_slice(), ["Purple Monkey"]);
    }

    // =========================================================================
    // Missing handlers
    // =========================================================================

    #[tokio::test]
    async fn test_missing_primary_goes_straight_to_fallback() {
        let conversational = Spy::replying(HandlerKind::Conversational, true, "chatting instead");
        let outcome = Dispatcher::default()
            .dispatch(
                &strategy_for("open calculator"),
                "open calculator",
                &handlers(None, Some(conversational.clone())),
            )
            .await;
        assert_eq!(outcome.final_message, "chatting instead");
        assert_eq!(outcome.handler_used, HandlerUsed::Fallback);
        assert_eq!(conversational.calls(), 1);
    }

    #[tokio::test]
    async fn test_both_missing_is_service_unavailable() {
        let outcome = Dispatcher::default()
            .dispatch(&strategy_for("hello"), "hello", &Handlers::new())
            .await;
        assert_eq!(outcome.final_message, SERVICE_UNAVAILABLE);
        assert_eq!(outcome.handler_used, HandlerUsed::None);
        assert_eq!(outcome.handler, None);
        assert!(!outcome.success);
        assert_eq!(outcome.classification.category, IntentCategory::General);
    }

    #[tokio::test]
    async fn test_failed_primary_without_fallback_keeps_its_message() {
        let primary = Spy::replying(HandlerKind::Automation, false, "Command not recognized");
        let outcome = Dispatcher::default()
            .dispatch(
                &strategy_for("open sesame"),
                "open sesame",
                &handlers(Some(primary), None),
            )
            .await;
        assert_eq!(outcome.final_message, "Command not recognized");
        assert_eq!(outcome.handler_used, HandlerUsed::Primary);
        assert!(!outcome.success);
    }

    #[tokio::test]
    async fn test_failed_primary_without_message_or_fallback() {
        let primary = Spy::replying(HandlerKind::Automation, false, "  ");
        let outcome = Dispatcher::default()
            .dispatch(
                &strategy_for("open sesame"),
                "open sesame",
                &handlers(Some(primary), None),
            )
            .await;
        assert_eq!(outcome.final_message, SERVICE_UNAVAILABLE);
    }

    // =========================================================================
    // Timeouts and panics
    // =========================================================================

    #[tokio::test]
    async fn test_invoke_times_out() {
        let slow: Arc<dyn Handler> =
            Spy::new(HandlerKind::Automation, Behaviour::Sleep(Duration::from_secs(30)));
        let result = Dispatcher::new(true)
            .invoke(&slow, "slow", Duration::from_millis(50))
            .await;
        assert!(!result.success);
        assert_eq!(result.kind, kind::TIMEOUT);
        assert_eq!(result.message, TIMEOUT_MESSAGE);
    }

    #[tokio::test]
    async fn test_invoke_without_enforcement_waits() {
        let slow: Arc<dyn Handler> =
            Spy::new(HandlerKind::Automation, Behaviour::Sleep(Duration::from_millis(100)));
        let result = Dispatcher::new(false)
            .invoke(&slow, "slow", Duration::from_millis(10))
            .await;
        assert!(result.success);
        assert_eq!(result.message, "late");
    }

    #[tokio::test]
    async fn test_timed_out_primary_triggers_fallback() {
        let slow = Spy::new(HandlerKind::Automation, Behaviour::Sleep(Duration::from_secs(30)));
        let conversational = Spy::replying(HandlerKind::Conversational, true, "quick answer");
        let mut strategy = strategy_for("open calculator");
        strategy.timeout_seconds = 1;

        let outcome = Dispatcher::new(true)
            .dispatch(
                &strategy,
                "open calculator",
                &handlers(Some(slow), Some(conversational)),
            )
            .await;
        assert_eq!(outcome.final_message, "quick answer");
        assert_eq!(outcome.handler_used, HandlerUsed::Fallback);
    }

    #[tokio::test]
    async fn test_panicking_primary_treated_as_failure() {
        let boom = Spy::new(HandlerKind::Automation, Behaviour::Panic);
        let conversational = Spy::replying(HandlerKind::Conversational, true, "recovered");
        let outcome = Dispatcher::default()
            .dispatch(
                &strategy_for("open calculator"),
                "open calculator",
                &handlers(Some(boom.clone()), Some(conversational)),
            )
            .await;
        assert_eq!(outcome.final_message, "recovered");
        assert_eq!(outcome.handler_used, HandlerUsed::Fallback);
        assert_eq!(boom.calls(), 1);
    }

    #[tokio::test]
    async fn test_panicking_handler_alone_gives_generic_message() {
        let boom = Spy::new(HandlerKind::Automation, Behaviour::Panic);
        let outcome = Dispatcher::default()
            .dispatch(
                &strategy_for("open calculator"),
                "open calculator",
                &handlers(Some(boom), None),
            )
            .await;
        assert_eq!(outcome.final_message, HANDLER_ERROR_MESSAGE);
        assert!(!outcome.success);
    }
}
