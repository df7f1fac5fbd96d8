//! Classifier, resolver and dispatcher bundled behind one call.

use crate::dispatcher::Dispatcher;
use crate::handler::Handlers;
use crate::intent::classifier::Classifier;
use crate::strategy::resolve;
use crate::types::{Classification, DispatchOutcome, ProcessingStrategy};

/// Routes utterances to the configured handlers.
///
/// Holds only read-only state, so one instance serves all requests.
pub struct Router {
    classifier: Classifier,
    dispatcher: Dispatcher,
    handlers: Handlers,
}

impl Router {
    pub fn new(handlers: Handlers, dispatcher: Dispatcher) -> Self {
        Self {
            classifier: Classifier::default(),
            dispatcher,
            handlers,
        }
    }

    pub fn with_classifier(mut self, classifier: Classifier) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn handlers(&self) -> &Handlers {
        &self.handlers
    }

    pub fn classify(&self, utterance: &str) -> Classification {
        self.classifier.classify(utterance)
    }

    /// Classify and resolve without running any handler.
    pub fn plan(&self, utterance: &str) -> ProcessingStrategy {
        resolve(self.classify(utterance))
    }

    pub async fn route(&self, utterance: &str) -> DispatchOutcome {
        let strategy = self.plan(utterance);
        self.dispatcher
            .dispatch(&strategy, utterance, &self.handlers)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::Handler;
    use crate::types::{HandlerKind, HandlerResult, HandlerUsed, IntentCategory, Priority};
    use async_trait::async_trait;
    use std::sync::Arc;

    struct Named(HandlerKind);

    #[async_trait]
    impl Handler for Named {
        fn kind(&self) -> HandlerKind {
            self.0
        }

        async fn handle(&self, utterance: &str) -> HandlerResult {
            HandlerResult::ok(format!("{} handled {}", self.0, utterance), "test")
        }
    }

    fn router() -> Router {
        let handlers = Handlers::new()
            .with_automation(Arc::new(Named(HandlerKind::Automation)))
            .with_conversational(Arc::new(Named(HandlerKind::Conversational)));
        Router::new(handlers, Dispatcher::default())
    }

    #[test]
    fn test_plan_without_dispatch() {
        let plan = router().plan("open spotify");
        assert_eq!(plan.classification.category, IntentCategory::Automation);
        assert_eq!(plan.primary, HandlerKind::Automation);
        assert_eq!(plan.fallback, HandlerKind::Conversational);
        assert_eq!(plan.priority, Priority::High);
        assert_eq!(plan.timeout_seconds, 10);
    }

    #[tokio::test]
    async fn test_route_end_to_end() {
        let router = router();

        let outcome = router.route("open spotify").await;
        assert_eq!(outcome.final_message, "automation handled open spotify");
        assert_eq!(outcome.handler_used, HandlerUsed::Primary);

        let outcome = router.route("tell me about rust").await;
        assert_eq!(outcome.final_message, "conversational handled tell me about rust");
        assert_eq!(outcome.classification.category, IntentCategory::General);
    }

    #[tokio::test]
    async fn test_concurrent_routes_are_independent() {
        let router = Arc::new(router());
        let mut tasks = Vec::new();
        for i in 0..16 {
            let router = Arc::clone(&router);
            tasks.push(tokio::spawn(async move {
                let text = if i % 2 == 0 {
                    format!("open app{}", i)
                } else {
                    format!("hello {}", i)
                };
                (text.clone(), router.route(&text).await)
            }));
        }
        for task in tasks {
            let (text, outcome) = task.await.unwrap();
            assert!(outcome.final_message.ends_with(&text));
        }
    }
}
