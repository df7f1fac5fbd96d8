//! Classification to processing strategy.

use crate::types::{Classification, HandlerKind, IntentCategory, Priority, ProcessingStrategy};

/// Map a classification to its routing strategy. Total and deterministic.
pub fn resolve(classification: Classification) -> ProcessingStrategy {
    let (primary, fallback, priority, timeout_seconds) = match classification.category {
        IntentCategory::Realtime => (
            HandlerKind::Automation,
            HandlerKind::Conversational,
            Priority::High,
            5,
        ),
        IntentCategory::Automation => (
            HandlerKind::Automation,
            HandlerKind::Conversational,
            Priority::High,
            10,
        ),
        IntentCategory::General => (
            HandlerKind::Conversational,
            HandlerKind::Automation,
            Priority::Normal,
            15,
        ),
    };

    ProcessingStrategy {
        primary,
        fallback,
        priority,
        timeout_seconds,
        classification,
    }
}
