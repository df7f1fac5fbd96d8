//! Value objects produced and consumed while routing one utterance.
//!
//! Everything here is created per request and never shared between requests.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

// =============================================================================
// Enums
// =============================================================================

/// Intent categories the classifier can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentCategory {
    Realtime,
    Automation,
    General,
}

impl IntentCategory {
    pub const ALL: [IntentCategory; 3] = [
        IntentCategory::Realtime,
        IntentCategory::Automation,
        IntentCategory::General,
    ];
}

impl fmt::Display for IntentCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IntentCategory::Realtime => write!(f, "realtime"),
            IntentCategory::Automation => write!(f, "automation"),
            IntentCategory::General => write!(f, "general"),
        }
    }
}

impl std::str::FromStr for IntentCategory {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "realtime" => Ok(IntentCategory::Realtime),
            "automation" => Ok(IntentCategory::Automation),
            "general" => Ok(IntentCategory::General),
            _ => Err(format!("Unknown intent category: {}", s)),
        }
    }
}

/// The two handler kinds an utterance can be dispatched to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandlerKind {
    Automation,
    Conversational,
}

impl fmt::Display for HandlerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HandlerKind::Automation => write!(f, "automation"),
            HandlerKind::Conversational => write!(f, "conversational"),
        }
    }
}

/// Scheduling hint attached to a strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    High,
    Normal,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Priority::High => write!(f, "high"),
            Priority::Normal => write!(f, "normal"),
        }
    }
}

/// Which path produced the final message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandlerUsed {
    Primary,
    Fallback,
    None,
}

impl fmt::Display for HandlerUsed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HandlerUsed::Primary => write!(f, "primary"),
            HandlerUsed::Fallback => write!(f, "fallback"),
            HandlerUsed::None => write!(f, "none"),
        }
    }
}

// =============================================================================
// Domain Structs
// =============================================================================

/// Per-category rule match counts for one utterance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryScores {
    pub realtime: usize,
    pub automation: usize,
    pub general: usize,
}

impl CategoryScores {
    pub fn get(&self, category: IntentCategory) -> usize {
        match category {
            IntentCategory::Realtime => self.realtime,
            IntentCategory::Automation => self.automation,
            IntentCategory::General => self.general,
        }
    }

    pub(crate) fn bump(&mut self, category: IntentCategory) {
        match category {
            IntentCategory::Realtime => self.realtime += 1,
            IntentCategory::Automation => self.automation += 1,
            IntentCategory::General => self.general += 1,
        }
    }
}

/// Result of classifying one utterance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    #[serde(rename = "type")]
    pub category: IntentCategory,
    /// In `[0.0, 1.0]`.
    pub confidence: f32,
    pub reason: String,
    pub scores: CategoryScores,
}

/// Routing decision derived from a classification.
///
/// `primary` and `fallback` always differ.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessingStrategy {
    pub primary: HandlerKind,
    pub fallback: HandlerKind,
    pub priority: Priority,
    pub timeout_seconds: u64,
    pub classification: Classification,
}

impl ProcessingStrategy {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

/// Well-known values for `HandlerResult::kind`.
pub mod kind {
    pub const REALTIME: &str = "realtime";
    pub const AUTOMATION: &str = "automation";
    pub const CONVERSATION: &str = "conversation";
    pub const UNKNOWN: &str = "unknown";
    pub const ERROR: &str = "error";
    pub const TIMEOUT: &str = "timeout";
}

/// What a handler returns for one utterance.
///
/// `success == false` asks the dispatcher to try the fallback handler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandlerResult {
    pub success: bool,
    pub message: String,
    pub kind: String,
}

impl HandlerResult {
    pub fn ok(message: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            kind: kind.into(),
        }
    }

    pub fn failure(message: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            kind: kind.into(),
        }
    }
}

/// Terminal artifact of routing one utterance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DispatchOutcome {
    pub final_message: String,
    pub handler_used: HandlerUsed,
    /// Handler kind whose message became `final_message`, if any.
    pub handler: Option<HandlerKind>,
    /// Success flag reported by that handler; false when no handler ran.
    pub success: bool,
    pub classification: Classification,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intent_category_display_and_parse() {
        for category in IntentCategory::ALL {
            let parsed: IntentCategory = category.to_string().parse().unwrap();
            assert_eq!(parsed, category);
        }
        assert!("weather".parse::<IntentCategory>().is_err());
    }

    #[test]
    fn test_classification_serializes_type_field() {
        let c = Classification {
            category: IntentCategory::Realtime,
            confidence: 0.4,
            reason: "Requires real-time information".to_string(),
            scores: CategoryScores {
                realtime: 1,
                ..CategoryScores::default()
            },
        };
        let json = serde_json::to_value(&c).unwrap();
        assert_eq!(json["type"], "realtime");
        assert_eq!(json["scores"]["realtime"], 1);
        assert!(json.get("category").is_none());
    }

    #[test]
    fn test_scores_bump_and_get() {
        let mut scores = CategoryScores::default();
        scores.bump(IntentCategory::Automation);
        scores.bump(IntentCategory::Automation);
        scores.bump(IntentCategory::General);
        assert_eq!(scores.get(IntentCategory::Automation), 2);
        assert_eq!(scores.get(IntentCategory::General), 1);
        assert_eq!(scores.get(IntentCategory::Realtime), 0);
    }

    #[test]
    fn test_handler_result_constructors() {
        let ok = HandlerResult::ok("done", kind::AUTOMATION);
        assert!(ok.success);
        assert_eq!(ok.kind, "automation");

        let failed = HandlerResult::failure("Command not recognized", kind::UNKNOWN);
        assert!(!failed.success);
        assert_eq!(failed.message, "Command not recognized");
    }

    #[test]
    fn test_enum_wire_names() {
        assert_eq!(
            serde_json::to_string(&HandlerKind::Conversational).unwrap(),
            "\"conversational\""
        );
        assert_eq!(serde_json::to_string(&Priority::High).unwrap(), "\"high\"");
        assert_eq!(
            serde_json::to_string(&HandlerUsed::None).unwrap(),
            "\"none\""
        );
    }
}
