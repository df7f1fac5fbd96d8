//! Rule-count intent classifier.
//!
//! Precedence is fixed: any automation hit wins, then any realtime hit,
//! otherwise the utterance is general. Unmatched input is still general,
//! at a lower confidence.

use crate::intent::rules::RuleSet;
use crate::types::{Classification, IntentCategory};

const AUTOMATION_REASON: &str = "Contains automation command keywords";
const REALTIME_REASON: &str = "Requires real-time information";
const GENERAL_REASON: &str = "General conversation or knowledge query";

const AUTOMATION_WEIGHT: f32 = 0.3;
const REALTIME_WEIGHT: f32 = 0.4;
const GENERAL_MATCHED_CONFIDENCE: f32 = 0.8;
const GENERAL_DEFAULT_CONFIDENCE: f32 = 0.5;

/// Stateless classifier over a compiled rule set.
#[derive(Default)]
pub struct Classifier {
    rules: RuleSet,
}

impl Classifier {
    pub fn with_rules(rules: RuleSet) -> Self {
        Self { rules }
    }

    /// Classify an utterance. Never fails.
    pub fn classify(&self, utterance: &str) -> Classification {
        let text = utterance.trim().to_lowercase();
        let scores = self.rules.scores(&text);

        let (category, confidence, reason) = if scores.automation > 0 {
            (
                IntentCategory::Automation,
                weighted(scores.automation, AUTOMATION_WEIGHT),
                AUTOMATION_REASON,
            )
        } else if scores.realtime > 0 {
            (
                IntentCategory::Realtime,
                weighted(scores.realtime, REALTIME_WEIGHT),
                REALTIME_REASON,
            )
        } else if scores.general > 0 {
            (
                IntentCategory::General,
                GENERAL_MATCHED_CONFIDENCE,
                GENERAL_REASON,
            )
        } else {
            (
                IntentCategory::General,
                GENERAL_DEFAULT_CONFIDENCE,
                GENERAL_REASON,
            )
        };

        tracing::debug!(
            category = %category,
            confidence,
            realtime = scores.realtime,
            automation = scores.automation,
            general = scores.general,
            "Classified utterance"
        );

        Classification {
            category,
            confidence,
            reason: reason.to_string(),
            scores,
        }
    }
}

fn weighted(hits: usize, weight: f32) -> f32 {
    (hits as f32 * weight).min(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intent::rules::IntentRule;

    fn classify(text: &str) -> Classification {
        Classifier::default().classify(text)
    }

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn test_automation_cue_wins() {
        let c = classify("open calculator");
        assert_eq!(c.category, IntentCategory::Automation);
        assert_eq!(c.reason, AUTOMATION_REASON);
        assert!(approx(c.confidence, 0.3));
    }

    #[test]
    fn test_automation_beats_realtime_and_general() {
        // Hits realtime ("now"), general ("can you") and automation ("open ...").
        let c = classify("Can you open the news app now");
        assert!(c.scores.realtime > 0);
        assert!(c.scores.general > 0);
        assert_eq!(c.category, IntentCategory::Automation);
    }

    #[test]
    fn test_realtime_only() {
        let c = classify("what's the weather today");
        assert_eq!(c.category, IntentCategory::Realtime);
        assert!(approx(c.confidence, 0.8));
        assert_eq!(c.reason, REALTIME_REASON);
    }

    #[test]
    fn test_realtime_beats_general() {
        let c = classify("what is the temperature");
        assert!(c.scores.general > 0);
        assert_eq!(c.category, IntentCategory::Realtime);
    }

    #[test]
    fn test_what_time_is_realtime() {
        let c = classify("what time is it");
        assert_eq!(c.category, IntentCategory::Realtime);
        assert!(approx(c.confidence, 0.4));
    }

    #[test]
    fn test_greeting_is_general() {
        let c = classify("hello");
        assert_eq!(c.category, IntentCategory::General);
        assert!(approx(c.confidence, 0.8));
        assert_eq!(c.reason, GENERAL_REASON);
    }

    #[test]
    fn test_no_match_is_general_low_confidence() {
        for text in ["xyzzy nonsense", "", "   ", "purple elephants"] {
            let c = classify(text);
            assert_eq!(c.category, IntentCategory::General, "{text:?}");
            assert!(approx(c.confidence, 0.5), "{text:?}");
            assert_eq!(c.scores, Default::default());
        }
    }

    #[test]
    fn test_case_and_whitespace_insensitive() {
        let a = classify("  OPEN Calculator  ");
        let b = classify("open calculator");
        assert_eq!(a, b);
    }

    #[test]
    fn test_confidence_capped_at_one() {
        // Four automation rules: open, email, search, system.
        let c = classify("open mail and send email then search web for system volume");
        assert!(c.scores.automation >= 4);
        assert!(approx(c.confidence, 1.0));
    }

    #[test]
    fn test_confidence_always_in_range() {
        let inputs = [
            "hi",
            "open chrome",
            "what's the current stock price today live now",
            "remind me to search google for wiki pages on youtube",
            "thanks bye",
            "?!",
        ];
        for text in inputs {
            let c = classify(text);
            assert!((0.0..=1.0).contains(&c.confidence), "{text}: {}", c.confidence);
        }
    }

    #[test]
    fn test_classification_is_deterministic() {
        let classifier = Classifier::default();
        let first = classifier.classify("play jazz on youtube");
        for _ in 0..10 {
            assert_eq!(classifier.classify("play jazz on youtube"), first);
        }
    }

    #[test]
    fn test_custom_rules() {
        let rules = [IntentRule {
            category: IntentCategory::Automation,
            pattern: r"\bbeam me up\b",
        }];
        let classifier = Classifier::with_rules(RuleSet::from_rules(&rules).unwrap());
        assert_eq!(
            classifier.classify("Beam me up").category,
            IntentCategory::Automation
        );
        assert_eq!(
            classifier.classify("open calculator").category,
            IntentCategory::General
        );
    }
}
