//! Intent rule table and its compiled form.

use regex::Regex;

use crate::error::RouterError;
use crate::types::{CategoryScores, IntentCategory};

/// One matching rule: a regex found anywhere in the lowercased utterance
/// counts as one hit for `category`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntentRule {
    pub category: IntentCategory,
    pub pattern: &'static str,
}

const fn rule(category: IntentCategory, pattern: &'static str) -> IntentRule {
    IntentRule { category, pattern }
}

use IntentCategory::{Automation, General, Realtime};

/// Built-in rules, grouped by category.
pub static DEFAULT_RULES: &[IntentRule] = &[
    // =========================================================================
    // Realtime: time, date, weather, news, markets, "live/now" cues
    // =========================================================================
    rule(Realtime, r"\b(what time|current time|time now|what's the time)\b"),
    rule(Realtime, r"\b(what date|today's date|current date|what day)\b"),
    rule(Realtime, r"\b(weather|temperature|forecast)\b"),
    rule(Realtime, r"\b(news|latest news|current news)\b"),
    rule(Realtime, r"\b(stock price|market|stocks)\b"),
    rule(Realtime, r"\b(live|real.?time|current|now|today)\b"),
    // =========================================================================
    // Automation: launching, media, mail, search, reminders, system control
    // =========================================================================
    rule(Automation, r"\b(open|launch|start|run)\s+\w+"),
    rule(Automation, r"\b(play|search)\s+.+\s+(on youtube|youtube)\b"),
    rule(Automation, r"\b(send email|email)\b"),
    rule(Automation, r"\b(search|google|look up)\s+.+"),
    rule(Automation, r"\b(wikipedia|wiki)\s+.+"),
    rule(Automation, r"\b(set reminder|remind me)\b"),
    rule(Automation, r"\b(volume|brightness|system)\b"),
    rule(Automation, r"\b(shutdown|restart|sleep)\b"),
    // =========================================================================
    // General: greetings, definitions, help, thanks, polite requests
    // =========================================================================
    rule(General, r"\b(how are you|hello|hi|hey)\b"),
    rule(General, r"\b(what is|what are|explain|tell me about)\b"),
    rule(General, r"\b(help|assist|support)\b"),
    rule(General, r"\b(thank you|thanks|bye|goodbye)\b"),
    rule(General, r"\b(can you|could you|would you)\b"),
];

struct CompiledRule {
    category: IntentCategory,
    regex: Regex,
}

/// Compiled rules, built once and shared read-only across requests.
pub struct RuleSet {
    rules: Vec<CompiledRule>,
}

impl RuleSet {
    /// Compile a rule list. Fails on the first invalid pattern.
    pub fn from_rules(rules: &[IntentRule]) -> Result<Self, RouterError> {
        let compiled = rules
            .iter()
            .map(|r| {
                Regex::new(r.pattern)
                    .map(|regex| CompiledRule {
                        category: r.category,
                        regex,
                    })
                    .map_err(|source| RouterError::InvalidPattern {
                        pattern: r.pattern.to_string(),
                        source,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { rules: compiled })
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Count matching rules per category. `text` is expected lowercased.
    pub fn scores(&self, text: &str) -> CategoryScores {
        let mut scores = CategoryScores::default();
        for rule in &self.rules {
            if rule.regex.is_match(text) {
                scores.bump(rule.category);
            }
        }
        scores
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::from_rules(DEFAULT_RULES).expect("Invalid built-in intent regex")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count(category: IntentCategory) -> usize {
        DEFAULT_RULES
            .iter()
            .filter(|r| r.category == category)
            .count()
    }

    #[test]
    fn test_default_table_shape() {
        assert_eq!(count(Realtime), 6);
        assert_eq!(count(Automation), 8);
        assert_eq!(count(General), 5);
    }

    #[test]
    fn test_default_rules_compile() {
        let set = RuleSet::default();
        assert_eq!(set.len(), DEFAULT_RULES.len());
        assert!(!set.is_empty());
    }

    #[test]
    fn test_invalid_pattern_rejected() {
        let rules = [rule(General, r"\b(hello"), rule(General, "fine")];
        let err = RuleSet::from_rules(&rules).err().unwrap();
        match err {
            RouterError::InvalidPattern { pattern, .. } => assert_eq!(pattern, r"\b(hello"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_custom_rule_list() {
        let rules = [rule(Realtime, r"\bclock\b"), rule(Realtime, r"\btick\b")];
        let set = RuleSet::from_rules(&rules).unwrap();
        let scores = set.scores("clock goes tick");
        assert_eq!(scores.realtime, 2);
        assert_eq!(scores.automation, 0);
    }

    #[test]
    fn test_empty_rule_list_scores_nothing() {
        let set = RuleSet::from_rules(&[]).unwrap();
        assert!(set.is_empty());
        assert_eq!(set.scores("open calculator"), CategoryScores::default());
    }

    #[test]
    fn test_matches_anywhere_in_text() {
        let set = RuleSet::default();
        let scores = set.scores("please could you open the calculator for me");
        assert!(scores.automation >= 1);
        assert!(scores.general >= 1);
    }

    #[test]
    fn test_word_boundaries_respected() {
        let set = RuleSet::default();
        // "this" contains "hi" but not as a word.
        assert_eq!(set.scores("this").general, 0);
        // "history" contains "hi" as a prefix only.
        assert_eq!(set.scores("history").general, 0);
    }

    #[test]
    fn test_weather_today_counts_two_realtime_rules() {
        let set = RuleSet::default();
        let scores = set.scores("what's the weather today");
        assert_eq!(scores.realtime, 2);
        assert_eq!(scores.automation, 0);
    }

    #[test]
    fn test_youtube_and_search_both_hit() {
        let set = RuleSet::default();
        let scores = set.scores("search lofi beats on youtube");
        // play/search ... youtube, and search <anything>.
        assert_eq!(scores.automation, 2);
    }
}
