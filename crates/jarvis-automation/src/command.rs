//! Utterance to automation command parsing.
//!
//! Checks run in a fixed order and the first one that yields a command
//! wins. A check whose keywords match but leaves nothing to act on (e.g.
//! "play youtube") does not claim the utterance; later checks still run.

use regex::Regex;
use std::fmt;

const TIME_PHRASES: [&str; 4] = ["what time", "current time", "time now", "what's the time"];
const DATE_PHRASES: [&str; 5] = ["what date", "today's date", "current date", "what day", "today"];
const SEARCH_PHRASES: [&str; 4] = ["search google", "google search", "search for", "look up"];

/// A recognised local command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AutomationCommand {
    Time,
    Date,
    PlayOnYoutube(String),
    OpenApp(String),
    Wikipedia(String),
    WebSearch(String),
    Email,
    Weather,
    News,
    Calculator,
}

impl fmt::Display for AutomationCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AutomationCommand::Time => write!(f, "time"),
            AutomationCommand::Date => write!(f, "date"),
            AutomationCommand::PlayOnYoutube(_) => write!(f, "play_on_youtube"),
            AutomationCommand::OpenApp(_) => write!(f, "open_app"),
            AutomationCommand::Wikipedia(_) => write!(f, "wikipedia"),
            AutomationCommand::WebSearch(_) => write!(f, "web_search"),
            AutomationCommand::Email => write!(f, "email"),
            AutomationCommand::Weather => write!(f, "weather"),
            AutomationCommand::News => write!(f, "news"),
            AutomationCommand::Calculator => write!(f, "calculator"),
        }
    }
}

/// Compiled keyword patterns, built once per handler.
pub struct CommandParser {
    youtube_words: Regex,
    app_verbs: Regex,
    wiki_words: Regex,
    wiki_strip: Regex,
    search_strip: Regex,
    leading_filler: Regex,
}

impl Default for CommandParser {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandParser {
    pub fn new() -> Self {
        Self {
            youtube_words: Regex::new(r"\b(play|on youtube|youtube)\b")
                .expect("Invalid youtube regex"),
            app_verbs: Regex::new(r"\b(open|launch|start|run)\b").expect("Invalid app verb regex"),
            wiki_words: Regex::new(r"\b(wikipedia|wiki)\b").expect("Invalid wiki regex"),
            wiki_strip: Regex::new(r"\b(wikipedia|wiki|search)\b")
                .expect("Invalid wiki strip regex"),
            search_strip: Regex::new(r"\b(search google|google search|search for|look up|google)\b")
                .expect("Invalid search strip regex"),
            leading_filler: Regex::new(r"^(for|about|on)\s+").expect("Invalid filler regex"),
        }
    }

    /// Parse an utterance. Returns `None` when nothing is recognised.
    pub fn parse(&self, utterance: &str) -> Option<AutomationCommand> {
        let text = utterance.trim().to_lowercase();

        if TIME_PHRASES.iter().any(|p| text.contains(p)) {
            return Some(AutomationCommand::Time);
        }

        if DATE_PHRASES.iter().any(|p| text.contains(p)) {
            return Some(AutomationCommand::Date);
        }

        if text.contains("play") && text.contains("youtube") {
            let query = strip(&self.youtube_words, &text);
            if !query.is_empty() {
                return Some(AutomationCommand::PlayOnYoutube(query));
            }
        }

        if self.app_verbs.is_match(&text) {
            let app = strip(&self.app_verbs, &text);
            if !app.is_empty() {
                return Some(AutomationCommand::OpenApp(app));
            }
        }

        if self.wiki_words.is_match(&text) {
            let term = strip(&self.wiki_strip, &text);
            let term = self.leading_filler.replace(&term, "").into_owned();
            if !term.is_empty() {
                return Some(AutomationCommand::Wikipedia(term));
            }
        }

        if SEARCH_PHRASES.iter().any(|p| text.contains(p)) {
            let term = strip(&self.search_strip, &text);
            if !term.is_empty() {
                return Some(AutomationCommand::WebSearch(term));
            }
        }

        if text.contains("email") {
            return Some(AutomationCommand::Email);
        }

        if text.contains("weather") {
            return Some(AutomationCommand::Weather);
        }

        if text.contains("news") {
            return Some(AutomationCommand::News);
        }

        if text.contains("calculate") || text.contains("math") {
            return Some(AutomationCommand::Calculator);
        }

        None
    }
}

/// Remove every match of `words` and collapse the leftover whitespace.
fn strip(words: &Regex, text: &str) -> String {
    words
        .replace_all(text, " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
