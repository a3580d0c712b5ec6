//! Keyword classification.
//!
//! Stateless functions mapping free text to typed signals. Matching is
//! case-insensitive substring matching against the tables in
//! [`crate::keywords`] unless noted otherwise.

use std::sync::LazyLock;

use regex::Regex;
use sentinel_models::{AlertTag, AspectResult, EventType};
use serde::{Deserialize, Serialize};

use crate::keywords::{
    first_match, KeywordTable, ACTIVITY_KEYWORDS, ALERT_KEYWORDS, CHANGE_KEYWORDS,
    ENVIRONMENT_KEYWORDS, EVENT_TYPES, HIGH_PRIORITY_TERMS, MEDIUM_PRIORITY_TERMS,
    SECURITY_RELEVANCE,
};

/// Characters of the input echoed back when nothing matched.
pub const FALLBACK_CHARS: usize = 50;

/// Maximum change contexts returned by [`extract_changes`].
pub const MAX_CHANGES: usize = 3;

/// Tokens of context kept on each side of a change keyword.
const CHANGE_CONTEXT_WORDS: usize = 2;

/// Quantity + noun patterns for people, vehicles, packages and animals.
static OBJECT_COUNT_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    const QUANTITY: &str = r"(\d+|one|two|three|four|five|six|seven|eight|nine|ten)";
    [
        r"(people|persons?|individuals?)",
        r"(cars?|vehicles?|trucks?|vans?)",
        r"(packages?|boxes?|bags?)",
        r"(dogs?|cats?|animals?)",
    ]
    .iter()
    .map(|noun| Regex::new(&format!(r"\b{}\s+{}\b", QUANTITY, noun)).unwrap())
    .collect()
});

/// Relevance level from the security phrase table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SecurityLevel {
    High,
    Medium,
    Low,
}

impl SecurityLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }

    fn from_key(key: &str) -> Option<Self> {
        match key {
            "high" => Some(Self::High),
            "medium" => Some(Self::Medium),
            "low" => Some(Self::Low),
            _ => None,
        }
    }
}

impl std::fmt::Display for SecurityLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

fn fallback(text: &str) -> String {
    text.chars().take(FALLBACK_CHARS).collect()
}

fn join_or_fallback(found: Vec<String>, text: &str) -> String {
    if found.is_empty() {
        fallback(text)
    } else {
        found.join(", ")
    }
}

/// First keyword per category, in category order.
fn first_per_category(text: &str, table: KeywordTable) -> Vec<String> {
    let lower = text.to_lowercase();
    table
        .iter()
        .filter_map(|(_, keywords)| first_match(&lower, keywords))
        .map(str::to_string)
        .collect()
}

/// Security terms found in a security answer, high priority first.
pub fn extract_security_relevance(text: &str) -> String {
    let lower = text.to_lowercase();
    let mut found: Vec<String> = Vec::new();

    for term in HIGH_PRIORITY_TERMS.iter().chain(MEDIUM_PRIORITY_TERMS) {
        if lower.contains(term) && !found.iter().any(|f| f.as_str() == *term) {
            found.push(term.to_string());
        }
    }

    join_or_fallback(found, text)
}

/// `"<quantity> <noun>"` pairs found in an objects answer.
///
/// Results are grouped by noun category (people, vehicles, packages,
/// animals), then in text order within a category.
pub fn extract_object_counts(text: &str) -> String {
    let lower = text.to_lowercase();
    let found: Vec<String> = OBJECT_COUNT_PATTERNS
        .iter()
        .flat_map(|pattern| {
            pattern
                .captures_iter(&lower)
                .map(|caps| format!("{} {}", &caps[1], &caps[2]))
                .collect::<Vec<_>>()
        })
        .collect();

    join_or_fallback(found, text)
}

/// At most one activity keyword per activity category.
pub fn extract_activities(text: &str) -> String {
    join_or_fallback(first_per_category(text, ACTIVITY_KEYWORDS), text)
}

/// At most one environment keyword per environment category.
pub fn extract_environment_info(text: &str) -> String {
    join_or_fallback(first_per_category(text, ENVIRONMENT_KEYWORDS), text)
}

/// Alert tags whose keyword groups hit the given text, in group order.
pub fn alert_tags_for_text(text: &str) -> Vec<AlertTag> {
    let lower = text.to_lowercase();
    ALERT_KEYWORDS
        .iter()
        .filter(|(_, keywords)| keywords.iter().any(|keyword| lower.contains(keyword)))
        .map(|(tag, _)| *tag)
        .collect()
}

/// Alert tags over every answered aspect.
///
/// Failed aspects contribute nothing, so a placeholder sentence can never
/// raise an alert.
pub fn generate_alert_tags(results: &AspectResult) -> Vec<AlertTag> {
    let all_text = results.answered_texts().collect::<Vec<_>>().join(" ");
    alert_tags_for_text(&all_text)
}

fn normalize_token(token: &str) -> &str {
    token.trim_matches(|c: char| !c.is_alphanumeric())
}

/// Number of tokens a change keyword spans when it matches at `tokens[start..]`.
fn change_keyword_at(tokens: &[&str], start: usize) -> Option<usize> {
    CHANGE_KEYWORDS
        .iter()
        .flat_map(|(_, keywords)| keywords.iter())
        .find_map(|keyword| {
            let words: Vec<&str> = keyword.split_whitespace().collect();
            let end = start + words.len();
            if end > tokens.len() {
                return None;
            }
            let hit = tokens[start..end]
                .iter()
                .zip(&words)
                .all(|(token, word)| normalize_token(token) == *word);
            hit.then_some(words.len())
        })
}

/// Short contexts around change keywords, left to right, at most three.
///
/// Each context spans two tokens either side of the keyword. Multi-word
/// keywords ("shows up") match token-wise and punctuation around a token is
/// ignored when matching.
pub fn extract_changes(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    let tokens: Vec<&str> = lower.split_whitespace().collect();
    let mut changes = Vec::new();
    let mut i = 0;

    while i < tokens.len() && changes.len() < MAX_CHANGES {
        match change_keyword_at(&tokens, i) {
            Some(span) => {
                let start = i.saturating_sub(CHANGE_CONTEXT_WORDS);
                let end = (i + span + CHANGE_CONTEXT_WORDS).min(tokens.len());
                changes.push(tokens[start..end].join(" "));
                i += span;
            }
            None => i += 1,
        }
    }

    changes
}

/// Event type of a timeline description; earlier categories win.
pub fn classify_event_type(text: &str) -> EventType {
    let lower = text.to_lowercase();
    EVENT_TYPES
        .iter()
        .find(|(_, phrases)| phrases.iter().any(|phrase| lower.contains(phrase)))
        .map(|(event_type, _)| *event_type)
        .unwrap_or(EventType::GeneralActivity)
}

/// Most severe relevance level with a phrase in the text.
pub fn classify_security_level(text: &str) -> Option<SecurityLevel> {
    let lower = text.to_lowercase();
    SECURITY_RELEVANCE
        .iter()
        .find(|(_, phrases)| first_match(&lower, phrases).is_some())
        .and_then(|(level, _)| SecurityLevel::from_key(level))
}
