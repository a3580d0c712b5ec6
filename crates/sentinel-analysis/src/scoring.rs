//! Confidence scoring for images and timeline frames.

use sentinel_models::AlertTag;
use serde::{Deserialize, Serialize};

/// Tunable scoring constants.
///
/// Defaults reproduce the hand-tuned values the analyzer shipped with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Words needed for full base confidence on an image description
    pub full_confidence_words: usize,

    /// Bonus per successful aspect beyond the first
    pub aspect_bonus: f64,

    /// Bonus when the description carries a high-value alert
    pub alert_bonus: f64,

    /// Timeline descriptions naming a definite transition
    pub definite_keywords: Vec<String>,
    pub definite_confidence: f64,

    /// Timeline descriptions naming a vague change
    pub vague_keywords: Vec<String>,
    pub vague_confidence: f64,

    /// Timeline descriptions shorter than this many characters are vague
    pub short_description_chars: usize,
    pub short_confidence: f64,

    pub default_confidence: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            full_confidence_words: 50,
            aspect_bonus: 0.1,
            alert_bonus: 0.1,
            definite_keywords: ["enters", "exits", "arrives", "leaves", "starts", "stops"]
                .map(String::from)
                .into(),
            definite_confidence: 0.8,
            vague_keywords: ["different", "changed", "new", "appears"]
                .map(String::from)
                .into(),
            vague_confidence: 0.6,
            short_description_chars: 20,
            short_confidence: 0.3,
            default_confidence: 0.5,
        }
    }
}

impl ScoringConfig {
    /// Confidence of a comprehensive image description.
    ///
    /// Base from word count, a bonus per extra successful aspect and a bonus
    /// for person or vehicle alerts, clamped to [0, 1].
    pub fn image_confidence(&self, description: &str, successful_aspects: usize) -> f64 {
        let words = description.split_whitespace().count() as f64;
        let base = (words / self.full_confidence_words.max(1) as f64).min(1.0);

        let aspect_bonus = (successful_aspects as f64 - 1.0) * self.aspect_bonus;

        let has_high_value_alert = AlertTag::ALL
            .iter()
            .filter(|tag| tag.is_high_value())
            .any(|tag| description.contains(tag.as_str()));
        let alert_bonus = if has_high_value_alert { self.alert_bonus } else { 0.0 };

        clamp_unit(base + aspect_bonus + alert_bonus)
    }

    /// Confidence of a timeline description; the first matching rule wins.
    pub fn timeline_confidence(&self, description: &str) -> f64 {
        let lower = description.to_lowercase();
        let score = if contains_any(&lower, &self.definite_keywords) {
            self.definite_confidence
        } else if contains_any(&lower, &self.vague_keywords) {
            self.vague_confidence
        } else if description.chars().count() < self.short_description_chars {
            self.short_confidence
        } else {
            self.default_confidence
        };
        clamp_unit(score)
    }
}

fn contains_any(text: &str, keywords: &[String]) -> bool {
    keywords.iter().any(|keyword| text.contains(keyword.as_str()))
}

fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}
