//! Aspect models.
//!
//! An aspect is a named question category used to probe one image from
//! several angles. A [`PromptSet`] maps aspects to the question sent to the
//! vision-language service and an [`AspectResult`] records what came back.

use std::collections::BTreeMap;
use std::fmt;

use schemars::gen::SchemaGenerator;
use schemars::schema::Schema;
use schemars::JsonSchema;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Standard image aspect keys.
pub const GENERAL: &str = "general";
pub const SECURITY: &str = "security";
pub const IDENTIFICATION: &str = "identification";
pub const VEHICLES: &str = "vehicles";
pub const PEOPLE: &str = "people";
pub const OBJECTS: &str = "objects";
pub const ACTIVITIES: &str = "activities";
pub const ENVIRONMENT: &str = "environment";

/// Context aspects injected when the request carries a known key.
pub const LOCATION_CONTEXT: &str = "location_context";
pub const TIME_CONTEXT: &str = "time_context";
pub const ALERT_CONTEXT: &str = "alert_context";

/// Identification sub-aspects.
pub const LICENSE_PLATES: &str = "license_plates";
pub const VEHICLE_DETAILS: &str = "vehicle_details";
pub const PERSON_IDENTIFICATION: &str = "person_identification";
pub const COMPANY_LOGOS: &str = "company_logos";
pub const READABLE_TEXT: &str = "readable_text";
pub const PACKAGES_DELIVERIES: &str = "packages_deliveries";
pub const DISTINCTIVE_FEATURES: &str = "distinctive_features";

/// Timeline frame aspects.
pub const SCENE_SUMMARY: &str = "scene_summary";
pub const TIMELINE_DESCRIPTION: &str = "timeline_description";
pub const CHANGE_DETECTION: &str = "change_detection";

/// Fixed error sentence recorded when the query for `aspect` fails.
pub fn failure_placeholder(aspect: &str) -> &'static str {
    match aspect {
        GENERAL | SCENE_SUMMARY => "Error analyzing scene",
        SECURITY => "Error analyzing security aspects",
        OBJECTS => "Error identifying objects",
        ACTIVITIES => "Error detecting activities",
        ENVIRONMENT => "Error analyzing environment",
        TIMELINE_DESCRIPTION => "Error detecting changes",
        _ => "Error generating description",
    }
}

/// Ordered aspect → prompt mapping.
///
/// Keys are unique. Inserting an existing key replaces its prompt in place,
/// so the original position is kept.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct PromptSet {
    entries: Vec<(String, String)>,
}

impl PromptSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the prompt for an aspect.
    pub fn insert(&mut self, aspect: impl Into<String>, prompt: impl Into<String>) {
        let aspect = aspect.into();
        let prompt = prompt.into();
        match self.entries.iter_mut().find(|(key, _)| *key == aspect) {
            Some(entry) => entry.1 = prompt,
            None => self.entries.push((aspect, prompt)),
        }
    }

    pub fn get(&self, aspect: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(key, _)| key == aspect)
            .map(|(_, prompt)| prompt.as_str())
    }

    pub fn contains(&self, aspect: &str) -> bool {
        self.get(aspect).is_some()
    }

    /// Aspect names in insertion order.
    pub fn aspects(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(key, prompt)| (key.as_str(), prompt.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for PromptSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut set = PromptSet::new();
        for (aspect, prompt) in iter {
            set.insert(aspect, prompt);
        }
        set
    }
}

/// Outcome of querying the vision-language service for one aspect.
///
/// Failures keep their fixed placeholder sentence for display, but are never
/// mistaken for an answer by the classifiers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AspectOutcome {
    /// The service answered; the text is already trimmed.
    Answered { text: String },
    /// The query failed.
    Failed { placeholder: String, reason: String },
}

impl AspectOutcome {
    pub fn answered(text: impl Into<String>) -> Self {
        Self::Answered { text: text.into() }
    }

    pub fn failed(aspect: &str, reason: impl Into<String>) -> Self {
        Self::Failed {
            placeholder: failure_placeholder(aspect).to_string(),
            reason: reason.into(),
        }
    }

    /// The answer text, if the query succeeded.
    pub fn answer(&self) -> Option<&str> {
        match self {
            Self::Answered { text } => Some(text),
            Self::Failed { .. } => None,
        }
    }

    /// Text for display: the answer or the failure placeholder.
    pub fn display_text(&self) -> &str {
        match self {
            Self::Answered { text } => text,
            Self::Failed { placeholder, .. } => placeholder,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }

    /// Answered with non-blank text.
    pub fn is_successful(&self) -> bool {
        self.answer().map(|text| !text.trim().is_empty()).unwrap_or(false)
    }
}

/// Ordered aspect → outcome mapping produced once per image or frame.
///
/// Serializes as a JSON object keyed by aspect name, in aspect order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AspectResult {
    entries: Vec<(String, AspectOutcome)>,
}

impl AspectResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the outcome for an aspect, replacing any earlier one.
    pub fn insert(&mut self, aspect: impl Into<String>, outcome: AspectOutcome) {
        let aspect = aspect.into();
        match self.entries.iter_mut().find(|(key, _)| *key == aspect) {
            Some(entry) => entry.1 = outcome,
            None => self.entries.push((aspect, outcome)),
        }
    }

    pub fn get(&self, aspect: &str) -> Option<&AspectOutcome> {
        self.entries
            .iter()
            .find(|(key, _)| key == aspect)
            .map(|(_, outcome)| outcome)
    }

    /// Answer text for an aspect; `None` when missing or failed.
    pub fn text(&self, aspect: &str) -> Option<&str> {
        self.get(aspect).and_then(AspectOutcome::answer)
    }

    /// Answer text for an aspect, or an empty string.
    pub fn text_or_empty(&self, aspect: &str) -> &str {
        self.text(aspect).unwrap_or("")
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AspectOutcome)> {
        self.entries
            .iter()
            .map(|(key, outcome)| (key.as_str(), outcome))
    }

    /// All answered texts in aspect order.
    pub fn answered_texts(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().filter_map(|(_, outcome)| outcome.answer())
    }

    /// Number of aspects answered with non-blank text.
    pub fn successful_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|(_, outcome)| outcome.is_successful())
            .count()
    }

    pub fn failed_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|(_, outcome)| outcome.is_failed())
            .count()
    }

    /// Flatten to aspect → display text, the shape exposed to callers.
    pub fn to_text_map(&self) -> serde_json::Map<String, serde_json::Value> {
        self.entries
            .iter()
            .map(|(key, outcome)| {
                (
                    key.clone(),
                    serde_json::Value::String(outcome.display_text().to_string()),
                )
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for AspectResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (aspect, outcome) in &self.entries {
            map.serialize_entry(aspect, outcome)?;
        }
        map.end()
    }
}

struct AspectResultVisitor;

impl<'de> Visitor<'de> for AspectResultVisitor {
    type Value = AspectResult;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map of aspect names to outcomes")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<AspectResult, A::Error> {
        let mut result = AspectResult::new();
        while let Some((aspect, outcome)) = access.next_entry::<String, AspectOutcome>()? {
            result.insert(aspect, outcome);
        }
        Ok(result)
    }
}

impl<'de> Deserialize<'de> for AspectResult {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(AspectResultVisitor)
    }
}

impl JsonSchema for AspectResult {
    fn schema_name() -> String {
        "AspectResult".to_string()
    }

    fn json_schema(gen: &mut SchemaGenerator) -> Schema {
        <BTreeMap<String, AspectOutcome>>::json_schema(gen)
    }
}

impl<K: Into<String>> FromIterator<(K, AspectOutcome)> for AspectResult {
    fn from_iter<I: IntoIterator<Item = (K, AspectOutcome)>>(iter: I) -> Self {
        let mut result = AspectResult::new();
        for (aspect, outcome) in iter {
            result.insert(aspect, outcome);
        }
        result
    }
}
