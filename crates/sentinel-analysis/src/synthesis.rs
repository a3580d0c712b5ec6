//! Comprehensive description synthesis.
//!
//! Collapses one image's aspect answers into a single pipe-separated
//! description: `SCENE: … | SECURITY: … | OBJECTS: … | ACTIVITY: … |
//! SETTING: … | ALERTS: …`. Segments appear in that order and only when
//! their source aspect produced a non-empty signal.

use sentinel_models::alert::join_tags;
use sentinel_models::aspect::{ACTIVITIES, ENVIRONMENT, GENERAL, OBJECTS, SECURITY};
use sentinel_models::{AlertTag, AspectResult};
use tracing::debug;

use crate::classify::{
    extract_activities, extract_environment_info, extract_object_counts,
    extract_security_relevance, generate_alert_tags,
};
use crate::scoring::ScoringConfig;

/// Description used when no aspect produced anything usable.
pub const NO_DESCRIPTION: &str = "Error creating description";

/// Activities answers containing this phrase contribute no segment.
const NO_ACTIVITIES_PHRASE: &str = "no activities";

/// Output of [`synthesize`].
#[derive(Debug, Clone, PartialEq)]
pub struct Synthesis {
    pub description: String,
    /// Alert tags over all answered aspects, in detection order
    pub alerts: Vec<AlertTag>,
    pub confidence: f64,
}

fn answered<'a>(results: &'a AspectResult, aspect: &str) -> Option<&'a str> {
    results
        .text(aspect)
        .map(str::trim)
        .filter(|text| !text.is_empty())
}

fn segment(label: &str, value: String) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| format!("{}: {}", label, value))
}

/// Build the comprehensive description with the default scoring constants.
pub fn synthesize(results: &AspectResult) -> Synthesis {
    synthesize_with(results, &ScoringConfig::default())
}

/// Build the comprehensive description, alert list and confidence.
///
/// Failed and blank aspects contribute nothing. When only the scene is
/// known the bare general answer is returned; when even that is missing the
/// description is [`NO_DESCRIPTION`].
pub fn synthesize_with(results: &AspectResult, scoring: &ScoringConfig) -> Synthesis {
    let general = answered(results, GENERAL);
    let alerts = generate_alert_tags(results);

    let signals: Vec<String> = [
        answered(results, SECURITY)
            .and_then(|text| segment("SECURITY", extract_security_relevance(text))),
        answered(results, OBJECTS).and_then(|text| segment("OBJECTS", extract_object_counts(text))),
        answered(results, ACTIVITIES)
            .filter(|text| !text.to_lowercase().contains(NO_ACTIVITIES_PHRASE))
            .and_then(|text| segment("ACTIVITY", extract_activities(text))),
        answered(results, ENVIRONMENT)
            .and_then(|text| segment("SETTING", extract_environment_info(text))),
        (!alerts.is_empty()).then(|| format!("ALERTS: {}", join_tags(&alerts))),
    ]
    .into_iter()
    .flatten()
    .collect();

    let description = match (general, signals.is_empty()) {
        (Some(general), true) => general.to_string(),
        (None, true) => {
            return Synthesis {
                description: NO_DESCRIPTION.to_string(),
                alerts,
                confidence: 0.0,
            }
        }
        (general, false) => general
            .map(|text| format!("SCENE: {}", text))
            .into_iter()
            .chain(signals)
            .collect::<Vec<_>>()
            .join(" | "),
    };

    let confidence = scoring.image_confidence(&description, results.successful_count());

    debug!(
        successful_aspects = results.successful_count(),
        failed_aspects = results.failed_count(),
        alerts = alerts.len(),
        confidence = confidence,
        "Synthesized description"
    );

    Synthesis {
        description,
        alerts,
        confidence,
    }
}
