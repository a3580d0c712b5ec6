//! Video timeline models.

use std::collections::BTreeSet;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::alert::AlertTag;

/// Kind of event a timeline description reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    PersonEnters,
    PersonExits,
    VehicleArrives,
    VehicleLeaves,
    ActivityStarts,
    ActivityStops,
    SceneChange,
    NoChange,
    GeneralActivity,
}

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PersonEnters => "person_enters",
            Self::PersonExits => "person_exits",
            Self::VehicleArrives => "vehicle_arrives",
            Self::VehicleLeaves => "vehicle_leaves",
            Self::ActivityStarts => "activity_starts",
            Self::ActivityStops => "activity_stops",
            Self::SceneChange => "scene_change",
            Self::NoChange => "no_change",
            Self::GeneralActivity => "general_activity",
        }
    }

    /// Arrivals, departures and activity boundaries always make a frame significant.
    pub fn is_transition(&self) -> bool {
        matches!(
            self,
            Self::PersonEnters
                | Self::PersonExits
                | Self::VehicleArrives
                | Self::VehicleLeaves
                | Self::ActivityStarts
                | Self::ActivityStops
        )
    }

    /// Human-readable name: underscores to spaces, title-cased.
    pub fn display_name(&self) -> String {
        self.as_str()
            .split('_')
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A recorded, significant observation within one video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TimelineEvent {
    /// Seconds from the start of the video
    pub timestamp: f64,

    /// `MM:SS` rendering of the timestamp
    pub time_formatted: String,

    /// Index of the decoded frame
    pub frame_number: u64,

    pub event_type: EventType,

    /// Timeline description answer, or its failure placeholder
    pub description: String,

    /// Change contexts extracted from the change-detection answer
    #[serde(default)]
    pub changes: Vec<String>,

    #[serde(default)]
    pub alerts: Vec<AlertTag>,

    pub confidence: f64,

    /// The timeline description query failed
    #[serde(default)]
    pub degraded: bool,
}

/// Format seconds as zero-padded `MM:SS`.
///
/// Minutes are not wrapped at the hour, matching how camera clips are read.
pub fn format_clock(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds.floor() as u64
    } else {
        0
    };
    format!("{:02}:{:02}", total / 60, total % 60)
}

/// Phase of a timeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum TimelinePhase {
    #[default]
    AwaitingFirstFrame,
    Tracking,
    Done,
}

/// Mutable state for one video's timeline run.
///
/// Owned by exactly one run; two videos never share an instance.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct VideoTimelineState {
    pub phase: TimelinePhase,

    /// Scene summary of the last recorded event
    pub previous_scene_summary: String,

    pub all_alerts: BTreeSet<AlertTag>,

    pub events: Vec<TimelineEvent>,

    /// Change lists of recorded events, in event order
    pub significant_changes: Vec<Vec<String>>,

    /// Sampled frames analyzed so far, significant or not
    pub processed_frames: u64,
}

impl VideoTimelineState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_first_frame(&self) -> bool {
        self.phase == TimelinePhase::AwaitingFirstFrame
    }

    /// Append an event, merging its alerts and adopting its scene summary.
    pub fn record(&mut self, event: TimelineEvent, scene_summary: String) {
        self.all_alerts.extend(event.alerts.iter().copied());
        self.significant_changes.push(event.changes.clone());
        self.events.push(event);
        self.previous_scene_summary = scene_summary;
        self.phase = TimelinePhase::Tracking;
    }

    /// Mean event confidence, 0 when nothing was recorded.
    pub fn average_confidence(&self) -> f64 {
        if self.events.is_empty() {
            return 0.0;
        }
        self.events.iter().map(|e| e.confidence).sum::<f64>() / self.events.len() as f64
    }

    pub fn finish(&mut self) {
        self.phase = TimelinePhase::Done;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(timestamp: f64, confidence: f64, alerts: Vec<AlertTag>) -> TimelineEvent {
        TimelineEvent {
            timestamp,
            time_formatted: format_clock(timestamp),
            frame_number: (timestamp * 30.0) as u64,
            event_type: EventType::GeneralActivity,
            description: "something".to_string(),
            changes: vec!["a car arrives".to_string()],
            alerts,
            confidence,
            degraded: false,
        }
    }

    #[test]
    fn test_format_clock() {
        assert_eq!(format_clock(0.0), "00:00");
        assert_eq!(format_clock(59.9), "00:59");
        assert_eq!(format_clock(61.0), "01:01");
        assert_eq!(format_clock(3725.0), "62:05");
        assert_eq!(format_clock(-3.0), "00:00");
        assert_eq!(format_clock(f64::NAN), "00:00");
    }

    #[test]
    fn test_display_name() {
        assert_eq!(EventType::PersonEnters.display_name(), "Person Enters");
        assert_eq!(EventType::NoChange.display_name(), "No Change");
    }

    #[test]
    fn test_transitions() {
        assert!(EventType::VehicleLeaves.is_transition());
        assert!(!EventType::SceneChange.is_transition());
        assert!(!EventType::GeneralActivity.is_transition());
    }

    #[test]
    fn test_record_updates_state() {
        let mut state = VideoTimelineState::new();
        assert!(state.is_first_frame());

        state.record(event(0.0, 0.5, vec![AlertTag::NightTime]), "dark yard".to_string());
        state.record(event(2.0, 0.8, vec![AlertTag::PersonDetected, AlertTag::NightTime]), "person".to_string());

        assert_eq!(state.phase, TimelinePhase::Tracking);
        assert_eq!(state.events.len(), 2);
        assert_eq!(state.all_alerts.len(), 2);
        assert_eq!(state.significant_changes.len(), 2);
        assert_eq!(state.previous_scene_summary, "person");
        assert!((state.average_confidence() - 0.65).abs() < 1e-9);
    }

    #[test]
    fn test_average_confidence_empty() {
        assert_eq!(VideoTimelineState::new().average_confidence(), 0.0);
    }
}
