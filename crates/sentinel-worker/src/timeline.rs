//! Video timeline event engine.
//!
//! Consumes a frame source in order, analyzes every sampled frame against the
//! last recorded scene and keeps only frames that represent a significant
//! change. The per-video [`VideoTimelineState`] is created by [`TimelineEngine::run`]
//! and threaded through explicitly, so one engine can serve many videos.

use std::collections::BTreeSet;

use sentinel_analysis::{
    classify_event_type, extract_changes, generate_alert_tags, get_timeline_prompts,
    ScoringConfig,
};
use sentinel_media::{Frame, FrameSource};
use sentinel_models::alert::join_tags;
use sentinel_models::{
    aspect, format_clock, AlertTag, AspectOutcome, EventType, TimelineEvent, VideoTimelineState,
};
use tracing::{debug, info};

use crate::config::TimelineConfig;
use crate::error::{AnalyzerError, AnalyzerResult};
use crate::metrics;
use crate::orchestrator::AspectOrchestrator;

/// Phrase the vision service tends to echo back from the comparison prompt.
const COMPARISON_PREFIX: &str = "Compared to the previous scene:";

/// Typed analysis of one sampled frame.
#[derive(Debug, Clone)]
pub struct FrameAnalysis {
    /// Scene summary answer; empty when that query failed
    pub scene_summary: String,
    pub description: AspectOutcome,
    pub changes: Vec<String>,
    pub event_type: EventType,
    pub alerts: Vec<AlertTag>,
    pub confidence: f64,
}

/// Finished timeline of one video.
#[derive(Debug, Clone)]
pub struct TimelineOutcome {
    pub state: VideoTimelineState,
    pub summary: String,
    /// Mean event confidence, 0 without events
    pub confidence: f64,
}

/// Timeline engine.
#[derive(Debug, Clone)]
pub struct TimelineEngine {
    orchestrator: AspectOrchestrator,
    config: TimelineConfig,
    scoring: ScoringConfig,
}

impl TimelineEngine {
    pub fn new(orchestrator: AspectOrchestrator, config: TimelineConfig, scoring: ScoringConfig) -> Self {
        Self {
            orchestrator,
            config,
            scoring,
        }
    }

    pub fn config(&self) -> &TimelineConfig {
        &self.config
    }

    /// Whether the frame at `index` is analyzed.
    pub fn should_sample(&self, index: u64) -> bool {
        index % self.config.sample_rate.max(1) == 0
    }

    /// Run the timeline prompts against one frame.
    pub async fn analyze_frame(&self, frame: &Frame, state: &VideoTimelineState) -> FrameAnalysis {
        let prompts = get_timeline_prompts(
            state.is_first_frame(),
            Some(state.previous_scene_summary.as_str()),
        );
        let results = self
            .orchestrator
            .analyze(&frame.image, &prompts, self.config.max_answer_length)
            .await;

        let description = results
            .get(aspect::TIMELINE_DESCRIPTION)
            .cloned()
            .unwrap_or_else(|| AspectOutcome::failed(aspect::TIMELINE_DESCRIPTION, "not asked"));
        let description_text = description.answer().unwrap_or("");

        FrameAnalysis {
            scene_summary: results.text_or_empty(aspect::SCENE_SUMMARY).to_string(),
            changes: extract_changes(results.text_or_empty(aspect::CHANGE_DETECTION)),
            event_type: classify_event_type(description_text),
            alerts: generate_alert_tags(&results),
            confidence: self.scoring.timeline_confidence(description_text),
            description,
        }
    }

    /// Whether a frame is worth recording, checked in a fixed order.
    pub fn is_significant(&self, analysis: &FrameAnalysis, previous_scene_summary: &str) -> bool {
        previous_scene_summary.is_empty()
            || !analysis.alerts.is_empty()
            || !analysis.changes.is_empty()
            || analysis.event_type.is_transition()
            || analysis.confidence > self.config.significance_threshold
    }

    /// Analyze one sampled frame and record it if significant.
    ///
    /// Returns whether an event was recorded.
    pub async fn process_frame(&self, state: &mut VideoTimelineState, frame: &Frame) -> bool {
        let analysis = self.analyze_frame(frame, state).await;
        let significant = self.is_significant(&analysis, &state.previous_scene_summary);
        state.processed_frames += 1;
        metrics::record_frame(significant);

        if !significant {
            debug!(frame = frame.index, "Frame not significant");
            return false;
        }

        let timestamp = frame.timestamp();
        let event = TimelineEvent {
            timestamp,
            time_formatted: format_clock(timestamp),
            frame_number: frame.index,
            event_type: analysis.event_type,
            description: analysis.description.display_text().to_string(),
            changes: analysis.changes,
            alerts: analysis.alerts,
            confidence: analysis.confidence,
            degraded: analysis.description.is_failed(),
        };
        debug!(
            at = %event.time_formatted,
            event_type = %event.event_type,
            "Timeline event: {}", event.description
        );
        state.record(event, analysis.scene_summary);
        true
    }

    /// Drive a frame source to exhaustion.
    ///
    /// Any read error aborts the run.
    pub async fn run(&self, source: &mut dyn FrameSource) -> AnalyzerResult<TimelineOutcome> {
        let mut state = VideoTimelineState::new();

        while let Some(frame) = source
            .next_frame()
            .await
            .map_err(AnalyzerError::frame_source)?
        {
            if self.should_sample(frame.index) {
                self.process_frame(&mut state, &frame).await;
            }
        }
        state.finish();

        let duration = source.info().duration;
        let summary = summarize(&state, duration);
        let confidence = state.average_confidence();

        info!(
            processed_frames = state.processed_frames,
            events = state.events.len(),
            alerts = %join_tags(&state.all_alerts),
            "Timeline complete"
        );

        Ok(TimelineOutcome {
            state,
            summary,
            confidence,
        })
    }
}

/// Narrative summary of a finished timeline.
pub fn summarize(state: &VideoTimelineState, duration: f64) -> String {
    let events = &state.events;
    if events.is_empty() {
        return format!(
            "Video analysis complete ({:.1}s) - No significant events detected",
            duration
        );
    }

    let mut parts = vec![format!(
        "TIMELINE ANALYSIS ({:.1}s, {} events)",
        duration,
        events.len()
    )];

    let entries: Vec<String> = events
        .iter()
        .filter(|event| !event.degraded)
        .filter_map(|event| {
            let text = event.description.replace(COMPARISON_PREFIX, "");
            let text = text.trim();
            (!text.is_empty()).then(|| format!("{}: {}", event.time_formatted, text))
        })
        .collect();
    if !entries.is_empty() {
        parts.push(format!("EVENTS: {}", entries.join(" | ")));
    }

    let types: BTreeSet<String> = events
        .iter()
        .map(|event| event.event_type)
        .filter(|event_type| *event_type != EventType::GeneralActivity)
        .map(|event_type| event_type.display_name())
        .collect();
    if !types.is_empty() {
        parts.push(format!(
            "EVENT TYPES: {}",
            types.into_iter().collect::<Vec<_>>().join(", ")
        ));
    }

    let alerts: BTreeSet<AlertTag> = events
        .iter()
        .flat_map(|event| event.alerts.iter().copied())
        .collect();
    if !alerts.is_empty() {
        parts.push(format!("ALERTS: {}", join_tags(&alerts)));
    }

    parts.join(" | ")
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::orchestrator::testing::FnVision;
    use sentinel_media::{MediaError, MemoryFrameSource, VideoInfo};
    use sentinel_models::{ImageData, TimelinePhase};
    use sentinel_vlm::InferenceError;

    fn engine(vision: Arc<FnVision>, sample_rate: u64) -> TimelineEngine {
        TimelineEngine::new(
            AspectOrchestrator::new(vision),
            TimelineConfig {
                sample_rate,
                ..TimelineConfig::default()
            },
            ScoringConfig::default(),
        )
    }

    fn frames(count: u8, fps: f64) -> MemoryFrameSource {
        let info = VideoInfo::from_frames(64, 48, fps, count as u64);
        MemoryFrameSource::from_images(info, (0..count).map(|i| ImageData::jpeg(vec![i])))
    }

    /// Frames listed in `busy` report an arrival; all others are quiet.
    fn scripted(busy: &'static [u8]) -> FnVision {
        FnVision::new(move |image, question| {
            let id = image.bytes[0];
            let busy = busy.contains(&id);
            let answer = if question.contains("initial scene at the beginning")
                || question.contains("currently happening")
            {
                format!("scene {}", id)
            } else if question.contains("key elements") || question.contains("specific changes") {
                let text = if busy { "a car arrives in the driveway" } else { "nothing" };
                text.to_string()
            } else if busy {
                format!("a delivery van arrives at frame {}", id)
            } else {
                "quiet".to_string()
            };
            Ok(answer)
        })
    }

    #[tokio::test]
    async fn test_only_significant_frames_become_events() {
        let vision = Arc::new(scripted(&[2, 4]));
        let engine = engine(vision.clone(), 1);
        let mut source = frames(5, 1.0);

        let outcome = engine.run(&mut source).await.unwrap();
        let state = &outcome.state;

        assert_eq!(state.processed_frames, 5);
        assert_eq!(state.events.len(), 3);
        let frames: Vec<u64> = state.events.iter().map(|e| e.frame_number).collect();
        assert_eq!(frames, vec![0, 2, 4]);
        assert!(state
            .events
            .windows(2)
            .all(|pair| pair[0].timestamp < pair[1].timestamp));
        assert_eq!(state.significant_changes.len(), 3);
        assert_eq!(state.phase, TimelinePhase::Done);
        assert_eq!(state.previous_scene_summary, "scene 4");

        // Frames 1 and 3 compare against the first frame's summary, frame 4
        // against frame 2's since frame 3 was discarded.
        let calls = vision.calls.lock().unwrap();
        let comparison_for = |id: u8| {
            calls
                .iter()
                .find(|(bytes, q, _)| bytes[0] == id && q.contains("Compared to the previous scene"))
                .map(|(_, q, _)| q.clone())
                .unwrap()
        };
        assert!(comparison_for(1).contains("'scene 0...'"));
        assert!(comparison_for(3).contains("'scene 2...'"));
        assert!(comparison_for(4).contains("'scene 2...'"));
    }

    #[tokio::test]
    async fn test_only_first_frame_significant() {
        let vision = Arc::new(scripted(&[]));
        let engine = engine(vision, 1);
        let mut source = frames(4, 2.0);

        let outcome = engine.run(&mut source).await.unwrap();

        assert_eq!(outcome.state.events.len(), 1);
        assert_eq!(outcome.state.processed_frames, 4);
        assert!(outcome.summary.starts_with("TIMELINE ANALYSIS (2.0s, 1 events)"));
    }

    #[tokio::test]
    async fn test_sampling_skips_frames() {
        let vision = Arc::new(scripted(&[]));
        let engine = engine(vision.clone(), 3);
        let mut source = frames(10, 10.0);

        let outcome = engine.run(&mut source).await.unwrap();

        // Frames 0, 3, 6, 9; three timeline aspects each
        assert_eq!(outcome.state.processed_frames, 4);
        assert_eq!(vision.call_count(), 12);
    }

    #[tokio::test]
    async fn test_first_frame_uses_first_frame_prompts() {
        let vision = Arc::new(scripted(&[]));
        let engine = engine(vision.clone(), 1);
        let mut source = frames(1, 1.0);

        engine.run(&mut source).await.unwrap();

        let questions = vision.questions();
        assert_eq!(questions.len(), 3);
        assert!(questions.iter().any(|q| q.contains("initial scene at the beginning")));
        assert!(!questions.iter().any(|q| q.contains("Compared to the previous scene")));
    }

    #[tokio::test]
    async fn test_source_error_aborts_run() {
        let vision = Arc::new(scripted(&[]));
        let engine = engine(vision, 1);
        let mut source = frames(2, 1.0).push_error(MediaError::invalid_video("truncated"));

        let err = engine.run(&mut source).await.unwrap_err();
        assert!(matches!(err, AnalyzerError::FrameSource(_)));
    }

    #[tokio::test]
    async fn test_failed_description_is_degraded() {
        let vision = Arc::new(FnVision::new(|_, question| {
            if question.contains("opening scene") {
                Err(InferenceError::EmptyAnswer)
            } else {
                Ok("a person stands near the door".to_string())
            }
        }));
        let engine = engine(vision, 1);
        let mut source = frames(1, 1.0);

        let outcome = engine.run(&mut source).await.unwrap();
        let event = &outcome.state.events[0];

        assert!(event.degraded);
        assert_eq!(event.description, "Error detecting changes");
        assert!((event.confidence - 0.3).abs() < 1e-9);
        assert!(!outcome.summary.contains("EVENTS:"));
    }

    #[test]
    fn test_is_significant_order() {
        let engine = engine(Arc::new(FnVision::unavailable()), 1);
        let quiet = FrameAnalysis {
            scene_summary: "porch".to_string(),
            description: AspectOutcome::answered("quiet porch with no movement at all"),
            changes: vec![],
            event_type: EventType::GeneralActivity,
            alerts: vec![],
            confidence: 0.5,
        };

        assert!(engine.is_significant(&quiet, ""));
        assert!(!engine.is_significant(&quiet, "porch"));

        let alerted = FrameAnalysis {
            alerts: vec![AlertTag::PackageDetected],
            ..quiet.clone()
        };
        assert!(engine.is_significant(&alerted, "porch"));

        let transition = FrameAnalysis {
            event_type: EventType::PersonExits,
            ..quiet.clone()
        };
        assert!(engine.is_significant(&transition, "porch"));

        let confident = FrameAnalysis {
            confidence: 0.8,
            ..quiet.clone()
        };
        assert!(engine.is_significant(&confident, "porch"));

        let at_threshold = FrameAnalysis {
            confidence: 0.7,
            ..quiet
        };
        assert!(!engine.is_significant(&at_threshold, "porch"));
    }

    fn event(seconds: f64, event_type: EventType, description: &str, alerts: Vec<AlertTag>) -> TimelineEvent {
        TimelineEvent {
            timestamp: seconds,
            time_formatted: format_clock(seconds),
            frame_number: (seconds * 30.0) as u64,
            event_type,
            description: description.to_string(),
            changes: vec![],
            alerts,
            confidence: 0.8,
            degraded: false,
        }
    }

    #[test]
    fn test_summarize_without_events() {
        let state = VideoTimelineState::new();
        assert_eq!(
            summarize(&state, 12.34),
            "Video analysis complete (12.3s) - No significant events detected"
        );
    }

    #[test]
    fn test_summarize_format() {
        let mut state = VideoTimelineState::new();
        state.record(
            event(0.0, EventType::GeneralActivity, "An empty driveway", vec![]),
            "driveway".to_string(),
        );
        state.record(
            event(
                65.0,
                EventType::VehicleArrives,
                "Compared to the previous scene: a truck arrives",
                vec![AlertTag::VehicleDetected],
            ),
            "truck".to_string(),
        );
        state.record(
            event(
                70.0,
                EventType::PersonEnters,
                "Compared to the previous scene:",
                vec![AlertTag::PersonDetected, AlertTag::VehicleDetected],
            ),
            "driver".to_string(),
        );

        assert_eq!(
            summarize(&state, 90.0),
            "TIMELINE ANALYSIS (90.0s, 3 events) | \
             EVENTS: 00:00: An empty driveway | 01:05: a truck arrives | \
             EVENT TYPES: Person Enters, Vehicle Arrives | \
             ALERTS: PERSON_DETECTED, VEHICLE_DETECTED"
        );
    }
}
