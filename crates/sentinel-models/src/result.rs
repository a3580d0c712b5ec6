//! Result shapes returned by the image and video entry points.
//!
//! Both entry points always return a value. Failures are reported through
//! `success = false` plus an `error` message, never by propagating.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::alert::AlertTag;
use crate::aspect::AspectResult;
use crate::identification::IdentificationDetails;
use crate::timeline::TimelineEvent;

/// Description used when image analysis fails as a whole.
pub const IMAGE_FAILURE_DESCRIPTION: &str = "Error processing image";

/// Description used when video analysis fails as a whole.
pub const VIDEO_FAILURE_DESCRIPTION: &str = "Error processing video";

/// Result of analyzing a single image.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ImageAnalysisResult {
    pub success: bool,

    /// Comprehensive description, or the failure sentence
    pub description: String,

    /// Confidence score (0.0-1.0)
    pub confidence: f64,

    pub camera_name: String,

    pub width: u32,
    pub height: u32,

    /// Processing time in seconds
    pub processing_time: f64,

    /// Per-aspect outcomes, empty on failure
    pub detailed_analysis: AspectResult,

    /// Alert tags in detection order
    pub alert_summary: Vec<AlertTag>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub identification: Option<IdentificationDetails>,

    pub analyzed_at: DateTime<Utc>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ImageAnalysisResult {
    /// Failure shape: zero confidence, no analysis, no alerts.
    pub fn failure(camera_name: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            success: false,
            description: IMAGE_FAILURE_DESCRIPTION.to_string(),
            confidence: 0.0,
            camera_name: camera_name.into(),
            width: 0,
            height: 0,
            processing_time: 0.0,
            detailed_analysis: AspectResult::new(),
            alert_summary: Vec::new(),
            identification: None,
            analyzed_at: Utc::now(),
            error: Some(error.into()),
        }
    }
}

/// Result of analyzing a video.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct VideoAnalysisResult {
    pub success: bool,

    /// Narrative timeline summary, or the failure sentence
    pub description: String,

    /// Average confidence over recorded events
    pub confidence: f64,

    pub camera_name: String,

    pub width: u32,
    pub height: u32,

    /// Duration in seconds
    pub duration: f64,

    /// Total decoded frames reported by the source
    pub frame_count: u64,

    /// Sampled frames that were analyzed
    pub processed_frames: u64,

    /// Processing time in seconds
    pub processing_time: f64,

    pub timeline_events: Vec<TimelineEvent>,

    /// Distinct alerts across the video, sorted
    pub video_alerts: Vec<AlertTag>,

    /// Change lists of the recorded events
    pub significant_changes: Vec<Vec<String>>,

    pub analyzed_at: DateTime<Utc>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl VideoAnalysisResult {
    /// Failure shape: zeroed counters and empty collections.
    pub fn failure(camera_name: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            success: false,
            description: VIDEO_FAILURE_DESCRIPTION.to_string(),
            confidence: 0.0,
            camera_name: camera_name.into(),
            width: 0,
            height: 0,
            duration: 0.0,
            frame_count: 0,
            processed_frames: 0,
            processing_time: 0.0,
            timeline_events: Vec::new(),
            video_alerts: Vec::new(),
            significant_changes: Vec::new(),
            analyzed_at: Utc::now(),
            error: Some(error.into()),
        }
    }
}
