//! Shared data models for the Sentinel scene analysis workspace.
//!
//! This crate provides the types shared by every other crate:
//! - Aspects, prompt sets and per-aspect outcomes
//! - Alert tags
//! - Timeline events and per-video timeline state
//! - Identification details
//! - Encoded image payloads
//! - Image and video analysis results

pub mod alert;
pub mod aspect;
pub mod identification;
pub mod image;
pub mod result;
pub mod timeline;

// Re-export common types
pub use alert::AlertTag;
pub use aspect::{AspectOutcome, AspectResult, PromptSet};
pub use identification::{IdentificationDetails, PersonDetails, VehicleDetails};
pub use image::ImageData;
pub use result::{ImageAnalysisResult, VideoAnalysisResult};
pub use timeline::{format_clock, EventType, TimelineEvent, TimelinePhase, VideoTimelineState};
