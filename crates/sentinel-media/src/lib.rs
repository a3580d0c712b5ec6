//! Media boundary for scene analysis.
//!
//! This crate provides:
//! - Snapshot loading with dimensions and format checks
//! - FFprobe video inspection
//! - The [`FrameSource`] trait with FFmpeg and in-memory implementations

pub mod command;
pub mod error;
pub mod frames;
pub mod probe;
pub mod snapshot;

pub use command::{check_ffmpeg, check_ffprobe};
pub use error::{FrameSourceError, FrameSourceResult, MediaError, MediaResult};
pub use frames::{FfmpegFrameSource, Frame, FrameSource, MemoryFrameSource};
pub use probe::{probe_video, VideoInfo};
pub use snapshot::{load_image, LoadedImage};
