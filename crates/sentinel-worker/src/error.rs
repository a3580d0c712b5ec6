//! Analyzer error types.

use thiserror::Error;

use sentinel_media::MediaError;
use sentinel_vlm::InferenceError;

pub type AnalyzerResult<T> = Result<T, AnalyzerError>;

/// Errors inside an analysis run.
///
/// None of these escape `analyze_image` / `analyze_video`; they are turned
/// into the failure shape of the result there.
#[derive(Debug, Error)]
pub enum AnalyzerError {
    /// The frame source could not be opened or read; fatal to a video run.
    #[error("Frame source error: {0}")]
    FrameSource(#[source] MediaError),

    #[error("Media error: {0}")]
    Media(#[from] MediaError),

    #[error("Inference error: {0}")]
    Inference(#[from] InferenceError),

    #[error("Malformed input: {0}")]
    MalformedInput(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl AnalyzerError {
    pub fn frame_source(error: MediaError) -> Self {
        Self::FrameSource(error)
    }

    pub fn malformed_input(msg: impl Into<String>) -> Self {
        Self::MalformedInput(msg.into())
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Short machine-readable kind for logs and metrics labels.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::FrameSource(_) => "frame_source",
            Self::Media(_) => "media",
            Self::Inference(_) => "inference",
            Self::MalformedInput(_) => "malformed_input",
            Self::Config(_) => "config",
        }
    }
}
