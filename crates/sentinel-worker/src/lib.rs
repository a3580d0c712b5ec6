//! Security camera scene analyzer.
//!
//! This crate provides:
//! - Aspect orchestration against a vision-language service
//! - Image analysis with synthesized descriptions and alerts
//! - Video timeline analysis over sampled frames
//! - Camera context from capture paths
//! - Structured run logging and metrics

pub mod analyzer;
pub mod camera;
pub mod config;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod orchestrator;
pub mod timeline;

pub use analyzer::SceneAnalyzer;
pub use camera::AnalysisContext;
pub use config::{AnalyzerConfig, TimelineConfig};
pub use error::{AnalyzerError, AnalyzerResult};
pub use logging::AnalysisLogger;
pub use orchestrator::AspectOrchestrator;
pub use timeline::{summarize, FrameAnalysis, TimelineEngine, TimelineOutcome};
