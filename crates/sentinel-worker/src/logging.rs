//! Structured analysis logging.
//!
//! Every image or video run gets an [`AnalysisLogger`] carrying a run id and
//! the operation, so all lifecycle lines of one run can be correlated.

use tracing::{error, info, warn, Span};
use uuid::Uuid;

/// Run logger with consistent contextual fields.
#[derive(Debug, Clone)]
pub struct AnalysisLogger {
    run_id: String,
    operation: String,
}

impl AnalysisLogger {
    /// Create a logger with a fresh run id.
    ///
    /// # Arguments
    /// * `operation` - The kind of run (e.g., "image_analysis", "video_timeline")
    pub fn new(operation: &str) -> Self {
        Self::with_run_id(&Uuid::new_v4().to_string(), operation)
    }

    pub fn with_run_id(run_id: &str, operation: &str) -> Self {
        Self {
            run_id: run_id.to_string(),
            operation: operation.to_string(),
        }
    }

    pub fn log_start(&self, message: &str) {
        info!(
            run_id = %self.run_id,
            operation = %self.operation,
            "Analysis started: {}", message
        );
    }

    pub fn log_progress(&self, message: &str) {
        info!(
            run_id = %self.run_id,
            operation = %self.operation,
            "Analysis progress: {}", message
        );
    }

    pub fn log_warning(&self, message: &str) {
        warn!(
            run_id = %self.run_id,
            operation = %self.operation,
            "Analysis warning: {}", message
        );
    }

    pub fn log_error(&self, message: &str) {
        error!(
            run_id = %self.run_id,
            operation = %self.operation,
            "Analysis error: {}", message
        );
    }

    pub fn log_completion(&self, message: &str) {
        info!(
            run_id = %self.run_id,
            operation = %self.operation,
            "Analysis completed: {}", message
        );
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    pub fn operation(&self) -> &str {
        &self.operation
    }

    /// Tracing span for this run.
    pub fn create_span(&self) -> Span {
        tracing::info_span!(
            "analysis",
            run_id = %self.run_id,
            operation = %self.operation
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logger_generates_unique_run_ids() {
        let a = AnalysisLogger::new("image_analysis");
        let b = AnalysisLogger::new("image_analysis");

        assert_ne!(a.run_id(), b.run_id());
        assert!(Uuid::parse_str(a.run_id()).is_ok());
        assert_eq!(a.operation(), "image_analysis");
    }

    #[test]
    fn test_logger_with_run_id() {
        let logger = AnalysisLogger::with_run_id("run-42", "video_timeline");
        assert_eq!(logger.run_id(), "run-42");
        assert_eq!(logger.operation(), "video_timeline");
    }
}
