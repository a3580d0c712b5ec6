//! Analyzer metrics.
//!
//! Counters and histograms for aspect queries, timeline frames and whole
//! runs. Recording is a no-op until the binary installs a recorder.

use metrics::{counter, histogram};

/// Metric name constants for consistency.
pub mod names {
    /// Aspect queries by aspect and status.
    pub const ASPECT_QUERIES_TOTAL: &str = "sentinel_aspect_queries_total";

    /// Failed aspect queries by aspect.
    pub const ASPECT_FAILURES_TOTAL: &str = "sentinel_aspect_failures_total";

    /// Sampled frames analyzed, by significance.
    pub const FRAMES_ANALYZED_TOTAL: &str = "sentinel_frames_analyzed_total";

    /// Timeline events recorded.
    pub const TIMELINE_EVENTS_TOTAL: &str = "sentinel_timeline_events_total";

    /// Whole-run duration in seconds by kind and outcome.
    pub const ANALYSIS_DURATION_SECONDS: &str = "sentinel_analysis_duration_seconds";
}

/// Record one aspect query.
pub fn record_aspect_query(aspect: &str, success: bool) {
    let status = if success { "ok" } else { "failed" };
    counter!(
        names::ASPECT_QUERIES_TOTAL,
        "aspect" => aspect.to_string(),
        "status" => status
    )
    .increment(1);

    if !success {
        counter!(names::ASPECT_FAILURES_TOTAL, "aspect" => aspect.to_string()).increment(1);
    }
}

/// Record one analyzed timeline frame.
pub fn record_frame(significant: bool) {
    counter!(
        names::FRAMES_ANALYZED_TOTAL,
        "significant" => if significant { "true" } else { "false" }
    )
    .increment(1);

    if significant {
        counter!(names::TIMELINE_EVENTS_TOTAL).increment(1);
    }
}

/// Record a finished image or video run.
pub fn record_analysis(kind: &'static str, success: bool, seconds: f64) {
    histogram!(
        names::ANALYSIS_DURATION_SECONDS,
        "kind" => kind,
        "success" => if success { "true" } else { "false" }
    )
    .record(seconds);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_names() {
        assert!(names::ASPECT_QUERIES_TOTAL.starts_with("sentinel_"));
        assert!(names::ASPECT_FAILURES_TOTAL.contains("failures"));
        assert!(names::FRAMES_ANALYZED_TOTAL.contains("frames"));
        assert!(names::ANALYSIS_DURATION_SECONDS.ends_with("_seconds"));
    }

    #[test]
    fn test_recording_without_recorder_is_noop() {
        record_aspect_query("general", false);
        record_frame(true);
        record_analysis("image", true, 0.5);
    }
}
