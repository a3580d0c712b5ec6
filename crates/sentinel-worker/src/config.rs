//! Analyzer configuration.

use sentinel_analysis::ScoringConfig;

/// Video timeline settings.
#[derive(Debug, Clone)]
pub struct TimelineConfig {
    /// Analyze every Nth decoded frame
    pub sample_rate: u64,
    /// Frames scoring above this are significant on confidence alone
    pub significance_threshold: f64,
    /// Answer length ceiling for timeline aspects
    pub max_answer_length: usize,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            sample_rate: 30,
            significance_threshold: 0.7,
            max_answer_length: 256,
        }
    }
}

/// Analyzer configuration.
#[derive(Debug, Clone)]
pub struct AnalyzerConfig {
    /// Answer length ceiling for image aspects
    pub image_max_length: usize,
    /// Aspect queries in flight at once against the vision service
    pub max_concurrent_queries: usize,
    pub timeline: TimelineConfig,
    pub scoring: ScoringConfig,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            image_max_length: 512,
            max_concurrent_queries: 1, // one model instance behind the service
            timeline: TimelineConfig::default(),
            scoring: ScoringConfig::default(),
        }
    }
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|s| s.trim().parse().ok())
}

impl AnalyzerConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            image_max_length: env_parse("ANALYZER_IMAGE_MAX_LENGTH")
                .unwrap_or(defaults.image_max_length),
            max_concurrent_queries: env_parse::<usize>("ANALYZER_MAX_CONCURRENT_QUERIES")
                .unwrap_or(defaults.max_concurrent_queries)
                .max(1),
            timeline: TimelineConfig {
                sample_rate: env_parse::<u64>("ANALYZER_SAMPLE_RATE")
                    .unwrap_or(defaults.timeline.sample_rate)
                    .max(1),
                significance_threshold: env_parse("ANALYZER_SIGNIFICANCE_THRESHOLD")
                    .unwrap_or(defaults.timeline.significance_threshold),
                max_answer_length: env_parse("ANALYZER_TIMELINE_MAX_LENGTH")
                    .unwrap_or(defaults.timeline.max_answer_length),
            },
            scoring: defaults.scoring,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AnalyzerConfig::default();
        assert_eq!(config.image_max_length, 512);
        assert_eq!(config.max_concurrent_queries, 1);
        assert_eq!(config.timeline.sample_rate, 30);
        assert_eq!(config.timeline.max_answer_length, 256);
        assert!((config.timeline.significance_threshold - 0.7).abs() < 1e-9);
    }

    // Single test so parallel tests never observe each other's variables.
    #[test]
    fn test_from_env_overrides_and_clamps() {
        std::env::set_var("ANALYZER_SAMPLE_RATE", "0");
        std::env::set_var("ANALYZER_SIGNIFICANCE_THRESHOLD", "0.9");
        std::env::set_var("ANALYZER_MAX_CONCURRENT_QUERIES", "not-a-number");

        let config = AnalyzerConfig::from_env();
        assert_eq!(config.timeline.sample_rate, 1);
        assert!((config.timeline.significance_threshold - 0.9).abs() < 1e-9);
        assert_eq!(config.max_concurrent_queries, 1);

        std::env::remove_var("ANALYZER_SAMPLE_RATE");
        std::env::remove_var("ANALYZER_SIGNIFICANCE_THRESHOLD");
        std::env::remove_var("ANALYZER_MAX_CONCURRENT_QUERIES");
    }
}
