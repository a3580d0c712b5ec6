//! Image and video entry points.
//!
//! [`SceneAnalyzer::analyze_image`] and [`SceneAnalyzer::analyze_video`]
//! always return a result; any failure inside a run is logged and turned
//! into the result's failure shape.

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use sentinel_analysis::{extract_identification, get_analysis_prompts, synthesize_with};
use sentinel_media::{load_image, FfmpegFrameSource, FrameSource};
use sentinel_models::{AspectResult, ImageAnalysisResult, TimelineEvent, VideoAnalysisResult};
use sentinel_vlm::{HttpVisionClient, VisionQuery};
use tracing::Instrument;

use crate::camera::AnalysisContext;
use crate::config::AnalyzerConfig;
use crate::error::AnalyzerResult;
use crate::logging::AnalysisLogger;
use crate::metrics;
use crate::orchestrator::AspectOrchestrator;
use crate::timeline::TimelineEngine;

/// Analyzes snapshots and recordings against a vision service.
#[derive(Debug, Clone)]
pub struct SceneAnalyzer {
    orchestrator: AspectOrchestrator,
    timeline: TimelineEngine,
    config: AnalyzerConfig,
}

impl SceneAnalyzer {
    pub fn new(vision: Arc<dyn VisionQuery>, config: AnalyzerConfig) -> Self {
        let orchestrator = AspectOrchestrator::with_concurrency(vision, config.max_concurrent_queries);
        let timeline = TimelineEngine::new(
            orchestrator.clone(),
            config.timeline.clone(),
            config.scoring.clone(),
        );
        Self {
            orchestrator,
            timeline,
            config,
        }
    }

    /// Analyzer over the HTTP vision service, configured from the environment.
    pub fn from_env() -> AnalyzerResult<Self> {
        let client = HttpVisionClient::from_env()?;
        Ok(Self::new(Arc::new(client), AnalyzerConfig::from_env()))
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Analyze one still image.
    ///
    /// Camera context is derived from the path when `context` is `None`.
    pub async fn analyze_image(
        &self,
        path: impl AsRef<Path>,
        context: Option<&AnalysisContext>,
    ) -> ImageAnalysisResult {
        let path = path.as_ref();
        let context = match context {
            Some(context) => context.clone(),
            None => AnalysisContext::from_path(path),
        };
        let logger = AnalysisLogger::new("image_analysis");
        let span = logger.create_span();

        async {
            logger.log_start(&format!("{} ({})", path.display(), context.camera_name));
            let started = Instant::now();

            let result = match self.run_image(path, &context, started).await {
                Ok(result) => {
                    if let Some(message) = failed_aspects_message(&result.detailed_analysis) {
                        logger.log_warning(&message);
                    }
                    logger.log_completion(&format!(
                        "{} aspects answered, confidence {:.2}, {:.2}s",
                        result.detailed_analysis.successful_count(),
                        result.confidence,
                        result.processing_time
                    ));
                    result
                }
                Err(e) => {
                    logger.log_error(&format!("{} ({})", e, e.kind()));
                    ImageAnalysisResult::failure(context.camera_name.clone(), e.to_string())
                }
            };

            metrics::record_analysis("image", result.success, started.elapsed().as_secs_f64());
            result
        }
        .instrument(span)
        .await
    }

    async fn run_image(
        &self,
        path: &Path,
        context: &AnalysisContext,
        started: Instant,
    ) -> AnalyzerResult<ImageAnalysisResult> {
        let image = load_image(path).await?;

        let prompts = get_analysis_prompts(
            context.location.as_deref(),
            context.time_period.as_deref(),
            context.alert_type.as_deref(),
        );
        let results = self
            .orchestrator
            .analyze(&image.data, &prompts, self.config.image_max_length)
            .await;

        let synthesis = synthesize_with(&results, &self.config.scoring);
        let identification = extract_identification(&results);

        Ok(ImageAnalysisResult {
            success: true,
            description: synthesis.description,
            confidence: synthesis.confidence,
            camera_name: context.camera_name.clone(),
            width: image.width,
            height: image.height,
            processing_time: started.elapsed().as_secs_f64(),
            detailed_analysis: results,
            alert_summary: synthesis.alerts,
            identification,
            analyzed_at: Utc::now(),
            error: None,
        })
    }

    /// Analyze a recording, sampling frames with FFmpeg.
    pub async fn analyze_video(&self, path: impl AsRef<Path>) -> VideoAnalysisResult {
        let path = path.as_ref();
        let camera_name = AnalysisContext::from_path(path).camera_name;

        match FfmpegFrameSource::open(path, self.config.timeline.sample_rate).await {
            Ok(mut source) => self.analyze_frames(&mut source, &camera_name).await,
            Err(e) => {
                let logger = AnalysisLogger::new("video_timeline");
                logger.log_error(&format!("Could not open {}: {}", path.display(), e));
                metrics::record_analysis("video", false, 0.0);
                VideoAnalysisResult::failure(camera_name, e.to_string())
            }
        }
    }

    /// Build the timeline of any frame source.
    pub async fn analyze_frames(
        &self,
        source: &mut dyn FrameSource,
        camera_name: &str,
    ) -> VideoAnalysisResult {
        let logger = AnalysisLogger::new("video_timeline");
        let span = logger.create_span();

        async {
            let info = source.info().clone();
            logger.log_start(&format!(
                "{}: {} frames at {:.1} fps, {}x{}, every {} frames",
                camera_name,
                info.frame_count,
                info.fps,
                info.width,
                info.height,
                self.timeline.config().sample_rate
            ));
            let started = Instant::now();

            let result = match self.timeline.run(&mut *source).await {
                Ok(outcome) => {
                    let state = outcome.state;
                    for event in &state.events {
                        logger.log_progress(&event_message(event));
                    }
                    let result = VideoAnalysisResult {
                        success: true,
                        description: outcome.summary,
                        confidence: outcome.confidence,
                        camera_name: camera_name.to_string(),
                        width: info.width,
                        height: info.height,
                        duration: info.duration,
                        frame_count: info.frame_count,
                        processed_frames: state.processed_frames,
                        processing_time: started.elapsed().as_secs_f64(),
                        timeline_events: state.events,
                        video_alerts: state.all_alerts.into_iter().collect(),
                        significant_changes: state.significant_changes,
                        analyzed_at: Utc::now(),
                        error: None,
                    };
                    logger.log_completion(&format!(
                        "{} events from {} sampled frames in {:.2}s",
                        result.timeline_events.len(),
                        result.processed_frames,
                        result.processing_time
                    ));
                    result
                }
                Err(e) => {
                    logger.log_error(&format!("{} ({})", e, e.kind()));
                    VideoAnalysisResult::failure(camera_name, e.to_string())
                }
            };

            metrics::record_analysis("video", result.success, started.elapsed().as_secs_f64());
            result
        }
        .instrument(span)
        .await
    }
}

/// Warning line for a run where some aspects got no answer.
fn failed_aspects_message(results: &AspectResult) -> Option<String> {
    let failed: Vec<&str> = results
        .iter()
        .filter(|(_, outcome)| outcome.is_failed())
        .map(|(aspect, _)| aspect)
        .collect();
    if failed.is_empty() {
        return None;
    }
    Some(format!(
        "{} of {} aspects failed: {}",
        failed.len(),
        results.len(),
        failed.join(", ")
    ))
}

fn event_message(event: &TimelineEvent) -> String {
    let mut message = format!(
        "{} {}: {}",
        event.time_formatted,
        event.event_type.as_str(),
        event.description
    );
    if event.degraded {
        message.push_str(" (degraded)");
    }
    message
}
