//! Aspect analysis orchestrator.
//!
//! Asks the vision service one question per aspect and collects the answers.
//! A failed question is recorded as a failed outcome for that aspect only.

use std::sync::Arc;

use futures::stream::{self, StreamExt};
use sentinel_models::{AspectOutcome, AspectResult, ImageData, PromptSet};
use sentinel_vlm::VisionQuery;
use tracing::{debug, warn};

use crate::metrics;

/// Fans a prompt set out to a [`VisionQuery`] service.
#[derive(Clone)]
pub struct AspectOrchestrator {
    vision: Arc<dyn VisionQuery>,
    max_concurrent: usize,
}

impl AspectOrchestrator {
    /// Sequential orchestrator.
    pub fn new(vision: Arc<dyn VisionQuery>) -> Self {
        Self::with_concurrency(vision, 1)
    }

    pub fn with_concurrency(vision: Arc<dyn VisionQuery>, max_concurrent: usize) -> Self {
        Self {
            vision,
            max_concurrent: max_concurrent.max(1),
        }
    }

    pub fn vision_name(&self) -> &'static str {
        self.vision.name()
    }

    /// Query every aspect of `prompts` against `image`.
    ///
    /// Exactly one call per aspect, no retries. The result lists aspects in
    /// prompt-set order whatever the concurrency.
    pub async fn analyze(
        &self,
        image: &ImageData,
        prompts: &PromptSet,
        max_answer_length: usize,
    ) -> AspectResult {
        let outcomes: Vec<(String, AspectOutcome)> = stream::iter(prompts.iter())
            .map(|(aspect, prompt)| async move {
                let outcome = self.query(image, aspect, prompt, max_answer_length).await;
                (aspect.to_string(), outcome)
            })
            .buffered(self.max_concurrent)
            .collect()
            .await;

        let results: AspectResult = outcomes.into_iter().collect();
        debug!(
            service = self.vision.name(),
            aspects = results.len(),
            failed = results.failed_count(),
            "Aspect analysis finished"
        );
        results
    }

    async fn query(
        &self,
        image: &ImageData,
        aspect: &str,
        prompt: &str,
        max_answer_length: usize,
    ) -> AspectOutcome {
        match self.vision.ask(image, prompt, max_answer_length).await {
            Ok(answer) => {
                metrics::record_aspect_query(aspect, true);
                AspectOutcome::answered(answer.trim())
            }
            Err(e) => {
                warn!(
                    aspect,
                    error = %e,
                    unavailable = e.is_unavailable(),
                    "Aspect query failed"
                );
                metrics::record_aspect_query(aspect, false);
                AspectOutcome::failed(aspect, e.to_string())
            }
        }
    }
}

impl std::fmt::Debug for AspectOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AspectOrchestrator")
            .field("vision", &self.vision.name())
            .field("max_concurrent", &self.max_concurrent)
            .finish()
    }
}

/// Scripted vision services for tests.
#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use sentinel_models::ImageData;
    use sentinel_vlm::{InferenceError, InferenceResult, VisionQuery};

    type Responder = dyn Fn(&ImageData, &str) -> InferenceResult<String> + Send + Sync;

    /// Answers with a closure and records every question asked.
    pub struct FnVision {
        responder: Box<Responder>,
        pub calls: Mutex<Vec<(Vec<u8>, String, usize)>>,
    }

    impl FnVision {
        pub fn new(
            responder: impl Fn(&ImageData, &str) -> InferenceResult<String> + Send + Sync + 'static,
        ) -> Self {
            Self {
                responder: Box::new(responder),
                calls: Mutex::new(Vec::new()),
            }
        }

        /// Always fails as if the service were down.
        pub fn unavailable() -> Self {
            Self::new(|_, _| {
                Err(InferenceError::Status {
                    status: 503,
                    body: "unavailable".to_string(),
                })
            })
        }

        pub fn questions(&self) -> Vec<String> {
            self.calls
                .lock()
                .unwrap()
                .iter()
                .map(|(_, question, _)| question.clone())
                .collect()
        }

        pub fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl VisionQuery for FnVision {
        async fn ask(
            &self,
            image: &ImageData,
            question: &str,
            max_answer_length: usize,
        ) -> InferenceResult<String> {
            self.calls.lock().unwrap().push((
                image.bytes.clone(),
                question.to_string(),
                max_answer_length,
            ));
            (self.responder)(image, question)
        }

        fn name(&self) -> &'static str {
            "scripted"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::FnVision;
    use super::*;
    use sentinel_models::aspect;
    use sentinel_vlm::InferenceError;

    fn prompts() -> PromptSet {
        [
            (aspect::GENERAL, "Question: What is happening? Answer:"),
            (aspect::SECURITY, "Question: Anything suspicious? Answer:"),
            (aspect::OBJECTS, "Question: What objects? Answer:"),
        ]
        .into_iter()
        .collect()
    }

    #[tokio::test]
    async fn test_one_failure_does_not_abort_the_others() {
        let vision = Arc::new(FnVision::new(|_, question| {
            if question.contains("suspicious") {
                Err(InferenceError::request("connection reset"))
            } else {
                Ok(format!("  answer to {}  ", question.len()))
            }
        }));
        let orchestrator = AspectOrchestrator::new(vision.clone());

        let results = orchestrator
            .analyze(&ImageData::jpeg(vec![1]), &prompts(), 512)
            .await;

        assert_eq!(results.len(), 3);
        assert_eq!(results.successful_count(), 2);
        assert_eq!(results.failed_count(), 1);

        let security = results.get(aspect::SECURITY).unwrap();
        assert!(security.is_failed());
        assert_eq!(security.display_text(), "Error analyzing security aspects");
        assert!(results.text(aspect::GENERAL).unwrap().starts_with("answer to"));
        assert!(!results.text(aspect::GENERAL).unwrap().ends_with(' '));
    }

    #[tokio::test]
    async fn test_one_call_per_aspect_with_length_ceiling() {
        let vision = Arc::new(FnVision::new(|_, _| Ok("fine".to_string())));
        let orchestrator = AspectOrchestrator::new(vision.clone());

        orchestrator
            .analyze(&ImageData::jpeg(vec![7]), &prompts(), 256)
            .await;

        let calls = vision.calls.lock().unwrap();
        assert_eq!(calls.len(), 3);
        assert!(calls.iter().all(|(bytes, _, max)| bytes == &[7] && *max == 256));
    }

    #[tokio::test]
    async fn test_order_preserved_with_concurrency() {
        let vision = Arc::new(FnVision::new(|_, question| Ok(question.to_string())));
        let orchestrator = AspectOrchestrator::with_concurrency(vision, 3);

        let results = orchestrator
            .analyze(&ImageData::jpeg(vec![0]), &prompts(), 512)
            .await;

        let aspects: Vec<&str> = results.iter().map(|(aspect, _)| aspect).collect();
        assert_eq!(aspects, vec![aspect::GENERAL, aspect::SECURITY, aspect::OBJECTS]);
    }

    #[tokio::test]
    async fn test_unavailable_service_fails_every_aspect() {
        let orchestrator = AspectOrchestrator::new(Arc::new(FnVision::unavailable()));

        let results = orchestrator
            .analyze(&ImageData::jpeg(vec![0]), &prompts(), 512)
            .await;

        assert_eq!(results.failed_count(), 3);
        assert_eq!(results.successful_count(), 0);
    }

    #[tokio::test]
    async fn test_empty_prompt_set() {
        let vision = Arc::new(FnVision::new(|_, _| Ok("x".to_string())));
        let orchestrator = AspectOrchestrator::new(vision.clone());

        let results = orchestrator
            .analyze(&ImageData::jpeg(vec![0]), &PromptSet::new(), 512)
            .await;
        assert!(results.is_empty());
        assert_eq!(vision.call_count(), 0);
    }
}
