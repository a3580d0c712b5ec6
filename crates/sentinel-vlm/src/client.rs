//! HTTP client for the vision-language query service.
//!
//! The service answers one natural-language question about one image:
//! `POST {base_url}/ask` with `{image, mime_type, question, max_length}`
//! returns `{answer}`. The image travels base64-encoded.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use reqwest::Client;
use sentinel_models::ImageData;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{InferenceError, InferenceResult};

/// Default service address.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// A vision-language query service.
///
/// Implementations must be safe to share across tasks. A failing call
/// affects only the question that produced it.
#[async_trait]
pub trait VisionQuery: Send + Sync {
    /// Ask one question about an image, returning the raw answer text.
    async fn ask(
        &self,
        image: &ImageData,
        question: &str,
        max_answer_length: usize,
    ) -> InferenceResult<String>;

    /// Service name for logging.
    fn name(&self) -> &'static str;
}

#[async_trait]
impl<T: VisionQuery + ?Sized> VisionQuery for Arc<T> {
    async fn ask(
        &self,
        image: &ImageData,
        question: &str,
        max_answer_length: usize,
    ) -> InferenceResult<String> {
        (**self).ask(image, question, max_answer_length).await
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}

/// Connection settings for [`HttpVisionClient`].
#[derive(Debug, Clone)]
pub struct VisionClientConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for VisionClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl VisionClientConfig {
    /// Load from `VLM_BASE_URL` and `VLM_TIMEOUT_SECS`, with defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            base_url: std::env::var("VLM_BASE_URL")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .unwrap_or(defaults.base_url),
            timeout: std::env::var("VLM_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.timeout),
        }
    }
}

#[derive(Debug, Serialize)]
struct AskRequest<'a> {
    image: String,
    mime_type: &'a str,
    question: &'a str,
    max_length: usize,
}

#[derive(Debug, Deserialize)]
struct AskResponse {
    answer: String,
}

/// [`VisionQuery`] over HTTP.
#[derive(Debug, Clone)]
pub struct HttpVisionClient {
    client: Client,
    ask_url: String,
}

impl HttpVisionClient {
    pub fn new(config: VisionClientConfig) -> InferenceResult<Self> {
        let base_url = config.base_url.trim_end_matches('/');
        if base_url.is_empty() {
            return Err(InferenceError::config_error("vision service base URL is empty"));
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| InferenceError::config_error(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            ask_url: format!("{}/ask", base_url),
        })
    }

    /// Create a client from `VLM_*` environment variables.
    pub fn from_env() -> InferenceResult<Self> {
        Self::new(VisionClientConfig::from_env())
    }
}

#[async_trait]
impl VisionQuery for HttpVisionClient {
    async fn ask(
        &self,
        image: &ImageData,
        question: &str,
        max_answer_length: usize,
    ) -> InferenceResult<String> {
        let request = AskRequest {
            image: BASE64.encode(&image.bytes),
            mime_type: &image.mime_type,
            question,
            max_length: max_answer_length,
        };

        let response = self
            .client
            .post(&self.ask_url)
            .json(&request)
            .send()
            .await
            .map_err(|e| InferenceError::request(format!("Vision service request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(InferenceError::Status { status, body });
        }

        let body: AskResponse = response
            .json()
            .await
            .map_err(|e| InferenceError::decode(format!("Failed to parse vision response: {}", e)))?;

        let answer = body.answer.trim();
        if answer.is_empty() {
            return Err(InferenceError::EmptyAnswer);
        }

        debug!(
            question_len = question.len(),
            answer_len = answer.len(),
            "Vision service answered"
        );

        Ok(answer.to_string())
    }

    fn name(&self) -> &'static str {
        "http"
    }
}
