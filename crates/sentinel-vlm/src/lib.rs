//! Vision-language query service boundary.
//!
//! [`VisionQuery`] is the seam the analyzer talks to; [`HttpVisionClient`]
//! is the production implementation.

pub mod client;
pub mod error;

pub use client::{HttpVisionClient, VisionClientConfig, VisionQuery};
pub use error::{InferenceError, InferenceResult};
