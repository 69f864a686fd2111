//! Classifier Adapters
//!
//! The model itself lives outside this crate. Adapters hand it a decoded
//! image and return its ranked `(label, score)` observations.

pub mod bridge;
pub mod http;

pub use bridge::{CallbackBridge, CallbackClassifier, Completion};
pub use http::HttpClassifier;

use async_trait::async_trait;
use image::DynamicImage;
use thiserror::Error;

use crate::scan::RawObservation;

/// Failures an adapter may report. None of these reach the scan caller.
#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("the dental classification model is not available")]
    ModelUnavailable,
    #[error("inference failed: {0}")]
    InferenceFailure(String),
    #[error("classifier returned malformed results: {0}")]
    InvalidResults(String),
}

#[async_trait]
pub trait DentalClassifier: Send + Sync {
    /// Score an image. Observations come back in the model's ranking order.
    async fn classify(&self, image: &DynamicImage) -> Result<Vec<RawObservation>, ClassifierError>;
}

/// Stand-in used when no model is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableClassifier;

#[async_trait]
impl DentalClassifier for UnavailableClassifier {
    async fn classify(&self, _image: &DynamicImage) -> Result<Vec<RawObservation>, ClassifierError> {
        Err(ClassifierError::ModelUnavailable)
    }
}
