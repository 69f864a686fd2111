//! Classification Orchestrator
//!
//! Drives one scan from raw bytes to a finished [`ScanResult`]:
//! decode → classify → map → fallback. Only a decode failure escapes;
//! classifier errors fall through to the default findings.

use anyhow::Result;
use image::GenericImageView;
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tokio::task;
use tracing::{debug, info, warn};

use crate::classifier::DentalClassifier;
use crate::scan::{ConditionMapper, FallbackPolicy, ScanResult};
use crate::store::ScanRecordStore;

#[derive(Debug, Error)]
pub enum ScanError {
    /// The bytes are not a readable image. No record may be created.
    #[error("image could not be decoded: {0}")]
    ImageDecode(String),
}

pub struct ClassificationOrchestrator {
    classifier: Arc<dyn DentalClassifier>,
    mapper: ConditionMapper,
    fallback: FallbackPolicy,
}

impl ClassificationOrchestrator {
    pub fn new(classifier: Arc<dyn DentalClassifier>) -> Self {
        Self {
            classifier,
            mapper: ConditionMapper::default(),
            fallback: FallbackPolicy::new(),
        }
    }

    /// Classify one captured image.
    ///
    /// The returned scan always has at least one condition and always keeps
    /// `image_bytes`.
    pub async fn run(&self, image_bytes: Vec<u8>) -> Result<ScanResult, ScanError> {
        let started = Instant::now();

        if image_bytes.is_empty() {
            return Err(ScanError::ImageDecode("empty image data".to_string()));
        }

        let (image_bytes, decoded) = task::spawn_blocking(move || {
            let decoded = image::load_from_memory(&image_bytes);
            (image_bytes, decoded)
        })
        .await
        .map_err(|e| ScanError::ImageDecode(format!("decoder task aborted: {e}")))?;

        let image = decoded.map_err(|e| {
            warn!("Rejecting capture: {}", e);
            ScanError::ImageDecode(e.to_string())
        })?;
        debug!("Decoded {}x{} image ({} bytes)", image.width(), image.height(), image_bytes.len());

        let conditions = match self.classifier.classify(&image).await {
            Ok(observations) => {
                debug!("Classifier returned {} observations", observations.len());
                self.fallback.apply(self.mapper.map(&observations))
            }
            Err(e) => {
                warn!("Classifier failed, using default findings: {}", e);
                self.fallback.default_set()
            }
        };

        let scan = ScanResult::new(conditions, Some(image_bytes));
        info!(
            "Scan {} finished with {} conditions in {:?}",
            scan.id(),
            scan.conditions().len(),
            started.elapsed()
        );
        Ok(scan)
    }

    /// Classify and persist. Nothing is written when decoding fails.
    pub async fn run_and_record(&self, image_bytes: Vec<u8>, store: &dyn ScanRecordStore) -> Result<ScanResult> {
        let scan = self.run(image_bytes).await?;
        store.insert(scan.clone()).await?;
        Ok(scan)
    }
}
