//! Callback → future bridge
//!
//! Some inference engines report through a completion handler instead of
//! returning a future. The bridge issues the request and awaits a oneshot
//! that the handler resolves exactly once. There is no cancellation.

use async_trait::async_trait;
use image::DynamicImage;
use tokio::sync::oneshot;
use tracing::debug;

use super::{ClassifierError, DentalClassifier};
use crate::scan::RawObservation;

/// Completion handler passed to a callback-style engine. Must be called at
/// most once; dropping it unresolved counts as an inference failure.
pub type Completion = Box<dyn FnOnce(Result<Vec<RawObservation>, ClassifierError>) + Send + 'static>;

pub trait CallbackClassifier: Send + Sync {
    /// Start classification. The engine may call `on_complete` inline or
    /// from any thread.
    fn submit(&self, image: DynamicImage, on_complete: Completion);
}

pub struct CallbackBridge<C> {
    engine: C,
}

impl<C: CallbackClassifier> CallbackBridge<C> {
    pub fn new(engine: C) -> Self {
        Self { engine }
    }
}

#[async_trait]
impl<C: CallbackClassifier> DentalClassifier for CallbackBridge<C> {
    async fn classify(&self, image: &DynamicImage) -> Result<Vec<RawObservation>, ClassifierError> {
        let (tx, rx) = oneshot::channel();

        self.engine.submit(
            image.clone(),
            Box::new(move |result| {
                // Receiver only goes away if the awaiting task was dropped.
                let _ = tx.send(result);
            }),
        );

        match rx.await {
            Ok(result) => result,
            Err(_) => {
                debug!("Completion handler dropped without resolving");
                Err(ClassifierError::InferenceFailure(
                    "completion handler dropped without a result".to_string(),
                ))
            }
        }
    }
}
