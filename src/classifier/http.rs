//! Remote inference endpoint adapter
//!
//! Posts the image as base64 PNG and reads back ranked observations.

use async_trait::async_trait;
use base64::Engine;
use image::{DynamicImage, ImageFormat};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::json;
use std::io::Cursor;
use std::time::Duration;
use tracing::debug;

use super::{ClassifierError, DentalClassifier};
use crate::scan::RawObservation;

/// Either a bare list or `{"predictions": [...]}`.
#[derive(Deserialize)]
#[serde(untagged)]
enum ClassifierResponse {
    List(Vec<RawObservation>),
    Wrapped { predictions: Vec<RawObservation> },
}

pub struct HttpClassifier {
    client: Client,
    endpoint: Option<String>,
}

impl HttpClassifier {
    pub fn new(endpoint: Option<String>, timeout: Duration) -> Result<Self, ClassifierError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClassifierError::InferenceFailure(format!("http client setup: {e}")))?;
        Ok(Self { client, endpoint })
    }
}

pub(crate) fn encode_png(image: &DynamicImage) -> Result<Vec<u8>, ClassifierError> {
    let mut buffer = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)
        .map_err(|e| ClassifierError::InferenceFailure(format!("png encode: {e}")))?;
    Ok(buffer)
}

pub(crate) fn parse_response(body: &str) -> Result<Vec<RawObservation>, ClassifierError> {
    let parsed: ClassifierResponse =
        serde_json::from_str(body).map_err(|e| ClassifierError::InvalidResults(e.to_string()))?;
    Ok(match parsed {
        ClassifierResponse::List(list) => list,
        ClassifierResponse::Wrapped { predictions } => predictions,
    })
}

#[async_trait]
impl DentalClassifier for HttpClassifier {
    async fn classify(&self, image: &DynamicImage) -> Result<Vec<RawObservation>, ClassifierError> {
        let endpoint = self.endpoint.as_deref().ok_or(ClassifierError::ModelUnavailable)?;

        let owned = image.clone();
        let png = tokio::task::spawn_blocking(move || encode_png(&owned))
            .await
            .map_err(|e| ClassifierError::InferenceFailure(format!("encode task: {e}")))??;

        let body = json!({
            "image": base64::engine::general_purpose::STANDARD.encode(&png),
        });

        debug!("Posting {} byte image to {}", png.len(), endpoint);
        let res = self.client.post(endpoint).json(&body).send().await.map_err(|e| {
            if e.is_connect() {
                ClassifierError::ModelUnavailable
            } else {
                ClassifierError::InferenceFailure(e.to_string())
            }
        })?;

        match res.status() {
            StatusCode::SERVICE_UNAVAILABLE | StatusCode::NOT_FOUND => {
                return Err(ClassifierError::ModelUnavailable)
            }
            status if !status.is_success() => {
                return Err(ClassifierError::InferenceFailure(format!("endpoint returned {status}")))
            }
            _ => {}
        }

        let text = res
            .text()
            .await
            .map_err(|e| ClassifierError::InferenceFailure(e.to_string()))?;
        parse_response(&text)
    }
}
