use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while classifying an image
#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("Request timed out")]
    Timeout,

    #[error("Failed to classify the image: {0}")]
    RequestError(reqwest::Error),

    #[error("Classifier returned error: {0}")]
    ApiError(String),

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

impl From<reqwest::Error> for ClassifierError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ClassifierError::Timeout
        } else {
            ClassifierError::RequestError(err)
        }
    }
}

/// Freshness verdict from the classifier
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Verdict {
    #[serde(rename = "isFresh")]
    pub is_fresh: bool,
}

/// Client for the external freshness classifier
///
/// Uploads the captured photo as a multipart form and returns the verdict.
/// Callers gate persistence on a successful fresh verdict: classification
/// must complete and report fresh before any alert write happens.
pub struct ClassificationClient {
    base_url: String,
    client: Client,
}

impl ClassificationClient {
    pub fn new(base_url: String, timeout_secs: u64) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self { base_url, client }
    }

    /// Submit image bytes for fresh/rotten classification
    pub async fn classify(&self, image: Vec<u8>) -> Result<Verdict, ClassifierError> {
        let url = format!("{}/predict/", self.base_url.trim_end_matches('/'));

        let part = Part::bytes(image)
            .file_name("photo.jpg")
            .mime_str("image/jpeg")?;
        let form = Form::new().part("file", part);

        let response = self.client.post(&url).multipart(form).send().await?;

        if !response.status().is_success() {
            return Err(ClassifierError::ApiError(format!(
                "Classification failed: {}",
                response.status()
            )));
        }

        let verdict = response
            .json::<Verdict>()
            .await
            .map_err(|e| ClassifierError::InvalidResponse(e.to_string()))?;

        tracing::debug!("Classifier verdict: isFresh={}", verdict.is_fresh);

        Ok(verdict)
    }
}
