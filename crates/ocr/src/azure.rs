use async_trait::async_trait;
use reqwest::Client;
use reshito_core::{ImageRef, OcrConfig, Secret};
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::recognizer::{OcrBackend, OcrError};
use crate::types::ReadResult;

const SUBSCRIPTION_KEY_HEADER: &str = "Ocp-Apim-Subscription-Key";
const READ_FEATURE: &str = "read";

/// Azure AI Vision image analysis, `read` feature.
///
/// One pooled client per recognizer; the overall request deadline comes from
/// `OcrConfig::timeout`.
pub struct AzureVisionRecognizer {
    client: Client,
    url: String,
    subscription_key: Secret,
    language: String,
}

impl AzureVisionRecognizer {
    pub fn new(config: &OcrConfig) -> Result<Self, OcrError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| OcrError::Transport(e.to_string()))?;
        Ok(Self {
            client,
            url: config.url(),
            subscription_key: config.subscription_key.clone(),
            language: config.language.clone(),
        })
    }
}

#[async_trait]
impl OcrBackend for AzureVisionRecognizer {
    async fn recognize(&self, image: &ImageRef) -> Result<ReadResult, OcrError> {
        debug!(url = %self.url, image = %image, "Sending image to Azure Vision");

        let response = self
            .client
            .post(&self.url)
            .query(&[("features", READ_FEATURE), ("language", self.language.as_str())])
            .header(SUBSCRIPTION_KEY_HEADER, self.subscription_key.expose())
            .json(&json!({ "url": image.as_str() }))
            .send()
            .await
            .map_err(|e| OcrError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| OcrError::Transport(e.to_string()))?;

        if !status.is_success() {
            warn!(status = status.as_u16(), "Azure Vision rejected the request");
            return Err(OcrError::Upstream { status: status.as_u16(), body });
        }

        let parsed: Value =
            serde_json::from_str(&body).map_err(|e| OcrError::Format(e.to_string()))?;
        ReadResult::from_response(&parsed)
            .ok_or_else(|| OcrError::Format("missing `readResult` object".to_string()))
    }
}
