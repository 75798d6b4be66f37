use std::sync::Arc;

use anyhow::Context;
use reshito_classify::{Classifier, OpenAiClassifier};
use reshito_core::Config;
use reshito_ocr::{AzureVisionRecognizer, OcrBackend};
use reshito_pipeline::ReceiptPipeline;

pub type SharedPipeline = ReceiptPipeline<Arc<dyn OcrBackend>, Arc<dyn Classifier>>;

#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<SharedPipeline>,
}

impl AppState {
    pub fn new(recognizer: Arc<dyn OcrBackend>, classifier: Arc<dyn Classifier>) -> Self {
        Self { pipeline: Arc::new(ReceiptPipeline::new(recognizer, classifier)) }
    }

    /// Wire the Azure Vision and OpenAI clients from validated configuration.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let recognizer =
            AzureVisionRecognizer::new(&config.ocr).context("Failed to build OCR client")?;
        let classifier = OpenAiClassifier::new(&config.classifier)
            .context("Failed to build classification client")?;
        Ok(Self::new(Arc::new(recognizer), Arc::new(classifier)))
    }
}
