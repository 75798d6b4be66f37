use std::fmt;

use reshito_classify::{ClassifyError, Classifier};
use reshito_core::{ImageRef, ReceiptRecord};
use reshito_ocr::{OcrBackend, OcrError};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Ocr,
    Classification,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Ocr => write!(f, "ocr"),
            Stage::Classification => write!(f, "classification"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PipelineError {
    #[error("failed to perform OCR on the image: {0}")]
    Ocr(#[source] OcrError),
    #[error("unexpected OCR result format: `content` is missing or not a string")]
    UnexpectedShape,
    #[error("failed to classify the OCR content: {0}")]
    Classify(#[source] ClassifyError),
}

impl PipelineError {
    pub fn stage(&self) -> Stage {
        match self {
            PipelineError::Ocr(_) | PipelineError::UnexpectedShape => Stage::Ocr,
            PipelineError::Classify(_) => Stage::Classification,
        }
    }
}

/// Orchestrates: OCR → pull `content` → classify.
///
/// Holds no per-request state; one instance serves concurrent requests.
pub struct ReceiptPipeline<R: OcrBackend, C: Classifier> {
    recognizer: R,
    classifier: C,
}

impl<R: OcrBackend, C: Classifier> ReceiptPipeline<R, C> {
    pub fn new(recognizer: R, classifier: C) -> Self {
        Self { recognizer, classifier }
    }

    /// Turn a receipt image into the classifier's JSON object. Either every
    /// stage succeeds or the first failure is returned.
    #[tracing::instrument(skip_all, fields(image = %image))]
    pub async fn process(&self, image: &ImageRef) -> Result<Map<String, Value>, PipelineError> {
        let read = self.recognizer.recognize(image).await.map_err(PipelineError::Ocr)?;

        let text = read.content().ok_or(PipelineError::UnexpectedShape)?;
        debug!(chars = text.chars().count(), "OCR text recognized");

        let receipt = self.classifier.classify(text).await.map_err(PipelineError::Classify)?;

        match ReceiptRecord::from_object(&receipt) {
            Ok(record) => debug!(items = record.items.len(), "Receipt classified"),
            Err(e) => warn!("Classifier output does not match the receipt shape: {e}"),
        }

        Ok(receipt)
    }
}
