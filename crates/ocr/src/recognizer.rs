use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use reshito_core::ImageRef;
use thiserror::Error;

use crate::types::ReadResult;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OcrError {
    #[error("OCR request failed: {0}")]
    Transport(String),
    #[error("OCR service returned status {status}: {body}")]
    Upstream { status: u16, body: String },
    #[error("Invalid OCR response format: {0}")]
    Format(String),
}

/// Abstraction over a remote OCR service.
/// Implementations take the URL of a receipt image and return what the
/// service recognized in it.
#[async_trait]
pub trait OcrBackend: Send + Sync {
    async fn recognize(&self, image: &ImageRef) -> Result<ReadResult, OcrError>;
}

#[async_trait]
impl<T: OcrBackend + ?Sized> OcrBackend for Arc<T> {
    async fn recognize(&self, image: &ImageRef) -> Result<ReadResult, OcrError> {
        (**self).recognize(image).await
    }
}

// ── Mock backend (always available, used for tests) ───────────────────────────

/// Returns a pre-set reply and counts how often it was asked.
pub struct MockRecognizer {
    reply: Result<ReadResult, OcrError>,
    calls: AtomicUsize,
}

impl MockRecognizer {
    pub fn new(text: impl Into<String>) -> Self {
        Self::with_result(ReadResult::from_content(text))
    }

    pub fn with_result(result: ReadResult) -> Self {
        Self { reply: Ok(result), calls: AtomicUsize::new(0) }
    }

    pub fn failing(error: OcrError) -> Self {
        Self { reply: Err(error), calls: AtomicUsize::new(0) }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl OcrBackend for MockRecognizer {
    async fn recognize(&self, _image: &ImageRef) -> Result<ReadResult, OcrError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.reply.clone()
    }
}
