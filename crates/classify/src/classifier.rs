use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::extract::extract_json_object;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClassifyError {
    #[error("ChatCompletion request failed: {0}")]
    Transport(String),
    #[error("ChatCompletion service returned status {status}: {body}")]
    Upstream { status: u16, body: String },
    #[error("Invalid ChatCompletion response: {0}")]
    Format(String),
    #[error("No response from AI")]
    EmptyResponse,
    #[error("Could not find a JSON object in the response")]
    DelimiterNotFound,
    #[error("Failed to unmarshal JSON data: {0}")]
    Parse(String),
}

/// Turns recognized receipt text into a structured JSON object.
#[async_trait]
pub trait Classifier: Send + Sync {
    async fn classify(&self, text: &str) -> Result<Map<String, Value>, ClassifyError>;
}

#[async_trait]
impl<T: Classifier + ?Sized> Classifier for Arc<T> {
    async fn classify(&self, text: &str) -> Result<Map<String, Value>, ClassifyError> {
        (**self).classify(text).await
    }
}

/// Plays back a canned completion through the same extraction a real
/// classifier uses, remembering each input text.
pub struct MockClassifier {
    reply: Result<String, ClassifyError>,
    calls: AtomicUsize,
    inputs: Mutex<Vec<String>>,
}

impl MockClassifier {
    /// Reply with `completion` as the model's raw text.
    pub fn new(completion: impl Into<String>) -> Self {
        Self { reply: Ok(completion.into()), calls: AtomicUsize::new(0), inputs: Mutex::default() }
    }

    pub fn failing(error: ClassifyError) -> Self {
        Self { reply: Err(error), calls: AtomicUsize::new(0), inputs: Mutex::default() }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn inputs(&self) -> Vec<String> {
        self.inputs.lock().map(|v| v.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl Classifier for MockClassifier {
    async fn classify(&self, text: &str) -> Result<Map<String, Value>, ClassifyError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut inputs) = self.inputs.lock() {
            inputs.push(text.to_string());
        }
        let completion = self.reply.clone()?;
        extract_json_object(&completion)
    }
}
