pub mod azure;
pub mod recognizer;
pub mod types;

pub use azure::AzureVisionRecognizer;
pub use recognizer::{MockRecognizer, OcrBackend, OcrError};
pub use types::ReadResult;
