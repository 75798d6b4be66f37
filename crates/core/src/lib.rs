pub mod config;
pub mod image;
pub mod receipt;

pub use config::{ClassifierConfig, Config, ConfigError, OcrConfig, Secret};
pub use image::{ImageRef, InvalidImageRef};
pub use receipt::{Category, LineItem, ReceiptRecord, Store};
