use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The `readResult` object of an image-analysis response.
///
/// Kept as raw JSON: the pipeline only needs `content`, and the rest
/// (blocks, lines, word polygons) passes through untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReadResult(Map<String, Value>);

impl ReadResult {
    pub fn new(fields: Map<String, Value>) -> Self {
        ReadResult(fields)
    }

    /// Shorthand for a result holding only recognized `content`.
    pub fn from_content(content: impl Into<String>) -> Self {
        let mut fields = Map::new();
        fields.insert("content".to_string(), Value::String(content.into()));
        ReadResult(fields)
    }

    /// Pull `readResult` out of a full response body, if it is an object.
    pub fn from_response(body: &Value) -> Option<Self> {
        body.get("readResult")
            .and_then(Value::as_object)
            .map(|fields| ReadResult(fields.clone()))
    }

    /// Recognized text, present only when `content` is a JSON string.
    pub fn content(&self) -> Option<&str> {
        self.0.get("content").and_then(Value::as_str)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }
}
