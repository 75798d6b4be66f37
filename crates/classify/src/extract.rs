use serde_json::{Map, Value};

use crate::classifier::ClassifyError;

/// Cut the span from the first `{` to the last `}` out of free model text and
/// parse it as a JSON object.
///
/// Braces inside string values and multiple JSON blocks are not told apart:
/// `a {"x":1} b {"y":2} c` yields the invalid span `{"x":1} b {"y":2}`.
pub fn extract_json_object(text: &str) -> Result<Map<String, Value>, ClassifyError> {
    let start = text.find('{').ok_or(ClassifyError::DelimiterNotFound)?;
    let end = text.rfind('}').ok_or(ClassifyError::DelimiterNotFound)?;
    if end < start {
        return Err(ClassifyError::DelimiterNotFound);
    }

    serde_json::from_str(&text[start..=end]).map_err(|e| ClassifyError::Parse(e.to_string()))
}
