use crate::error::ProcessError;
use serde::Serialize;
use serde_json::Value;

/// Fields checked, in order, when the assistant answers with a JSON object.
const PAYLOAD_FIELDS: [&str; 4] = ["result", "response", "output", "text"];

/// Outcome of one query or utility call, as handed to the chat front end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryResult {
    pub success: bool,
    pub output: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl QueryResult {
    pub fn ok(output: impl Into<String>) -> Self {
        Self {
            success: true,
            output: output.into(),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>, partial_output: impl Into<String>) -> Self {
        Self {
            success: false,
            output: partial_output.into(),
            error: Some(error.into()),
        }
    }

    pub fn from_process_error(error: &ProcessError) -> Self {
        Self::failed(error.to_string(), error.partial_stdout().trim())
    }
}

/// Pick the displayable payload out of a successful run.
///
/// Stdout wins; stderr is used only when stdout is blank. A JSON object is
/// unwrapped to its first known text field, and `"is_error": true` turns the
/// run into a failure. Anything else is passed through as opaque text.
pub fn extract_payload(stdout: &str, stderr: &str) -> Result<String, String> {
    let raw = if stdout.trim().is_empty() {
        stderr.trim()
    } else {
        stdout.trim()
    };

    let Ok(Value::Object(object)) = serde_json::from_str::<Value>(raw) else {
        return Ok(raw.to_string());
    };

    let text = PAYLOAD_FIELDS
        .iter()
        .find_map(|field| object.get(*field).and_then(Value::as_str))
        .map(str::to_string);

    if object.get("is_error").and_then(Value::as_bool) == Some(true) {
        return Err(text.unwrap_or_else(|| "assistant reported an error".to_string()));
    }

    Ok(text.unwrap_or_else(|| raw.to_string()))
}
