//! Tool domain value objects — immutable result and error types
//!
//! These types form the **output side** of dispatch. Every attempted
//! invocation produces exactly one [`ToolResult`], whether the executor
//! succeeded, failed, timed out, or was never reached (unknown tool).

use serde::{Deserialize, Serialize};

/// Error that occurred during tool execution.
///
/// | Code | Description |
/// |------|-------------|
/// | `UNKNOWN_TOOL` | Name not present in the enabled registry; no executor was called |
/// | `TIMEOUT` | Executor did not finish within the configured bound |
/// | `INVALID_ARGUMENT` | Missing or malformed argument |
/// | `NOT_FOUND` | Referenced document or location does not exist |
/// | `EXECUTION_FAILED` | Runtime failure (I/O error, HTTP error, panic) |
/// | `UNAVAILABLE` | Tool is enabled but has no executor or backend |
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolError {
    /// Error code (e.g., "NOT_FOUND", "TIMEOUT")
    pub code: String,
    /// Human-readable error message
    pub message: String,
}

impl ToolError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn unknown_tool() -> Self {
        Self::new("UNKNOWN_TOOL", "unknown tool")
    }

    pub fn timeout() -> Self {
        Self::new("TIMEOUT", "timeout")
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new("INVALID_ARGUMENT", message)
    }

    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::new(
            "NOT_FOUND",
            format!("Resource not found: {}", resource.into()),
        )
    }

    pub fn execution_failed(message: impl Into<String>) -> Self {
        Self::new("EXECUTION_FAILED", message)
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new("UNAVAILABLE", message)
    }
}

impl std::fmt::Display for ToolError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for ToolError {}

/// Tool-specific success payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ToolPayload {
    /// Free-form text (search abstracts, weather summaries)
    Text(String),
    /// A single numeric value (calculator)
    Number(f64),
    /// Structured rows (search hits, file listings, spreadsheet previews)
    Records(Vec<serde_json::Map<String, serde_json::Value>>),
}

impl ToolPayload {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// Render the payload as evidence text for the synthesis prompt.
    pub fn render(&self) -> String {
        match self {
            ToolPayload::Text(text) => text.clone(),
            ToolPayload::Number(n) => format_number(*n),
            ToolPayload::Records(records) if records.is_empty() => "(no records)".to_string(),
            ToolPayload::Records(records) => records
                .iter()
                .map(|r| serde_json::Value::Object(r.clone()).to_string())
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }
}

fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

/// Tagged outcome of one tool execution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ToolOutcome {
    Success { payload: ToolPayload },
    Failure { error: ToolError },
}

/// Structured metadata about tool execution.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ToolResultMetadata {
    /// Duration of execution in milliseconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
}

/// Result of one attempted tool invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResult {
    /// Name of the tool that was attempted
    pub tool_name: String,
    /// Success payload or failure
    pub outcome: ToolOutcome,
    /// Metadata about the execution
    #[serde(default)]
    pub metadata: ToolResultMetadata,
}

impl ToolResult {
    /// Create a successful result
    pub fn success(tool_name: impl Into<String>, payload: ToolPayload) -> Self {
        Self {
            tool_name: tool_name.into(),
            outcome: ToolOutcome::Success { payload },
            metadata: ToolResultMetadata::default(),
        }
    }

    /// Create a failed result
    pub fn failure(tool_name: impl Into<String>, error: ToolError) -> Self {
        Self {
            tool_name: tool_name.into(),
            outcome: ToolOutcome::Failure { error },
            metadata: ToolResultMetadata::default(),
        }
    }

    /// Add duration metadata
    pub fn with_duration(mut self, duration_ms: u64) -> Self {
        self.metadata.duration_ms = Some(duration_ms);
        self
    }

    pub fn is_success(&self) -> bool {
        matches!(self.outcome, ToolOutcome::Success { .. })
    }

    pub fn payload(&self) -> Option<&ToolPayload> {
        match &self.outcome {
            ToolOutcome::Success { payload } => Some(payload),
            ToolOutcome::Failure { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&ToolError> {
        match &self.outcome {
            ToolOutcome::Success { .. } => None,
            ToolOutcome::Failure { error } => Some(error),
        }
    }

    pub fn failure_message(&self) -> Option<&str> {
        self.error().map(|e| e.message.as_str())
    }

    /// Evidence text: the rendered payload, or the failure message
    pub fn render(&self) -> String {
        match &self.outcome {
            ToolOutcome::Success { payload } => payload.render(),
            ToolOutcome::Failure { error } => error.message.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_success_result() {
        let result = ToolResult::success("calculator_tool", ToolPayload::Number(4.0));
        assert!(result.is_success());
        assert_eq!(result.payload(), Some(&ToolPayload::Number(4.0)));
        assert!(result.error().is_none());
        assert!(result.failure_message().is_none());
    }

    #[test]
    fn test_failure_result() {
        let result = ToolResult::failure("weather_tool", ToolError::timeout()).with_duration(30_000);
        assert!(!result.is_success());
        assert_eq!(result.failure_message(), Some("timeout"));
        assert_eq!(result.error().unwrap().code, "TIMEOUT");
        assert_eq!(result.metadata.duration_ms, Some(30_000));
        assert_eq!(result.render(), "timeout");
    }

    #[test]
    fn test_unknown_tool_message() {
        let err = ToolError::unknown_tool();
        assert_eq!(err.message, "unknown tool");
        assert_eq!(err.to_string(), "[UNKNOWN_TOOL] unknown tool");
    }

    #[test]
    fn test_number_render() {
        assert_eq!(ToolPayload::Number(4.0).render(), "4");
        assert_eq!(ToolPayload::Number(-12.0).render(), "-12");
        assert_eq!(ToolPayload::Number(2.5).render(), "2.5");
        assert_eq!(ToolPayload::Number(f64::INFINITY).render(), "inf");
    }

    #[test]
    fn test_records_render() {
        let mut row = serde_json::Map::new();
        row.insert("name".to_string(), json!("a.txt"));
        let payload = ToolPayload::Records(vec![row.clone(), row]);
        assert_eq!(payload.render(), "{\"name\":\"a.txt\"}\n{\"name\":\"a.txt\"}");
        assert_eq!(ToolPayload::Records(vec![]).render(), "(no records)");
    }

    #[test]
    fn test_result_serialization() {
        let result = ToolResult::success("search_tool", ToolPayload::text("Rust is a language"));
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["tool_name"], "search_tool");
        assert_eq!(value["outcome"]["status"], "success");
        assert_eq!(value["outcome"]["payload"]["kind"], "text");
        assert_eq!(value["outcome"]["payload"]["value"], "Rust is a language");
    }
}
