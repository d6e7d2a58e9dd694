//! Execution parameters — query pipeline control.
//!
//! [`ExecutionParams`] groups the static parameters that control one
//! [`ProcessQueryUseCase`](crate::use_cases::process_query::ProcessQueryUseCase)
//! run. These are application-layer concerns, built from the file config by
//! the binary and passed in explicitly.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Query pipeline parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionParams {
    /// Temperature for the tool-selection call (low for parseable output).
    pub selection_temperature: f32,
    /// Temperature for the response-generation call.
    pub response_temperature: f32,
    /// Language the final answer must be written in.
    pub response_language: String,
    /// Bound on each tool execution.
    pub tool_timeout: Duration,
    /// Bound on each language-model call. `None` leaves it to the client.
    pub llm_timeout: Option<Duration>,
    /// Maximum number of tools executing at once (at least 1).
    pub max_concurrent_tools: usize,
}

impl Default for ExecutionParams {
    fn default() -> Self {
        Self {
            selection_temperature: 0.0,
            response_temperature: 0.5,
            response_language: "English".to_string(),
            tool_timeout: Duration::from_secs(30),
            llm_timeout: Some(Duration::from_secs(60)),
            max_concurrent_tools: 4,
        }
    }
}

impl ExecutionParams {
    // ==================== Builder Methods ====================

    pub fn with_selection_temperature(mut self, temperature: f32) -> Self {
        self.selection_temperature = temperature;
        self
    }

    pub fn with_response_temperature(mut self, temperature: f32) -> Self {
        self.response_temperature = temperature;
        self
    }

    pub fn with_response_language(mut self, language: impl Into<String>) -> Self {
        self.response_language = language.into();
        self
    }

    pub fn with_tool_timeout(mut self, timeout: Duration) -> Self {
        self.tool_timeout = timeout;
        self
    }

    pub fn with_llm_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.llm_timeout = timeout;
        self
    }

    pub fn with_max_concurrent_tools(mut self, max: usize) -> Self {
        self.max_concurrent_tools = max.max(1);
        self
    }

    /// Concurrency limit, never below 1 even if deserialized as 0
    pub fn concurrency(&self) -> usize {
        self.max_concurrent_tools.max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let params = ExecutionParams::default();
        assert_eq!(params.selection_temperature, 0.0);
        assert_eq!(params.response_temperature, 0.5);
        assert_eq!(params.response_language, "English");
        assert_eq!(params.tool_timeout, Duration::from_secs(30));
        assert_eq!(params.llm_timeout, Some(Duration::from_secs(60)));
        assert_eq!(params.max_concurrent_tools, 4);
    }

    #[test]
    fn test_builder() {
        let params = ExecutionParams::default()
            .with_response_language("Korean")
            .with_tool_timeout(Duration::from_millis(50))
            .with_llm_timeout(None)
            .with_max_concurrent_tools(0);

        assert_eq!(params.response_language, "Korean");
        assert_eq!(params.tool_timeout, Duration::from_millis(50));
        assert!(params.llm_timeout.is_none());
        assert_eq!(params.max_concurrent_tools, 1);
    }

    #[test]
    fn test_concurrency_clamped() {
        let params = ExecutionParams {
            max_concurrent_tools: 0,
            ..Default::default()
        };
        assert_eq!(params.concurrency(), 1);
    }
}
