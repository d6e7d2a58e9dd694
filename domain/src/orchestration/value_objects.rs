//! Orchestration value objects — the result of one pipeline pass.

use crate::tool::entities::ToolInvocation;
use crate::tool::value_objects::ToolResult;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Tool results of one query, keyed by tool name
pub type ToolResults = HashMap<String, ToolResult>;

/// Outcome of one `process_query` call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryOutcome {
    /// Final answer text
    pub response: String,
    /// Tool invocations selected by the model, in the order it emitted them
    pub tool_calls: Vec<ToolInvocation>,
    /// Result per attempted tool name
    pub tool_results: ToolResults,
}

impl QueryOutcome {
    pub fn new(response: impl Into<String>, tool_calls: Vec<ToolInvocation>, tool_results: ToolResults) -> Self {
        Self {
            response: response.into(),
            tool_calls,
            tool_results,
        }
    }

    /// Outcome of a query answered without any tool
    pub fn direct(response: impl Into<String>) -> Self {
        Self::new(response, Vec::new(), HashMap::new())
    }

    pub fn used_tools(&self) -> bool {
        !self.tool_calls.is_empty()
    }

    pub fn success_count(&self) -> usize {
        self.tool_results.values().filter(|r| r.is_success()).count()
    }

    pub fn failure_count(&self) -> usize {
        self.tool_results.len() - self.success_count()
    }

    /// Results sorted by tool name, for stable display
    pub fn sorted_results(&self) -> Vec<&ToolResult> {
        let mut results: Vec<&ToolResult> = self.tool_results.values().collect();
        results.sort_by(|a, b| a.tool_name.cmp(&b.tool_name));
        results
    }
}
