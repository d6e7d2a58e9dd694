//! Pipeline stages

use serde::{Deserialize, Serialize};

/// Stage of a query pipeline run. Stages always run in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    /// The model picks zero or more tools
    Selection,
    /// Selected tools are executed
    Dispatch,
    /// The model writes the final answer from tool results
    Synthesis,
}

impl PipelineStage {
    pub fn as_str(&self) -> &str {
        match self {
            PipelineStage::Selection => "selection",
            PipelineStage::Dispatch => "dispatch",
            PipelineStage::Synthesis => "synthesis",
        }
    }

    pub fn display_name(&self) -> &str {
        match self {
            PipelineStage::Selection => "Tool Selection",
            PipelineStage::Dispatch => "Tool Execution",
            PipelineStage::Synthesis => "Response Generation",
        }
    }
}

impl std::fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}
