//! Progress notification port
//!
//! Defines the interface for reporting progress of a query pipeline run.

use rag_domain::{PipelineStage, ToolResult};

/// Callback for progress updates during a query
///
/// Implementations live in the presentation layer and can display
/// progress in various ways (spinner, plain log, etc.)
pub trait ProgressNotifier: Send + Sync {
    /// Called when a stage starts. `total_tasks` is the number of tools for
    /// [`PipelineStage::Dispatch`], 1 otherwise.
    fn on_stage_start(&self, stage: PipelineStage, total_tasks: usize);

    /// Called when one tool finishes during dispatch
    fn on_tool_complete(&self, _result: &ToolResult) {}

    /// Called when a stage completes
    fn on_stage_complete(&self, stage: PipelineStage);
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl ProgressNotifier for NoProgress {
    fn on_stage_start(&self, _stage: PipelineStage, _total_tasks: usize) {}
    fn on_stage_complete(&self, _stage: PipelineStage) {}
}
