//! Progress reporting for the query pipeline

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use rag_application::ports::progress::ProgressNotifier;
use rag_domain::{PipelineStage, ToolResult};
use std::sync::Mutex;
use std::time::Duration;

/// Shows one spinner per pipeline stage; the dispatch stage counts tools.
pub struct ProgressReporter {
    current: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            current: Mutex::new(None),
        }
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::with_template("{spinner:.green} {prefix:.bold.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    fn counter_style() -> ProgressStyle {
        ProgressStyle::with_template("{spinner:.green} {prefix:.bold.cyan} [{pos}/{len}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    /// One-line status for a finished tool
    pub fn tool_status(result: &ToolResult) -> String {
        let duration = result
            .metadata
            .duration_ms
            .map(|ms| format!(" ({}ms)", ms))
            .unwrap_or_default();
        if result.is_success() {
            format!("{} {}{}", "✓".green(), result.tool_name, duration)
        } else {
            format!(
                "{} {}{}: {}",
                "✗".red(),
                result.tool_name,
                duration,
                result.failure_message().unwrap_or("failed")
            )
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressNotifier for ProgressReporter {
    fn on_stage_start(&self, stage: PipelineStage, total_tasks: usize) {
        let pb = if stage == PipelineStage::Dispatch {
            let pb = ProgressBar::new(total_tasks as u64);
            pb.set_style(Self::counter_style());
            pb
        } else {
            let pb = ProgressBar::new_spinner();
            pb.set_style(Self::spinner_style());
            pb
        };
        pb.set_prefix(stage.display_name().to_string());
        pb.set_message("running...");
        pb.enable_steady_tick(Duration::from_millis(100));

        if let Ok(mut current) = self.current.lock()
            && let Some(previous) = current.replace(pb)
        {
            previous.finish_and_clear();
        }
    }

    fn on_tool_complete(&self, result: &ToolResult) {
        if let Ok(current) = self.current.lock()
            && let Some(pb) = current.as_ref()
        {
            pb.println(format!("  {}", Self::tool_status(result)));
            pb.inc(1);
        }
    }

    fn on_stage_complete(&self, stage: PipelineStage) {
        if let Ok(mut current) = self.current.lock()
            && let Some(pb) = current.take()
        {
            pb.finish_with_message(format!("{}", "done".green()));
            tracing::trace!("Stage {} complete", stage);
        }
    }
}
