//! Logging configuration (`[logging]` section)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Raw `[logging]` configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    /// JSONL transcript of every query (disabled when unset)
    pub conversation_log: Option<PathBuf>,
    /// Diagnostic `tracing` output file (stderr only when unset)
    pub log_file: Option<PathBuf>,
}
