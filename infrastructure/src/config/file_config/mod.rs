//! Raw TOML configuration data types
//!
//! These structs mirror the structure of the TOML config file and are
//! deserialized directly. Conversions into the application types live on
//! [`FileConfig`].

mod generation;
mod llm;
mod logging;
mod rag;
mod tools;

pub use generation::FileGenerationConfig;
pub use llm::FileLlmConfig;
pub use logging::FileLoggingConfig;
pub use rag::FileRagConfig;
pub use tools::{FileSearchToolConfig, FileToolsConfig, FileWeatherToolConfig};

use crate::tools::{ALL_TOOL_NAMES, ToolSettings};
use rag_application::config::ExecutionParams;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// A configuration problem. Reported as a warning; loading never fails on these.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigValidationError {
    #[error("{field} cannot be 0")]
    ZeroValue { field: &'static str },

    #[error("model name cannot be empty")]
    EmptyModelName,

    #[error("rag.chunk_overlap ({overlap}) must be smaller than rag.chunk_size ({size})")]
    OverlapTooLarge { overlap: usize, size: usize },

    #[error("{field} must be between 0.0 and 2.0, got {value}")]
    TemperatureOutOfRange { field: &'static str, value: f32 },

    #[error("tools.enabled: unknown tool '{0}'")]
    UnknownTool(String),
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Language-model endpoint
    pub llm: FileLlmConfig,
    /// Sampling temperatures and answer language
    pub generation: FileGenerationConfig,
    /// Enabled tools and their backends
    pub tools: FileToolsConfig,
    /// Local document store
    pub rag: FileRagConfig,
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning every detected issue.
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut issues = Vec::new();

        if self.llm.model.trim().is_empty() {
            issues.push(ConfigValidationError::EmptyModelName);
        }

        let counts = [
            ("llm.timeout_seconds", self.llm.timeout_seconds as usize),
            ("tools.timeout_seconds", self.tools.timeout_seconds as usize),
            ("tools.max_concurrent", self.tools.max_concurrent),
            ("rag.chunk_size", self.rag.chunk_size),
            ("rag.top_k", self.rag.top_k),
        ];
        for (field, value) in counts {
            if value == 0 {
                issues.push(ConfigValidationError::ZeroValue { field });
            }
        }

        if self.rag.chunk_size > 0 && self.rag.chunk_overlap >= self.rag.chunk_size {
            issues.push(ConfigValidationError::OverlapTooLarge {
                overlap: self.rag.chunk_overlap,
                size: self.rag.chunk_size,
            });
        }

        let temperatures = [
            ("generation.selection_temperature", self.generation.selection_temperature),
            ("generation.response_temperature", self.generation.response_temperature),
        ];
        for (field, value) in temperatures {
            if !(0.0..=2.0).contains(&value) {
                issues.push(ConfigValidationError::TemperatureOutOfRange { field, value });
            }
        }

        for name in &self.tools.enabled {
            if !ALL_TOOL_NAMES.contains(&name.as_str()) {
                issues.push(ConfigValidationError::UnknownTool(name.clone()));
            }
        }

        issues
    }

    /// Pipeline parameters for the query use case
    pub fn to_execution_params(&self) -> ExecutionParams {
        ExecutionParams::default()
            .with_selection_temperature(self.generation.selection_temperature)
            .with_response_temperature(self.generation.response_temperature)
            .with_response_language(self.generation.response_language.clone())
            .with_tool_timeout(Duration::from_secs(self.tools.timeout_seconds.max(1)))
            .with_llm_timeout(Some(Duration::from_secs(self.llm.timeout_seconds.max(1))))
            .with_max_concurrent_tools(self.tools.max_concurrent)
    }

    /// Backend settings for the tool executors
    pub fn to_tool_settings(&self) -> ToolSettings {
        ToolSettings {
            search_base_url: self.tools.search.base_url.clone(),
            weather_base_url: self.tools.weather.base_url.clone(),
            weather_api_key: self.tools.weather.api_key.clone(),
            default_top_k: self.rag.top_k.max(1),
        }
    }

    /// Chunk overlap clamped below the chunk size
    pub fn effective_chunk_overlap(&self) -> usize {
        self.rag.chunk_overlap.min(self.rag.chunk_size.saturating_sub(1))
    }
}
