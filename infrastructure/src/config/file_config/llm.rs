//! Language-model endpoint configuration (`[llm]` section)

use crate::llm::gateway::{DEFAULT_API_KEY, DEFAULT_BASE_URL, DEFAULT_MAX_RETRIES, DEFAULT_MODEL};
use serde::{Deserialize, Serialize};

/// Raw `[llm]` configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLlmConfig {
    /// OpenAI-compatible endpoint, including the `/v1` suffix
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    /// Per-request timeout for completions
    pub timeout_seconds: u64,
    /// Extra attempts after a connection failure or a 5xx reply
    pub max_retries: u32,
}

impl Default for FileLlmConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: DEFAULT_API_KEY.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout_seconds: 60,
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }
}
