//! Generation configuration (`[generation]` section)

use serde::{Deserialize, Serialize};

/// Raw `[generation]` configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileGenerationConfig {
    /// Temperature of the tool selection call
    pub selection_temperature: f32,
    /// Temperature of the answer synthesis call
    pub response_temperature: f32,
    /// Language the final answer is written in
    pub response_language: String,
}

impl Default for FileGenerationConfig {
    fn default() -> Self {
        Self {
            selection_temperature: 0.0,
            response_temperature: 0.5,
            response_language: "English".to_string(),
        }
    }
}
