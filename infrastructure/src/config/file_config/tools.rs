//! Tools configuration from TOML (`[tools]` section)
//!
//! Example configuration:
//!
//! ```toml
//! [tools]
//! enabled = ["search_tool", "calculator_tool", "weather_tool"]
//! timeout_seconds = 30
//! max_concurrent = 4
//!
//! [tools.weather]
//! api_key = "..."
//! ```
//!
//! `enabled` also accepts a comma-separated string, which is the natural
//! shape when it comes from `AGENTIC_RAG_TOOLS__ENABLED`.

use crate::tools::{ALL_TOOL_NAMES, search, weather};
use serde::{Deserialize, Deserializer, Serialize};

/// Raw `[tools]` configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileToolsConfig {
    /// Names of the enabled tools
    #[serde(deserialize_with = "deserialize_tool_list")]
    pub enabled: Vec<String>,
    /// Per-invocation timeout
    pub timeout_seconds: u64,
    /// Maximum number of tools running at once for one query
    pub max_concurrent: usize,
    pub search: FileSearchToolConfig,
    pub weather: FileWeatherToolConfig,
}

impl Default for FileToolsConfig {
    fn default() -> Self {
        Self {
            enabled: ALL_TOOL_NAMES.iter().map(|s| s.to_string()).collect(),
            timeout_seconds: 30,
            max_concurrent: 4,
            search: FileSearchToolConfig::default(),
            weather: FileWeatherToolConfig::default(),
        }
    }
}

/// `[tools.search]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileSearchToolConfig {
    pub base_url: String,
}

impl Default for FileSearchToolConfig {
    fn default() -> Self {
        Self {
            base_url: search::DEFAULT_BASE_URL.to_string(),
        }
    }
}

/// `[tools.weather]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileWeatherToolConfig {
    /// OpenWeatherMap API key; the tool reports UNAVAILABLE without one
    pub api_key: Option<String>,
    pub base_url: String,
}

impl Default for FileWeatherToolConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: weather::DEFAULT_BASE_URL.to_string(),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ToolList {
    List(Vec<String>),
    Csv(String),
}

fn deserialize_tool_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = match ToolList::deserialize(deserializer)? {
        ToolList::List(items) => items,
        ToolList::Csv(s) => s.split(',').map(str::to_string).collect(),
    };
    Ok(raw
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect())
}
