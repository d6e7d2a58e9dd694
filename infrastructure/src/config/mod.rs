//! Configuration file loading for agentic-rag
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. Environment variables `AGENTIC_RAG_<SECTION>__<KEY>`
//! 2. `--config <path>` specified file
//! 3. Project root: `./agentic-rag.toml` or `./.agentic-rag.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/agentic-rag/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, FileConfig, FileGenerationConfig, FileLlmConfig, FileLoggingConfig,
    FileRagConfig, FileSearchToolConfig, FileToolsConfig, FileWeatherToolConfig,
};
pub use loader::{ConfigLoader, ENV_PREFIX};
