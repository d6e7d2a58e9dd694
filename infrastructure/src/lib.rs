//! Infrastructure layer for agentic-rag
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer: the LM Studio gateway, the six tool
//! executors, the local document store, configuration file loading
//! and the JSONL conversation log.

pub mod config;
pub mod llm;
pub mod logging;
pub mod store;
pub mod tools;

// Re-export commonly used types
pub use config::{ConfigLoader, ConfigValidationError, FileConfig};
pub use llm::LmStudioGateway;
pub use logging::JsonlConversationLogger;
pub use store::LocalDocumentStore;
pub use tools::{ALL_TOOL_NAMES, ToolSettings, build_executors, builtin_catalog};
