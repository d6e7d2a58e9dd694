//! Port definitions (interfaces for external adapters)

pub mod conversation_logger;
pub mod document_store;
pub mod llm_gateway;
pub mod progress;
pub mod tool_executor;
