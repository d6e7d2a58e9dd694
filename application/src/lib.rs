//! Application layer for agentic-rag
//!
//! This crate contains the query pipeline use cases, port definitions, and
//! application configuration. It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::ExecutionParams;
pub use ports::{
    conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger},
    document_store::{DocumentInfo, DocumentStorePort, FileSelector, SearchFilter, SearchHit, StoreError},
    llm_gateway::{GatewayError, LlmGateway, ModelInfo},
    progress::{NoProgress, ProgressNotifier},
    tool_executor::ToolExecutorPort,
};
pub use use_cases::dispatch_tools::ToolDispatcher;
pub use use_cases::process_query::{ProcessQueryError, ProcessQueryUseCase};
pub use use_cases::select_tools::{SelectionError, ToolSelector};
pub use use_cases::synthesize_response::{ResponseSynthesizer, SynthesisError};
