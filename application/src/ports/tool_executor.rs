//! Tool Executor port
//!
//! Defines the uniform contract every tool backend implements.

use async_trait::async_trait;
use rag_domain::tool::{
    entities::ToolArguments,
    value_objects::{ToolError, ToolPayload},
};

/// Port for executing one tool
///
/// One implementation exists per tool name. Arguments arrive exactly as the
/// model emitted them; each executor validates and coerces what it needs.
/// Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait ToolExecutorPort: Send + Sync {
    /// Name of the tool this executor serves
    fn tool_name(&self) -> &str;

    /// Execute the tool with the given arguments
    async fn execute(&self, arguments: &ToolArguments) -> Result<ToolPayload, ToolError>;
}
