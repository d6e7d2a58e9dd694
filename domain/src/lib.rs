//! Domain layer for agentic-rag
//!
//! This crate contains the core types of the tool-orchestration pipeline.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Tools
//!
//! A tool is a named capability (web search, document search, calculator,
//! weather, file listing, spreadsheet preview) declared by a [`ToolSpec`].
//! The enabled subset of the static catalog forms the [`ToolRegistry`].
//!
//! ## One round per query
//!
//! Each query goes through exactly one selection pass and one synthesis pass:
//!
//! - **Selection**: the model maps the query to zero or more [`ToolInvocation`]s
//! - **Dispatch**: every invocation runs independently and yields a [`ToolResult`]
//! - **Synthesis**: the model answers from the rendered evidence block
//!
//! The outcome of one pass is a [`QueryOutcome`].

pub mod core;
pub mod orchestration;
pub mod prompt;
pub mod selection;
pub mod tool;
pub mod util;

// Re-export commonly used types
pub use core::{error::DomainError, query::Query};
pub use orchestration::{
    stage::PipelineStage,
    value_objects::{QueryOutcome, ToolResults},
};
pub use prompt::{PromptTemplate, render_evidence};
pub use selection::{SelectionParseError, extract_json_value, parse_tool_invocations};
pub use tool::{
    entities::{ToolArguments, ToolInvocation, ToolParameter, ToolSpec},
    registry::ToolRegistry,
    value_objects::{ToolError, ToolOutcome, ToolPayload, ToolResult, ToolResultMetadata},
};
