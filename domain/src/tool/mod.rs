//! Tool domain module
//!
//! This module defines the core abstractions of the **tool-orchestration core**:
//! what a tool looks like, how a model-selected invocation is represented,
//! and what an execution produces.
//!
//! # Overview
//!
//! ```text
//! ┌──────────────┐    ┌────────────────┐    ┌──────────────┐
//! │ ToolRegistry │───▶│ ToolInvocation │───▶│ ToolResult   │
//! │ (enabled     │    │ (name + raw    │    │ success /    │
//! │  ToolSpecs)  │    │  arguments)    │    │ failure      │
//! └──────────────┘    └────────────────┘    └──────────────┘
//! ```
//!
//! # Key Types
//!
//! - [`ToolSpec`] — declaration of a single tool (name, description, parameters)
//! - [`ToolRegistry`] — the enabled, ordered subset of the static catalog
//! - [`ToolInvocation`] — a tool call as emitted by the language model
//! - [`ToolArguments`] — loosely-typed arguments, validated by each executor
//! - [`ToolResult`] — tagged outcome: [`ToolPayload`] or [`ToolError`]
//!
//! # Architecture
//!
//! - **Domain** (this module): pure definitions, no I/O
//! - **Application** (`ToolExecutorPort`): port trait for one tool's execution
//! - **Infrastructure**: the concrete executors (HTTP, document store, evaluator)

pub mod entities;
pub mod registry;
pub mod value_objects;

pub use entities::{ToolArguments, ToolInvocation, ToolParameter, ToolSpec};
pub use registry::ToolRegistry;
pub use value_objects::{ToolError, ToolOutcome, ToolPayload, ToolResult};
