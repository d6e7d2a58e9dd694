//! Use cases
//!
//! Application-level operations that orchestrate domain logic.
//!
//! One query runs through three stages, each its own component:
//!
//! - [`ToolSelector`](select_tools::ToolSelector) — model picks tools
//! - [`ToolDispatcher`](dispatch_tools::ToolDispatcher) — tools run, failures isolated
//! - [`ResponseSynthesizer`](synthesize_response::ResponseSynthesizer) — model answers from evidence
//!
//! [`ProcessQueryUseCase`](process_query::ProcessQueryUseCase) composes them.

pub mod dispatch_tools;
pub mod process_query;
pub mod select_tools;
pub(crate) mod shared;
pub mod synthesize_response;
pub(crate) mod tool_helpers;
