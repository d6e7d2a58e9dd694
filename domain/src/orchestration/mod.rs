//! Orchestration domain
//!
//! Value types for one pass of the query pipeline:
//! selection → dispatch → synthesis.

pub mod stage;
pub mod value_objects;

pub use stage::PipelineStage;
pub use value_objects::{QueryOutcome, ToolResults};
