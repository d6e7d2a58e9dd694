//! Application-level configuration.
//!
//! - [`ExecutionParams`] — temperatures, response language, timeouts and
//!   dispatch concurrency for the query pipeline

pub mod execution_params;

pub use execution_params::ExecutionParams;
