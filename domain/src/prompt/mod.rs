//! Prompt domain
//!
//! Templates for the two language-model calls made per query (tool
//! selection, then response generation) and the evidence block that
//! carries tool results into the second one.

mod evidence;
mod template;

pub use evidence::render_evidence;
pub use template::PromptTemplate;
