//! Tool selection parsing
//!
//! Turns the language model's raw selection answer into structured
//! [`ToolInvocation`](crate::tool::ToolInvocation)s. Models emit near-JSON
//! rather than strict JSON, so extraction is best-effort and a failure is
//! an ordinary branch ([`SelectionParseError`]) that callers fold into
//! "no tools selected".

pub mod parsing;

pub use parsing::{SelectionParseError, extract_json_value, parse_tool_invocations};
