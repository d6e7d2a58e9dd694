//! Evidence block rendering

use crate::tool::value_objects::ToolResult;
use std::collections::HashMap;

/// Render tool results as the evidence block of the synthesis prompt.
///
/// Entries are sorted by tool name so the prompt does not depend on
/// completion order. An empty map renders as an empty string.
pub fn render_evidence(results: &HashMap<String, ToolResult>) -> String {
    let mut names: Vec<&String> = results.keys().collect();
    names.sort();

    names
        .into_iter()
        .map(|name| {
            let result = &results[name];
            let status = if result.is_success() { "success" } else { "failure" };
            format!("### {} ({})\n{}", name, status, result.render())
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}
