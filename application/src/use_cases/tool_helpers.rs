//! Shared helpers for tool use cases.

use rag_domain::ToolInvocation;

/// Extract a short preview string from tool invocation arguments.
///
/// Looks for well-known keys (`query`, `expression`, `location`,
/// `filename`, `file_id`) first, then falls back to the first string value
/// in key order.
pub(crate) fn tool_args_preview(call: &ToolInvocation) -> String {
    let keys = ["query", "expression", "location", "filename", "file_id"];
    for key in &keys {
        if let Some(serde_json::Value::String(s)) = call.arguments.get(key) {
            return truncate_preview(s, 50);
        }
    }

    let mut entries: Vec<_> = call.arguments.iter().collect();
    entries.sort_by(|a, b| a.0.cmp(b.0));
    for (_, value) in entries {
        if let Some(s) = value.as_str() {
            return truncate_preview(s, 50);
        }
    }
    String::new()
}

fn truncate_preview(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max_len.saturating_sub(1)).collect();
        format!("{}…", truncated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_key_preferred() {
        let call = ToolInvocation::new("vector_search_tool")
            .with_arg("file_filter", "manual.pdf")
            .with_arg("query", "pump settings");
        assert_eq!(tool_args_preview(&call), "pump settings");
    }

    #[test]
    fn test_expression_key() {
        let call = ToolInvocation::new("calculator_tool").with_arg("expression", "2+2");
        assert_eq!(tool_args_preview(&call), "2+2");
    }

    #[test]
    fn test_location_key() {
        let call = ToolInvocation::new("weather_tool").with_arg("location", "Busan");
        assert_eq!(tool_args_preview(&call), "Busan");
    }

    #[test]
    fn test_fallback_to_first_string_by_key() {
        let call = ToolInvocation::new("x")
            .with_arg("zeta", "last")
            .with_arg("alpha", "first");
        assert_eq!(tool_args_preview(&call), "first");
    }

    #[test]
    fn test_empty_args() {
        assert_eq!(tool_args_preview(&ToolInvocation::new("list_files_tool")), "");
    }

    #[test]
    fn test_no_string_values() {
        let call = ToolInvocation::new("x").with_arg("top_k", 3);
        assert_eq!(tool_args_preview(&call), "");
    }

    #[test]
    fn test_truncation() {
        let call = ToolInvocation::new("search_tool").with_arg("query", "a".repeat(100));
        let result = tool_args_preview(&call);
        assert!(result.chars().count() <= 50);
        assert!(result.ends_with('…'));
    }
}
