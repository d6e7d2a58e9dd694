//! Console output formatter for query outcomes

use colored::Colorize;
use rag_application::ModelInfo;
use rag_domain::{QueryOutcome, ToolInvocation, ToolRegistry, ToolResult};

/// Formats query outcomes for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// The answer alone
    pub fn format_text(outcome: &QueryOutcome) -> String {
        format!("{}\n", outcome.response.trim_end())
    }

    /// The whole outcome as pretty JSON
    pub fn format_json(outcome: &QueryOutcome) -> String {
        serde_json::to_string_pretty(outcome).unwrap_or_else(|_| "{}".to_string())
    }

    /// The answer preceded by the selected tool calls and their results
    pub fn format_debug(query: &str, outcome: &QueryOutcome) -> String {
        let mut output = String::new();

        output.push_str(&Self::header("Query Debug"));
        output.push('\n');
        output.push_str(&format!("{} {}\n", "Query:".cyan().bold(), query));

        output.push_str(&Self::section_header("Tool Calls"));
        if outcome.tool_calls.is_empty() {
            output.push_str(&format!("{}\n", "(no tools selected)".dimmed()));
        } else {
            for (i, call) in outcome.tool_calls.iter().enumerate() {
                output.push_str(&format!("{}. {}\n", i + 1, Self::format_call(call)));
            }
        }

        if !outcome.tool_results.is_empty() {
            output.push_str(&Self::section_header(&format!(
                "Tool Results ({} ok, {} failed)",
                outcome.success_count(),
                outcome.failure_count()
            )));
            for result in outcome.sorted_results() {
                output.push_str(&Self::format_result(result));
            }
        }

        output.push_str(&Self::section_header("Response"));
        output.push_str(outcome.response.trim_end());
        output.push('\n');
        output.push_str(&Self::footer());

        output
    }

    /// `name {"arg": value}` on one line
    pub fn format_call(call: &ToolInvocation) -> String {
        let args = serde_json::to_string(&call.arguments).unwrap_or_else(|_| "{}".to_string());
        format!("{} {}", call.name.yellow().bold(), args)
    }

    fn format_result(result: &ToolResult) -> String {
        let duration = result
            .metadata
            .duration_ms
            .map(|ms| format!(" ({}ms)", ms))
            .unwrap_or_default();

        let title = if result.is_success() {
            format!("── {} ✓{} ──", result.tool_name, duration).green().bold()
        } else {
            format!("── {} ✗{} ──", result.tool_name, duration).red().bold()
        };

        let body = match result.error() {
            Some(error) => error.to_string(),
            None => result.render(),
        };
        format!("\n{}\n{}\n", title, Self::indent(&body, "  "))
    }

    /// Enabled tools with their descriptions
    pub fn format_tools(registry: &ToolRegistry) -> String {
        if registry.is_empty() {
            return format!("{}\n", "No tools are enabled.".yellow());
        }

        let mut output = format!("{}\n", "Enabled tools:".cyan().bold());
        for tool in registry.iter() {
            output.push_str(&format!("  {} - {}\n", tool.name.bold(), tool.description));
            for param in &tool.parameters {
                let required = if param.required { "required" } else { "optional" };
                output.push_str(&format!(
                    "      {} ({}, {})\n",
                    param.name, param.param_type, required
                ));
            }
        }
        for name in registry.unknown_enabled() {
            output.push_str(&format!("  {} {} (unknown, ignored)\n", "!".yellow(), name));
        }
        output
    }

    pub fn format_model_info(info: &ModelInfo, base_url: &str) -> String {
        let status = if info.api_available {
            "available".green().bold()
        } else {
            "unreachable".red().bold()
        };
        format!(
            "{} {}\n{} {}\n{} {}\n",
            "Endpoint:".cyan().bold(),
            base_url,
            "Model:".cyan().bold(),
            info.model,
            "Status:".cyan().bold(),
            status
        )
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }

    /// Indent a multi-line string
    pub fn indent(text: &str, prefix: &str) -> String {
        text.lines()
            .map(|line| format!("{}{}", prefix, line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rag_domain::{ToolError, ToolPayload, ToolResults, ToolSpec};

    fn outcome() -> QueryOutcome {
        let calls = vec![
            ToolInvocation::new("calculator_tool").with_arg("expression", "2+2"),
            ToolInvocation::new("weather_tool").with_arg("location", "Seoul"),
        ];
        let mut results = ToolResults::new();
        results.insert(
            "calculator_tool".into(),
            ToolResult::success("calculator_tool", ToolPayload::Number(4.0)).with_duration(3),
        );
        results.insert(
            "weather_tool".into(),
            ToolResult::failure("weather_tool", ToolError::timeout()),
        );
        QueryOutcome::new("2+2 is 4. Weather is unavailable.", calls, results)
    }

    #[test]
    fn test_format_text_is_the_response() {
        assert_eq!(
            ConsoleFormatter::format_text(&QueryOutcome::direct("Hello!\n\n")),
            "Hello!\n"
        );
    }

    #[test]
    fn test_format_json_round_trips() {
        let json = ConsoleFormatter::format_json(&outcome());
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["response"], "2+2 is 4. Weather is unavailable.");
        assert_eq!(value["tool_calls"][0]["name"], "calculator_tool");
        assert_eq!(value["tool_results"]["weather_tool"]["outcome"]["status"], "failure");
    }

    #[test]
    fn test_format_debug_lists_calls_and_results() {
        let output = ConsoleFormatter::format_debug("what is 2+2 and the weather?", &outcome());
        assert!(output.contains("what is 2+2 and the weather?"));
        assert!(output.contains("calculator_tool"));
        assert!(output.contains(r#"{"expression":"2+2"}"#));
        assert!(output.contains("1 ok, 1 failed"));
        assert!(output.contains("(3ms)"));
        assert!(output.contains("[TIMEOUT] timeout"));
        assert!(output.contains("2+2 is 4."));
    }

    #[test]
    fn test_format_debug_without_tools() {
        let output = ConsoleFormatter::format_debug("hi", &QueryOutcome::direct("Hello!"));
        assert!(output.contains("(no tools selected)"));
        assert!(!output.contains("Tool Results"));
    }

    #[test]
    fn test_format_tools() {
        let registry = ToolRegistry::from_catalog(
            vec![ToolSpec::new("calculator_tool", "Evaluate arithmetic")],
            ["calculator_tool", "teleport_tool"],
        );
        let output = ConsoleFormatter::format_tools(&registry);
        assert!(output.contains("calculator_tool"));
        assert!(output.contains("Evaluate arithmetic"));
        assert!(output.contains("teleport_tool"));

        let empty = ConsoleFormatter::format_tools(&ToolRegistry::default());
        assert!(empty.contains("No tools are enabled."));
    }

    #[test]
    fn test_indent() {
        assert_eq!(ConsoleFormatter::indent("a\nb", "  "), "  a\n  b");
    }
}
