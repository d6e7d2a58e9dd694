//! Prompt templates for tool selection and response generation

use crate::tool::registry::ToolRegistry;

/// Placeholder used when no tool produced any evidence
pub const NO_TOOL_RESULTS: &str = "(no tool results)";

/// Worked selection examples, keyed by the tools each one uses
const SELECTION_EXAMPLES: &[(&[&str], &str)] = &[
    (
        &["weather_tool", "calculator_tool"],
        r#"- User: "What's the weather in Suncheon right now, and what is 2322+2242?"
  -> [
       {"name": "weather_tool", "arguments": {"location": "Suncheon"}},
       {"name": "calculator_tool", "arguments": {"expression": "2322+2242"}}
     ]
"#,
    ),
    (
        &["search_tool"],
        r#"- User: "Find the latest papers on AI agents"
  -> {"name": "search_tool", "arguments": {"query": "latest AI agent papers"}}
"#,
    ),
    (
        &["calculator_tool"],
        r#"- User: "What is 123 times 456?"
  -> {"name": "calculator_tool", "arguments": {"expression": "123 * 456"}}
"#,
    ),
    (
        &["vector_search_tool"],
        r#"- User: "What does the pump manual say about metering by accumulated power?"
  -> {"name": "vector_search_tool", "arguments": {"query": "metering by accumulated power", "file_filter": "pump manual"}}
"#,
    ),
    (
        &["excel_reader_tool"],
        r#"- User: "Show me the reservoir water level spreadsheet"
  -> {"name": "excel_reader_tool", "arguments": {"filename": "reservoir water level"}}
"#,
    ),
    (
        &["list_files_tool"],
        r#"- User: "List the uploaded files"
  -> {"name": "list_files_tool", "arguments": {}}
"#,
    ),
    (
        &[],
        r#"- User: "Hi there!"
  -> []
"#,
    ),
];

/// Templates for generating prompts at each stage
pub struct PromptTemplate;

impl PromptTemplate {
    /// Prompt asking the model to pick zero or more tools for `query`.
    ///
    /// The catalog comes from `registry`, and worked examples are kept
    /// only for tools the registry has enabled.
    pub fn tool_selection(query: &str, registry: &ToolRegistry) -> String {
        format!(
            r#"You are an assistant that analyzes the user's request and decides which tools are needed to fulfil it.
Review the available tools, their descriptions and parameters carefully, and pick the tools that best match the user's intent, with accurate arguments.

Output rules:
- If exactly one tool is needed, return a single JSON object: {{"name": "<tool>", "arguments": {{...}}}}
- If several tools are needed, return a JSON array of such objects.
- If no tool applies (greetings, small talk, questions you can answer directly), return an empty array: []
- Return JSON only. Do not add explanations or code fences.
- Only use tool names from the list below.

Available tools:
{catalog}
Examples:
{examples}
User request: {query}"#,
            catalog = registry.describe(),
            examples = Self::selection_examples(registry),
            query = query
        )
    }

    fn selection_examples(registry: &ToolRegistry) -> String {
        SELECTION_EXAMPLES
            .iter()
            .filter(|(tools, _)| tools.iter().all(|t| registry.contains(t)))
            .map(|(_, example)| *example)
            .collect()
    }

    /// Prompt asking the model to answer `query` from `evidence` only.
    pub fn response_generation(query: &str, evidence: &str, language: &str) -> String {
        let evidence = if evidence.trim().is_empty() {
            NO_TOOL_RESULTS
        } else {
            evidence
        };

        format!(
            r#"You are an assistant that writes the final answer to the user's request, using the tool results below as your only evidence.
Write every part of the answer in {language}.
Analyze the tool results carefully and integrate everything relevant; do not leave out information the user asked for.
Be clear and specific.
If the tool results are insufficient to answer fully, do not guess: state plainly which information is missing or limited.

User request: {query}

Tools used and their results:
{evidence}

Using this information, write a complete and accurate answer to the user's request."#,
            language = language,
            query = query,
            evidence = evidence
        )
    }
}
