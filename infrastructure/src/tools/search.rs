//! `search_tool` — search the web using the DuckDuckGo Instant Answer API.
//!
//! The Instant Answer API needs no API key and returns abstracts, direct
//! answers, definitions and related topics (not full result listings).
//!
//! # Parameters
//!
//! | Name | Type | Required | Description |
//! |------|------|:---:|-------------|
//! | `query` | string | Yes | The search query |

use async_trait::async_trait;
use rag_application::ports::tool_executor::ToolExecutorPort;
use rag_domain::tool::{
    entities::{ToolArguments, ToolParameter, ToolSpec},
    value_objects::{ToolError, ToolPayload},
};

/// Canonical tool name for the web search tool.
pub const NAME: &str = "search_tool";

/// DuckDuckGo Instant Answer API endpoint (no API key required).
pub const DEFAULT_BASE_URL: &str = "https://api.duckduckgo.com/";

pub fn search_definition() -> ToolSpec {
    ToolSpec::new(
        NAME,
        "Search the web for information: recent news, general knowledge, external facts, current events. \
         Examples: 'latest AI trends', 'today's top news'.",
    )
    .with_parameter(ToolParameter::new("query", "The search query", true))
}

/// Executor for `search_tool`
pub struct WebSearchExecutor {
    client: reqwest::Client,
    base_url: String,
}

impl WebSearchExecutor {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl ToolExecutorPort for WebSearchExecutor {
    fn tool_name(&self) -> &str {
        NAME
    }

    async fn execute(&self, arguments: &ToolArguments) -> Result<ToolPayload, ToolError> {
        let query = arguments.require_str("query")?;

        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("q", query),
                ("format", "json"),
                ("no_html", "1"),
                ("skip_disambig", "1"),
            ])
            .header("User-Agent", "agentic-rag/0.1 (search tool)")
            .send()
            .await
            .map_err(|e| ToolError::execution_failed(format!("Search request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(ToolError::execution_failed(format!(
                "Search API returned error: {}",
                response.status()
            )));
        }

        // DuckDuckGo answers with `application/x-javascript`, so parse the text.
        let body = response
            .text()
            .await
            .map_err(|e| ToolError::execution_failed(format!("Failed to read search results: {}", e)))?;
        let data: serde_json::Value = serde_json::from_str(&body)
            .map_err(|e| ToolError::execution_failed(format!("Failed to parse search results: {}", e)))?;

        Ok(ToolPayload::Text(format_search_results(query, &data)))
    }
}

/// Format an Instant Answer response as markdown sections.
fn format_search_results(query: &str, data: &serde_json::Value) -> String {
    let mut sections: Vec<String> = Vec::new();

    sections.push(format!("## Search Results for: {}", query));

    if let Some(abstract_text) = data["AbstractText"].as_str()
        && !abstract_text.is_empty()
    {
        let source = data["AbstractSource"].as_str().unwrap_or("Unknown");
        let url = data["AbstractURL"].as_str().unwrap_or("");
        sections.push(format!(
            "### Summary ({})\n{}\nSource: {}",
            source, abstract_text, url
        ));
    }

    if let Some(answer) = data["Answer"].as_str()
        && !answer.is_empty()
    {
        sections.push(format!("### Instant Answer\n{}", answer));
    }

    if let Some(definition) = data["Definition"].as_str()
        && !definition.is_empty()
    {
        let source = data["DefinitionSource"].as_str().unwrap_or("Unknown");
        sections.push(format!("### Definition ({})\n{}", source, definition));
    }

    if let Some(topics) = data["RelatedTopics"].as_array() {
        // Grouped topics nest their entries under "Topics"
        let topic_texts: Vec<String> = topics
            .iter()
            .flat_map(|t| match t["Topics"].as_array() {
                Some(nested) => nested.iter().collect::<Vec<_>>(),
                None => vec![t],
            })
            .filter_map(|t| {
                let text = t["Text"].as_str().filter(|s| !s.is_empty())?;
                let url = t["FirstURL"].as_str().unwrap_or("");
                Some(format!("- {} ({})", text, url))
            })
            .take(10)
            .collect();

        if !topic_texts.is_empty() {
            sections.push(format!("### Related Topics\n{}", topic_texts.join("\n")));
        }
    }

    if sections.len() == 1 {
        sections.push("No instant answer available for this query.".to_string());
    }

    sections.join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_format_search_results_with_abstract() {
        let data = serde_json::json!({
            "AbstractText": "Rust is a systems programming language.",
            "AbstractSource": "Wikipedia",
            "AbstractURL": "https://en.wikipedia.org/wiki/Rust_(programming_language)",
            "Answer": "",
            "Definition": "",
            "RelatedTopics": []
        });

        let output = format_search_results("Rust programming", &data);
        assert!(output.contains("Rust programming"));
        assert!(output.contains("systems programming language"));
        assert!(output.contains("Wikipedia"));
    }

    #[test]
    fn test_format_search_results_empty() {
        let data = serde_json::json!({
            "AbstractText": "",
            "Answer": "",
            "Definition": "",
            "RelatedTopics": []
        });

        let output = format_search_results("obscure query", &data);
        assert!(output.contains("No instant answer available"));
    }

    #[test]
    fn test_format_search_results_with_nested_topics() {
        let data = serde_json::json!({
            "RelatedTopics": [
                {"Text": "Topic 1 description", "FirstURL": "https://example.com/1"},
                {"Name": "Group", "Topics": [
                    {"Text": "Nested topic", "FirstURL": "https://example.com/2"}
                ]}
            ]
        });

        let output = format_search_results("test", &data);
        assert!(output.contains("Related Topics"));
        assert!(output.contains("- Topic 1 description (https://example.com/1)"));
        assert!(output.contains("- Nested topic (https://example.com/2)"));
    }

    #[tokio::test]
    async fn test_execute_against_mock_api() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("q", "rust language"))
            .and(query_param("format", "json"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{"AbstractText": "A language empowering everyone.", "AbstractSource": "rust-lang.org", "AbstractURL": "https://rust-lang.org"}"#,
            ))
            .mount(&server)
            .await;

        let executor = WebSearchExecutor::new(reqwest::Client::new(), server.uri());
        let mut args = ToolArguments::new();
        args.insert("query", "rust language");

        match executor.execute(&args).await.unwrap() {
            ToolPayload::Text(text) => assert!(text.contains("A language empowering everyone.")),
            other => panic!("unexpected payload: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_execute_http_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let executor = WebSearchExecutor::new(reqwest::Client::new(), server.uri());
        let mut args = ToolArguments::new();
        args.insert("query", "anything");

        let err = executor.execute(&args).await.unwrap_err();
        assert_eq!(err.code, "EXECUTION_FAILED");
    }

    #[tokio::test]
    async fn test_execute_missing_query() {
        let executor = WebSearchExecutor::new(reqwest::Client::new(), DEFAULT_BASE_URL);
        let err = executor.execute(&ToolArguments::new()).await.unwrap_err();
        assert_eq!(err.code, "INVALID_ARGUMENT");
    }
}
