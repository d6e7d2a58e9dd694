//! `vector_search_tool` — similarity search over the indexed documents.
//!
//! # Parameters
//!
//! | Name | Type | Required | Description |
//! |------|------|:---:|-------------|
//! | `query` | string | Yes | What to look for |
//! | `file_filter` | string | No | Partial file name to restrict the search |
//! | `tags_filter` | array | No | Only documents carrying one of these tags |
//! | `top_k` | integer | No | Maximum number of chunks |

use super::store_error;
use async_trait::async_trait;
use rag_application::ports::{
    document_store::{DocumentStorePort, SearchFilter},
    tool_executor::ToolExecutorPort,
};
use rag_domain::tool::{
    entities::{ToolArguments, ToolParameter, ToolSpec},
    value_objects::{ToolError, ToolPayload},
};
use serde_json::{Map, Value};
use std::sync::Arc;

pub const NAME: &str = "vector_search_tool";

pub fn vector_search_definition(default_top_k: usize) -> ToolSpec {
    ToolSpec::new(
        NAME,
        "Search the uploaded internal documents for relevant passages. \
         Examples: 'what does the pump manual say about pressure', 'find the water level report'.",
    )
    .with_parameter(ToolParameter::new("query", "What to look for in the documents", true))
    .with_parameter(ToolParameter::new(
        "file_filter",
        "Only search files whose name contains this text",
        false,
    ))
    .with_parameter(
        ToolParameter::new(
            "tags_filter",
            "Only search documents carrying one of these tags",
            false,
        )
        .with_type("array"),
    )
    .with_parameter(
        ToolParameter::new("top_k", "Maximum number of passages to return", false)
            .with_type("integer")
            .with_default(default_top_k),
    )
}

/// Executor for `vector_search_tool`
pub struct VectorSearchExecutor {
    store: Arc<dyn DocumentStorePort>,
    default_top_k: usize,
}

impl VectorSearchExecutor {
    pub fn new(store: Arc<dyn DocumentStorePort>, default_top_k: usize) -> Self {
        Self {
            store,
            default_top_k: default_top_k.max(1),
        }
    }
}

#[async_trait]
impl ToolExecutorPort for VectorSearchExecutor {
    fn tool_name(&self) -> &str {
        NAME
    }

    async fn execute(&self, arguments: &ToolArguments) -> Result<ToolPayload, ToolError> {
        let query = arguments.require_str("query")?;

        let top_k = match arguments.get_u64("top_k") {
            Some(0) => return Err(ToolError::invalid_argument("top_k must be at least 1")),
            Some(n) => n as usize,
            None => self.default_top_k,
        };
        let mut filter = SearchFilter::new(top_k).with_tags(arguments.get_str_list("tags_filter"));
        if let Some(file_filter) = arguments.get_str("file_filter") {
            filter = filter.with_filename(file_filter);
        }

        let hits = self.store.search(query, &filter).await.map_err(store_error)?;

        let records = hits
            .into_iter()
            .map(|hit| {
                let mut record = Map::new();
                record.insert("document_id".into(), Value::from(hit.document_id));
                record.insert("filename".into(), Value::from(hit.filename));
                record.insert("chunk_index".into(), Value::from(hit.chunk_index));
                record.insert("score".into(), Value::from((hit.score * 1000.0).round() / 1000.0));
                record.insert("content".into(), Value::from(hit.content));
                record
            })
            .collect();

        Ok(ToolPayload::Records(records))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::LocalDocumentStore;
    use std::fs;
    use tempfile::TempDir;

    fn store() -> (TempDir, Arc<dyn DocumentStorePort>) {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("manuals")).unwrap();
        fs::create_dir_all(dir.path().join("reports")).unwrap();
        fs::write(
            dir.path().join("manuals/pump.txt"),
            "The pump pressure must stay below 6 bar.",
        )
        .unwrap();
        fs::write(
            dir.path().join("reports/pump_log.txt"),
            "Pump pressure measured at 5 bar on Monday.",
        )
        .unwrap();
        fs::write(dir.path().join("menu.txt"), "Lunch menu for the canteen.").unwrap();
        let store = LocalDocumentStore::open(dir.path(), 1000, 200).unwrap();
        (dir, Arc::new(store))
    }

    fn query_args(query: &str) -> ToolArguments {
        let mut args = ToolArguments::new();
        args.insert("query", query);
        args
    }

    fn records(payload: ToolPayload) -> Vec<Map<String, Value>> {
        match payload {
            ToolPayload::Records(records) => records,
            other => panic!("expected records, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_search_returns_ranked_records() {
        let (_dir, store) = store();
        let executor = VectorSearchExecutor::new(store, 10);

        let rows = records(executor.execute(&query_args("pump pressure")).await.unwrap());
        assert_eq!(rows.len(), 2);
        for row in &rows {
            assert!(row["filename"].as_str().unwrap().contains("pump"));
            assert!(row["score"].as_f64().unwrap() > 0.0);
            assert_eq!(row["chunk_index"], 0);
        }
        assert!(rows[0]["score"].as_f64() >= rows[1]["score"].as_f64());
    }

    #[tokio::test]
    async fn test_search_filters_and_top_k() {
        let (_dir, store) = store();
        let executor = VectorSearchExecutor::new(store, 10);

        let mut args = query_args("pump pressure");
        args.insert("tags_filter", serde_json::json!(["reports"]));
        let rows = records(executor.execute(&args).await.unwrap());
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["document_id"], "reports/pump_log.txt");

        let mut args = query_args("pump pressure");
        args.insert("file_filter", "PUMP.TXT");
        let rows = records(executor.execute(&args).await.unwrap());
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["document_id"], "manuals/pump.txt");

        let mut args = query_args("pump pressure");
        args.insert("top_k", "1");
        assert_eq!(records(executor.execute(&args).await.unwrap()).len(), 1);
    }

    #[tokio::test]
    async fn test_search_no_match_is_empty_records() {
        let (_dir, store) = store();
        let executor = VectorSearchExecutor::new(store, 10);
        let rows = records(executor.execute(&query_args("volcano")).await.unwrap());
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn test_search_argument_errors() {
        let (_dir, store) = store();
        let executor = VectorSearchExecutor::new(store, 10);

        let err = executor.execute(&ToolArguments::new()).await.unwrap_err();
        assert_eq!(err.code, "INVALID_ARGUMENT");

        let mut args = query_args("pump");
        args.insert("top_k", 0);
        let err = executor.execute(&args).await.unwrap_err();
        assert_eq!(err.code, "INVALID_ARGUMENT");
    }
}
