//! `list_files_tool` — list the documents available to the assistant.

use super::store_error;
use async_trait::async_trait;
use rag_application::ports::{document_store::DocumentStorePort, tool_executor::ToolExecutorPort};
use rag_domain::tool::{
    entities::{ToolArguments, ToolSpec},
    value_objects::{ToolError, ToolPayload},
};
use serde_json::{Map, Value};
use std::sync::Arc;

pub const NAME: &str = "list_files_tool";

pub const EMPTY_MESSAGE: &str = "No files have been uploaded.";

pub fn list_files_definition() -> ToolSpec {
    ToolSpec::new(
        NAME,
        "List the uploaded documents with their ids, sizes and tags. \
         Examples: 'what files do we have', 'show the uploaded documents'.",
    )
}

/// Executor for `list_files_tool`
pub struct ListFilesExecutor {
    store: Arc<dyn DocumentStorePort>,
}

impl ListFilesExecutor {
    pub fn new(store: Arc<dyn DocumentStorePort>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl ToolExecutorPort for ListFilesExecutor {
    fn tool_name(&self) -> &str {
        NAME
    }

    async fn execute(&self, _arguments: &ToolArguments) -> Result<ToolPayload, ToolError> {
        let documents = self.store.list_documents().await.map_err(store_error)?;
        if documents.is_empty() {
            return Ok(ToolPayload::text(EMPTY_MESSAGE));
        }

        let records = documents
            .into_iter()
            .map(|doc| {
                let mut record = Map::new();
                record.insert("file_id".into(), Value::from(doc.id));
                record.insert("filename".into(), Value::from(doc.filename));
                record.insert("size_bytes".into(), Value::from(doc.size_bytes));
                record.insert(
                    "modified".into(),
                    doc.modified.map(Value::from).unwrap_or(Value::Null),
                );
                record.insert("tags".into(), Value::from(doc.tags));
                record.insert("chunk_count".into(), Value::from(doc.chunk_count));
                record
            })
            .collect();

        Ok(ToolPayload::Records(records))
    }
}
