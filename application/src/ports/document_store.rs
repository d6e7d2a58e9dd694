//! Document store port
//!
//! Consumed only by the document-facing tool executors (vector search,
//! file listing, spreadsheet preview), never by the orchestration core.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Errors from the document store
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Document not found: {0}")]
    NotFound(String),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("Unsupported document: {0}")]
    Unsupported(String),
}

/// Metadata of one stored document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentInfo {
    /// Stable identifier (path relative to the store root)
    pub id: String,
    /// File name without directories
    pub filename: String,
    /// Size in bytes
    pub size_bytes: u64,
    /// Last modification time (RFC 3339), if known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified: Option<String>,
    /// Tags attached to the document
    #[serde(default)]
    pub tags: Vec<String>,
    /// Number of indexed text chunks (0 for non-text files)
    pub chunk_count: usize,
}

/// Restrictions applied to a similarity search
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchFilter {
    /// Case-insensitive partial match on the file name
    pub filename: Option<String>,
    /// Document must carry at least one of these tags (case-insensitive)
    pub tags: Vec<String>,
    /// Maximum number of hits
    pub top_k: usize,
}

impl SearchFilter {
    pub fn new(top_k: usize) -> Self {
        Self {
            filename: None,
            tags: Vec::new(),
            top_k,
        }
    }

    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }
}

/// One chunk returned by a similarity search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub document_id: String,
    pub filename: String,
    pub chunk_index: usize,
    pub content: String,
    /// Similarity in `[0, 1]`
    pub score: f64,
}

/// How a caller identifies a single document.
///
/// An exact `file_id` match wins; otherwise `filename` is a
/// case-insensitive partial match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileSelector {
    pub file_id: Option<String>,
    pub filename: Option<String>,
}

impl FileSelector {
    pub fn is_empty(&self) -> bool {
        self.file_id.is_none() && self.filename.is_none()
    }
}

/// Port for the document/file store
#[async_trait]
pub trait DocumentStorePort: Send + Sync {
    /// Metadata of every stored document
    async fn list_documents(&self) -> Result<Vec<DocumentInfo>, StoreError>;

    /// Chunks most similar to `query`, best first
    async fn search(&self, query: &str, filter: &SearchFilter) -> Result<Vec<SearchHit>, StoreError>;

    /// Resolve a selector to the document's metadata and readable path
    async fn locate(&self, selector: &FileSelector) -> Result<(DocumentInfo, PathBuf), StoreError>;
}
