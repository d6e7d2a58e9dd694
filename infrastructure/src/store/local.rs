//! Directory-backed document store

use super::chunking::chunk_text;
use super::lexical::TermVector;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rag_application::ports::document_store::{
    DocumentInfo, DocumentStorePort, FileSelector, SearchFilter, SearchHit, StoreError,
};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Extensions indexed for similarity search
const TEXT_EXTENSIONS: &[&str] = &["txt", "md", "markdown", "rst", "csv", "json", "log"];

struct IndexedChunk {
    content: String,
    terms: TermVector,
}

struct StoredDocument {
    info: DocumentInfo,
    path: PathBuf,
    chunks: Vec<IndexedChunk>,
}

/// Immutable index over a documents directory.
///
/// Built once by [`open`](Self::open); searches only read it, so one
/// instance is shared by all concurrent queries.
pub struct LocalDocumentStore {
    root: PathBuf,
    documents: Vec<StoredDocument>,
}

impl LocalDocumentStore {
    /// Index every file under `root`. A missing directory yields an empty store.
    pub fn open(
        root: impl Into<PathBuf>,
        chunk_size: usize,
        chunk_overlap: usize,
    ) -> Result<Self, StoreError> {
        let root = root.into();
        if !root.exists() {
            warn!("Documents directory {} does not exist, store is empty", root.display());
            return Ok(Self::empty(root));
        }
        if !root.is_dir() {
            return Err(StoreError::Io(format!("{} is not a directory", root.display())));
        }

        let mut documents = Vec::new();
        let walker = WalkDir::new(&root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !is_hidden(e.file_name()));

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Skipping unreadable entry: {}", e);
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }

            match index_file(&root, entry.path(), chunk_size, chunk_overlap) {
                Ok(doc) => documents.push(doc),
                Err(e) => warn!("Skipping {}: {}", entry.path().display(), e),
            }
        }

        info!(
            "Indexed {} document(s), {} chunk(s) from {}",
            documents.len(),
            documents.iter().map(|d| d.chunks.len()).sum::<usize>(),
            root.display()
        );

        Ok(Self { root, documents })
    }

    pub fn empty(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            documents: Vec::new(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    fn matches_filter(doc: &StoredDocument, filter: &SearchFilter) -> bool {
        if let Some(name) = &filter.filename {
            let needle = name.to_lowercase();
            if !doc.info.filename.to_lowercase().contains(&needle)
                && !doc.info.id.to_lowercase().contains(&needle)
            {
                return false;
            }
        }
        if !filter.tags.is_empty() {
            let has_tag = doc
                .info
                .tags
                .iter()
                .any(|t| filter.tags.iter().any(|f| f.eq_ignore_ascii_case(t)));
            if !has_tag {
                return false;
            }
        }
        true
    }
}

fn is_hidden(name: &std::ffi::OsStr) -> bool {
    name.to_str().map(|s| s.starts_with('.')).unwrap_or(false)
}

fn index_file(
    root: &Path,
    path: &Path,
    chunk_size: usize,
    chunk_overlap: usize,
) -> Result<StoredDocument, StoreError> {
    let metadata = std::fs::metadata(path).map_err(|e| StoreError::Io(e.to_string()))?;
    let relative = path.strip_prefix(root).unwrap_or(path);

    let id = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/");
    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| id.clone());
    let tags = relative
        .parent()
        .map(|p| {
            p.components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect()
        })
        .unwrap_or_default();
    let modified = metadata
        .modified()
        .ok()
        .map(|t| DateTime::<Utc>::from(t).to_rfc3339());

    let chunks = if is_text_file(path) {
        match std::fs::read_to_string(path) {
            Ok(content) => chunk_text(&content, chunk_size, chunk_overlap)
                .into_iter()
                .map(|content| IndexedChunk {
                    terms: TermVector::from_text(&content),
                    content,
                })
                .collect(),
            Err(e) => {
                debug!("Not indexing {} as text: {}", path.display(), e);
                Vec::new()
            }
        }
    } else {
        Vec::new()
    };

    Ok(StoredDocument {
        info: DocumentInfo {
            id,
            filename,
            size_bytes: metadata.len(),
            modified,
            tags,
            chunk_count: chunks.len(),
        },
        path: path.to_path_buf(),
        chunks,
    })
}

fn is_text_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| TEXT_EXTENSIONS.contains(&e.to_lowercase().as_str()))
        .unwrap_or(false)
}

#[async_trait]
impl DocumentStorePort for LocalDocumentStore {
    async fn list_documents(&self) -> Result<Vec<DocumentInfo>, StoreError> {
        Ok(self.documents.iter().map(|d| d.info.clone()).collect())
    }

    async fn search(&self, query: &str, filter: &SearchFilter) -> Result<Vec<SearchHit>, StoreError> {
        let query_terms = TermVector::from_text(query);
        if query_terms.is_empty() || filter.top_k == 0 {
            return Ok(Vec::new());
        }

        let mut hits: Vec<SearchHit> = self
            .documents
            .iter()
            .filter(|doc| Self::matches_filter(doc, filter))
            .flat_map(|doc| {
                doc.chunks.iter().enumerate().map(move |(index, chunk)| (doc, index, chunk))
            })
            .filter_map(|(doc, index, chunk)| {
                let score = query_terms.cosine(&chunk.terms);
                (score > 0.0).then(|| SearchHit {
                    document_id: doc.info.id.clone(),
                    filename: doc.info.filename.clone(),
                    chunk_index: index,
                    content: chunk.content.clone(),
                    score,
                })
            })
            .collect();

        hits.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        hits.truncate(filter.top_k);
        Ok(hits)
    }

    async fn locate(&self, selector: &FileSelector) -> Result<(DocumentInfo, PathBuf), StoreError> {
        if let Some(id) = &selector.file_id
            && let Some(doc) = self.documents.iter().find(|d| &d.info.id == id)
        {
            return Ok((doc.info.clone(), doc.path.clone()));
        }

        if let Some(name) = &selector.filename {
            let needle = name.to_lowercase();
            let exact = self
                .documents
                .iter()
                .find(|d| d.info.filename.to_lowercase() == needle);
            let partial = || {
                self.documents
                    .iter()
                    .find(|d| d.info.filename.to_lowercase().contains(&needle))
            };
            if let Some(doc) = exact.or_else(partial) {
                return Ok((doc.info.clone(), doc.path.clone()));
            }
        }

        let wanted = selector
            .file_id
            .as_deref()
            .or(selector.filename.as_deref())
            .unwrap_or("(no file_id or filename)");
        Err(StoreError::NotFound(wanted.to_string()))
    }
}
