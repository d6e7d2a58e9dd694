//! Document store configuration (`[rag]` section)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Raw `[rag]` configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileRagConfig {
    /// Directory indexed at startup
    pub documents_dir: PathBuf,
    /// Chunk length in characters
    pub chunk_size: usize,
    /// Characters shared by consecutive chunks
    pub chunk_overlap: usize,
    /// Default number of passages returned by vector search
    pub top_k: usize,
}

impl Default for FileRagConfig {
    fn default() -> Self {
        Self {
            documents_dir: PathBuf::from("./documents"),
            chunk_size: 1000,
            chunk_overlap: 200,
            top_k: 10,
        }
    }
}
