//! Local document store
//!
//! A directory of uploaded documents, indexed once at startup. Text files
//! are split into overlapping chunks and searched by lexical similarity;
//! every file (including spreadsheets) is listed with its metadata.

pub mod chunking;
pub mod lexical;
pub mod local;

pub use local::LocalDocumentStore;
