// file: src/models/mod.rs
// description: data models module exports
// reference: internal module structure

pub mod answer;
pub mod document;
pub mod indexed_entry;
pub mod search_result;

pub use answer::Answer;
pub use document::Document;
pub use indexed_entry::{EntryMetadata, IndexedEntry};
pub use search_result::{QueryResult, SearchResult};
