// file: src/models/indexed_entry.rs
// description: vector index entry model and its source metadata
// reference: internal data structures

use crate::models::Document;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryMetadata {
    pub source: String,
}

/// A document as stored in the vector index, keyed by its load position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexedEntry {
    pub document_id: String,
    pub text: String,
    pub metadata: EntryMetadata,
    pub embedding: Vec<f32>,
}

impl IndexedEntry {
    pub fn new(
        document_id: String,
        text: String,
        metadata: EntryMetadata,
        embedding: Vec<f32>,
    ) -> Self {
        Self {
            document_id,
            text,
            metadata,
            embedding,
        }
    }

    /// Sequential id for the document at `position` in load order.
    pub fn id_for_position(position: usize) -> String {
        position.to_string()
    }

    pub fn metadata_for(document: &Document) -> EntryMetadata {
        EntryMetadata {
            source: document.identifier.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequential_ids() {
        assert_eq!(IndexedEntry::id_for_position(0), "0");
        assert_eq!(IndexedEntry::id_for_position(12), "12");
    }

    #[test]
    fn test_metadata_uses_identifier() {
        let doc = Document::new("leave.txt", "Annual leave is 20 days.");
        assert_eq!(IndexedEntry::metadata_for(&doc).source, "leave.txt");
    }
}
