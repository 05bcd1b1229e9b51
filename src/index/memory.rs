// file: src/index/memory.rs
// description: in-process vector index with brute-force cosine search
// reference: exact nearest-neighbour search over a small corpus

use crate::error::{PipelineError, Result};
use crate::index::{VectorIndex, cosine_similarity};
use crate::models::{EntryMetadata, IndexedEntry, QueryResult, SearchResult};
use crate::providers::EmbeddingProvider;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

/// Keeps every entry in memory and scores all of them on each query.
pub struct InMemoryIndex {
    embedder: Arc<dyn EmbeddingProvider>,
    entries: Vec<IndexedEntry>,
}

impl InMemoryIndex {
    pub fn new(embedder: Arc<dyn EmbeddingProvider>) -> Self {
        Self {
            embedder,
            entries: Vec::new(),
        }
    }
}

#[async_trait]
impl VectorIndex for InMemoryIndex {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn insert(&mut self, id: &str, text: &str, metadata: EntryMetadata) -> Result<()> {
        if self.entries.iter().any(|e| e.document_id == id) {
            return Err(PipelineError::Index(format!("Duplicate entry id: {}", id)));
        }

        let embedding = self.embedder.embed(text).await?;
        if let Some(first) = self.entries.first()
            && first.embedding.len() != embedding.len()
        {
            return Err(PipelineError::Index(format!(
                "Embedding dimension {} does not match index dimension {}",
                embedding.len(),
                first.embedding.len()
            )));
        }

        debug!("Indexed entry {} ({})", id, metadata.source);
        self.entries.push(IndexedEntry::new(
            id.to_string(),
            text.to_string(),
            metadata,
            embedding,
        ));
        Ok(())
    }

    async fn query(&self, text: &str, top_k: usize) -> Result<QueryResult> {
        if self.entries.is_empty() {
            return Ok(QueryResult::from_hits(text, Vec::new(), top_k));
        }

        let query_embedding = self.embedder.embed(text).await?;

        let hits = self
            .entries
            .iter()
            .map(|entry| {
                let score = cosine_similarity(&query_embedding, &entry.embedding);
                SearchResult::new(
                    entry.document_id.clone(),
                    entry.metadata.source.clone(),
                    entry.text.clone(),
                    score,
                    Some(1.0 - score),
                )
            })
            .collect();

        Ok(QueryResult::from_hits(text, hits, top_k))
    }

    async fn len(&self) -> Result<usize> {
        Ok(self.entries.len())
    }
}
