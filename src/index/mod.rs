// file: src/index/mod.rs
// description: vector index trait, similarity helper and backend selection
// reference: internal module structure

pub mod lance;
pub mod memory;

pub use lance::LanceDbIndex;
pub use memory::InMemoryIndex;

use crate::config::{IndexBackend, IndexConfig};
use crate::error::Result;
use crate::models::{EntryMetadata, QueryResult};
use crate::providers::EmbeddingProvider;
use async_trait::async_trait;
use std::sync::Arc;

/// Nearest-neighbour store that embeds text on the way in and on query.
#[async_trait]
pub trait VectorIndex: Send + Sync {
    fn backend_name(&self) -> &'static str;

    /// Embeds `text` and stores it under `id`. Ids must be unique.
    async fn insert(&mut self, id: &str, text: &str, metadata: EntryMetadata) -> Result<()>;

    /// Returns at most `top_k` entries ranked by decreasing similarity to `text`.
    async fn query(&self, text: &str, top_k: usize) -> Result<QueryResult>;

    async fn len(&self) -> Result<usize>;

    async fn is_empty(&self) -> Result<bool> {
        Ok(self.len().await? == 0)
    }
}

/// Creates a fresh, empty index for this run.
pub async fn open_index(
    config: &IndexConfig,
    embedder: Arc<dyn EmbeddingProvider>,
) -> Result<Box<dyn VectorIndex>> {
    match config.backend {
        IndexBackend::Memory => Ok(Box::new(InMemoryIndex::new(embedder))),
        IndexBackend::LanceDb => Ok(Box::new(
            LanceDbIndex::create(&config.uri, &config.collection, embedder).await?,
        )),
    }
}

/// Cosine similarity in `[-1.0, 1.0]`; `0.0` for empty, zero or mismatched vectors.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;

    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    let denom = norm_a.sqrt() * norm_b.sqrt();
    if denom < f32::EPSILON {
        return 0.0;
    }

    dot / denom
}
