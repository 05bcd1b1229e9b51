// file: src/models/search_result.rs
// description: Search hit and ranked query result models
// reference: Used for vector similarity search results

use crate::error::{PipelineError, Result};
use crate::utils::Validator;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Score given to hits whose similarity is not a finite number, such as a
/// cosine distance against a zero vector. It is the lowest cosine similarity.
pub const MIN_SCORE: f32 = -1.0;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    /// Sequential entry id assigned at indexing time
    pub document_id: String,

    /// Source identifier (file name) from the entry metadata
    pub source: String,

    /// Full document text
    pub text: String,

    /// Similarity score (higher is more similar)
    pub score: f32,

    /// Optional: Distance reported by the index (lower is more similar)
    pub distance: Option<f32>,
}

impl SearchResult {
    pub fn new(
        document_id: String,
        source: String,
        text: String,
        score: f32,
        distance: Option<f32>,
    ) -> Self {
        Self {
            document_id,
            source,
            text,
            score,
            distance,
        }
    }

    /// Format as a summary string for display
    pub fn format_summary(&self, max_content_len: usize) -> String {
        format!(
            "{} (id {}) | Score: {:.4}\n{}",
            self.source,
            self.document_id,
            self.score,
            Validator::truncate_text(&self.text, max_content_len)
        )
    }

    fn numeric_id(&self) -> u64 {
        self.document_id.parse().unwrap_or(u64::MAX)
    }
}

/// Hits for one query, ranked best first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryResult {
    pub query: String,
    pub hits: Vec<SearchResult>,
}

impl QueryResult {
    /// Ranks `hits` by decreasing score and keeps the best `top_k`.
    ///
    /// Equal scores are ordered by the lowest numeric entry id so the
    /// rank-1 hit is stable across runs. Non-finite scores become
    /// [`MIN_SCORE`].
    pub fn from_hits(query: impl Into<String>, mut hits: Vec<SearchResult>, top_k: usize) -> Self {
        for hit in hits.iter_mut().filter(|h| !h.score.is_finite()) {
            hit.score = MIN_SCORE;
        }

        hits.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.numeric_id().cmp(&b.numeric_id()))
        });
        hits.truncate(top_k);

        Self {
            query: query.into(),
            hits,
        }
    }

    pub fn top(&self) -> Result<&SearchResult> {
        self.hits
            .first()
            .ok_or_else(|| PipelineError::EmptyResult(self.query.clone()))
    }

    pub fn len(&self) -> usize {
        self.hits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }
}
