// file: src/providers/hashing.rs
// description: deterministic bag-of-words embeddings via feature hashing
// reference: offline retrieval without a network provider

use crate::error::Result;
use crate::providers::EmbeddingProvider;
use async_trait::async_trait;
use sha2::{Digest, Sha256};

/// Hashes lowercase word tokens into a fixed number of buckets and
/// L2-normalizes the counts. Texts sharing words land close together
/// under cosine similarity.
pub struct HashingEmbedder {
    dimensions: usize,
    name: String,
}

impl HashingEmbedder {
    pub fn new(dimensions: usize) -> Self {
        let dimensions = dimensions.max(1);
        Self {
            dimensions,
            name: format!("hashing-{}", dimensions),
        }
    }

    pub fn embed_text(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.dimensions];

        for token in tokenize(text) {
            let digest = Sha256::digest(token.as_bytes());
            let bucket = u64::from_le_bytes([
                digest[0], digest[1], digest[2], digest[3], digest[4], digest[5], digest[6],
                digest[7],
            ]) as usize
                % self.dimensions;
            vector[bucket] += 1.0;
        }

        let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > f32::EPSILON {
            vector.iter_mut().for_each(|x| *x /= norm);
        }
        vector
    }
}

fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
}

#[async_trait]
impl EmbeddingProvider for HashingEmbedder {
    fn model_name(&self) -> &str {
        &self.name
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        Ok(self.embed_text(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::cosine_similarity;

    #[test]
    fn test_dimensions_and_norm() {
        let embedder = HashingEmbedder::new(64);
        let v = embedder.embed_text("Interns may work from home on Fridays only.");
        assert_eq!(v.len(), 64);
        let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_deterministic() {
        let embedder = HashingEmbedder::new(128);
        assert_eq!(embedder.embed_text("same text"), embedder.embed_text("same text"));
    }

    #[test]
    fn test_case_and_punctuation_insensitive() {
        let embedder = HashingEmbedder::new(128);
        assert_eq!(
            embedder.embed_text("Work, from HOME!"),
            embedder.embed_text("work from home")
        );
    }

    #[test]
    fn test_empty_text_is_zero_vector() {
        let embedder = HashingEmbedder::new(16);
        assert!(embedder.embed_text("  ...  ").iter().all(|&x| x == 0.0));
    }

    #[test]
    fn test_shared_words_are_closer() {
        let embedder = HashingEmbedder::new(256);
        let query = embedder.embed_text("can interns work from home");
        let related = embedder.embed_text("interns may work from home on fridays");
        let unrelated = embedder.embed_text("the cafeteria serves lunch at noon");

        assert!(cosine_similarity(&query, &related) > cosine_similarity(&query, &unrelated));
    }

    #[tokio::test]
    async fn test_trait_embed() {
        let embedder = HashingEmbedder::new(32);
        let v = embedder.embed("hello").await.unwrap();
        assert_eq!(v.len(), 32);
        assert_eq!(embedder.model_name(), "hashing-32");
    }
}
