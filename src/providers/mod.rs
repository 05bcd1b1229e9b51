// file: src/providers/mod.rs
// description: embedding and generation provider traits and constructors
// reference: internal module structure

pub mod gemini;
pub mod hashing;

pub use gemini::{GeminiEmbeddingClient, GeminiGenerationClient};
pub use hashing::HashingEmbedder;

use crate::config::{EmbeddingBackend, ProviderConfig};
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Turns text into a vector.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    fn model_name(&self) -> &str;

    async fn embed(&self, text: &str) -> Result<Vec<f32>>;
}

/// Produces text for a prompt.
#[async_trait]
pub trait GenerationProvider: Send + Sync {
    fn model_name(&self) -> &str;

    async fn generate(&self, prompt: &str) -> Result<String>;
}

pub fn embedding_provider(config: &ProviderConfig) -> Result<Arc<dyn EmbeddingProvider>> {
    match config.embedding {
        EmbeddingBackend::Gemini => Ok(Arc::new(GeminiEmbeddingClient::from_config(config)?)),
        EmbeddingBackend::Hashing => Ok(Arc::new(HashingEmbedder::new(config.hashing_dimensions))),
    }
}

pub fn generation_provider(config: &ProviderConfig) -> Result<Arc<dyn GenerationProvider>> {
    Ok(Arc::new(GeminiGenerationClient::from_config(config)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::error::PipelineError;

    #[test]
    fn test_gemini_requires_api_key() {
        let mut provider = Config::default_config().provider;
        provider.api_key = None;

        assert!(matches!(
            embedding_provider(&provider),
            Err(PipelineError::Config(_))
        ));
        assert!(matches!(
            generation_provider(&provider),
            Err(PipelineError::Config(_))
        ));
    }

    #[test]
    fn test_hashing_needs_no_key() {
        let mut provider = Config::default_config().provider;
        provider.api_key = None;
        provider.embedding = EmbeddingBackend::Hashing;

        let embedder = embedding_provider(&provider).unwrap();
        assert_eq!(embedder.model_name(), "hashing-256");
    }
}
