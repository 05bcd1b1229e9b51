// file: src/config.rs
// description: application configuration management with toml and env support
// reference: https://docs.rs/config

use crate::error::{PipelineError, Result};
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable holding the provider credential.
pub const API_KEY_ENV: &str = "GOOGLE_API_KEY";

pub const DEFAULT_QUERY: &str = "I just joined as a new intern. Can I work from home?";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub corpus: CorpusConfig,
    pub provider: ProviderConfig,
    pub index: IndexConfig,
    pub retrieval: RetrievalConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CorpusConfig {
    pub data_dir: PathBuf,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProviderConfig {
    #[serde(default)]
    pub api_key: Option<String>,
    pub base_url: String,
    pub embedding: EmbeddingBackend,
    pub embedding_model: String,
    #[serde(default)]
    pub embedding_task_type: Option<String>,
    pub hashing_dimensions: usize,
    pub generation_model: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingBackend {
    Gemini,
    Hashing,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct IndexConfig {
    pub backend: IndexBackend,
    pub uri: String,
    pub collection: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexBackend {
    LanceDb,
    Memory,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RetrievalConfig {
    pub top_k: usize,
    pub default_query: String,
}

impl Config {
    /// Layers built-in defaults, an optional TOML file and `NEBULA_RAG__*`
    /// environment variables, then fills the API key from `GOOGLE_API_KEY`.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        dotenv().ok();

        let defaults = config::Config::try_from(&Self::default_config())
            .map_err(|e| PipelineError::Config(e.to_string()))?;

        let mut builder = config::Config::builder().add_source(defaults);

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path));
        } else {
            builder = builder
                .add_source(config::File::from(Path::new("config/default.toml")).required(false));
        }

        builder = builder.add_source(
            config::Environment::with_prefix("NEBULA_RAG")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .map_err(|e| PipelineError::Config(e.to_string()))?;

        let mut config: Config = settings
            .try_deserialize()
            .map_err(|e| PipelineError::Config(e.to_string()))?;

        if config.provider.api_key.as_deref().is_none_or(str::is_empty) {
            config.provider.api_key = std::env::var(API_KEY_ENV).ok();
        }

        config.validate()?;
        Ok(config)
    }

    pub fn default_config() -> Self {
        Self {
            corpus: CorpusConfig {
                data_dir: PathBuf::from("data"),
            },
            provider: ProviderConfig {
                api_key: None,
                base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
                embedding: EmbeddingBackend::Gemini,
                embedding_model: "models/text-embedding-004".to_string(),
                embedding_task_type: None,
                hashing_dimensions: 256,
                generation_model: "gemini-2.0-flash".to_string(),
            },
            index: IndexConfig {
                backend: IndexBackend::LanceDb,
                uri: ".nebula_rag/lancedb".to_string(),
                collection: "nebula_rag".to_string(),
            },
            retrieval: RetrievalConfig {
                top_k: 3,
                default_query: DEFAULT_QUERY.to_string(),
            },
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.retrieval.top_k == 0 {
            return Err(PipelineError::Config(
                "top_k must be greater than 0".to_string(),
            ));
        }

        if self.index.collection.trim().is_empty() {
            return Err(PipelineError::Config(
                "index collection name must not be empty".to_string(),
            ));
        }

        if self.index.backend == IndexBackend::LanceDb && self.index.uri.trim().is_empty() {
            return Err(PipelineError::Config(
                "index uri is required for the lancedb backend".to_string(),
            ));
        }

        if self.provider.embedding == EmbeddingBackend::Hashing
            && self.provider.hashing_dimensions == 0
        {
            return Err(PipelineError::Config(
                "hashing_dimensions must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

impl ProviderConfig {
    /// Returns the API key, failing when it is absent or blank.
    pub fn require_api_key(&self) -> Result<&str> {
        match self.api_key.as_deref().map(str::trim) {
            Some(key) if !key.is_empty() => Ok(key),
            _ => Err(PipelineError::Config(format!(
                "{} is not set; export it or add it to .env",
                API_KEY_ENV
            ))),
        }
    }
}
