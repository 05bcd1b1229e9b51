// file: src/lib.rs
// description: library entry point and public api exports
// reference: rust library patterns
#![doc = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/readme.md"))]

pub mod config;
pub mod corpus;
pub mod error;
pub mod index;
pub mod models;
pub mod pipeline;
pub mod providers;
pub mod utils;

pub use config::{
    Config, CorpusConfig, EmbeddingBackend, IndexBackend, IndexConfig, ProviderConfig,
    RetrievalConfig,
};
pub use corpus::DocumentLoader;
pub use error::{PipelineError, Result};
pub use index::{InMemoryIndex, LanceDbIndex, VectorIndex};
pub use models::{Answer, Document, EntryMetadata, IndexedEntry, QueryResult, SearchResult};
pub use pipeline::{IndexingStats, ProgressTracker, PromptTemplate, RagPipeline};
pub use providers::{
    EmbeddingProvider, GeminiEmbeddingClient, GeminiGenerationClient, GenerationProvider,
    HashingEmbedder,
};
pub use utils::Validator;
