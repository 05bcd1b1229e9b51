// file: src/pipeline/orchestrator.rs
// description: coordinates document loading, indexing, retrieval and answer generation
// reference: orchestrates the sequential retrieval-augmented generation workflow

use crate::config::Config;
use crate::corpus::DocumentLoader;
use crate::error::{PipelineError, Result};
use crate::index::{VectorIndex, open_index};
use crate::models::{Answer, Document, IndexedEntry, QueryResult};
use crate::pipeline::progress::{IndexingStats, ProgressTracker};
use crate::pipeline::prompt::PromptTemplate;
use crate::providers::{self, EmbeddingProvider, GenerationProvider};
use crate::utils::Validator;
use std::sync::Arc;
use tracing::{debug, info};

pub struct RagPipeline {
    config: Config,
    embedder: Arc<dyn EmbeddingProvider>,
    generator: Option<Arc<dyn GenerationProvider>>,
    template: PromptTemplate,
    show_progress: bool,
    colored_progress: bool,
}

impl RagPipeline {
    pub fn new(
        config: Config,
        embedder: Arc<dyn EmbeddingProvider>,
        generator: Arc<dyn GenerationProvider>,
    ) -> Self {
        Self {
            config,
            embedder,
            generator: Some(generator),
            template: PromptTemplate::new(),
            show_progress: false,
            colored_progress: true,
        }
    }

    /// Builds the embedding and generation providers from `config`.
    pub fn from_config(config: Config) -> Result<Self> {
        let embedder = providers::embedding_provider(&config.provider)?;
        let generator = providers::generation_provider(&config.provider)?;
        Ok(Self::new(config, embedder, generator))
    }

    /// Builds a pipeline that can load, index and retrieve but not answer.
    pub fn for_retrieval(config: Config) -> Result<Self> {
        let embedder = providers::embedding_provider(&config.provider)?;
        Ok(Self {
            config,
            embedder,
            generator: None,
            template: PromptTemplate::new(),
            show_progress: false,
            colored_progress: true,
        })
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Draws the indexing bar with or without color styles.
    pub fn with_color(mut self, colored: bool) -> Self {
        self.colored_progress = colored;
        self
    }

    fn progress_tracker(&self, total_documents: usize) -> ProgressTracker {
        if self.show_progress {
            ProgressTracker::with_color(total_documents, self.colored_progress)
        } else {
            ProgressTracker::hidden(total_documents)
        }
    }

    pub fn load_documents(&self) -> Result<Vec<Document>> {
        DocumentLoader::load(&self.config.corpus.data_dir)
    }

    /// Inserts every document into a fresh index under its load position.
    pub async fn build_index(
        &self,
        documents: &[Document],
    ) -> Result<(Box<dyn VectorIndex>, IndexingStats)> {
        if documents.is_empty() {
            return Err(PipelineError::EmptyCorpus(self.config.corpus.data_dir.clone()));
        }

        let mut index = open_index(&self.config.index, Arc::clone(&self.embedder)).await?;
        info!(
            "Indexing {} documents into {} index with {}",
            documents.len(),
            index.backend_name(),
            self.embedder.model_name()
        );

        let progress = self.progress_tracker(documents.len());

        for (position, document) in documents.iter().enumerate() {
            let id = IndexedEntry::id_for_position(position);
            index
                .insert(&id, &document.text, IndexedEntry::metadata_for(document))
                .await?;
            progress.inc_document(&document.identifier, document.size);
        }

        let stats = progress.get_stats();
        progress.finish();

        let indexed = index.len().await?;
        if indexed != documents.len() {
            return Err(PipelineError::Index(format!(
                "Index holds {} entries for {} documents",
                indexed,
                documents.len()
            )));
        }

        info!(
            "Indexed {} documents ({} bytes) in {} ms ({:.1} docs/s)",
            stats.documents_indexed,
            stats.total_bytes_indexed,
            stats.duration_ms,
            stats.documents_per_second()
        );
        Ok((index, stats))
    }

    pub async fn retrieve(&self, index: &dyn VectorIndex, query: &str) -> Result<QueryResult> {
        Validator::validate_query(query)?;
        Validator::validate_top_k(self.config.retrieval.top_k)?;

        let result = index.query(query, self.config.retrieval.top_k).await?;
        debug!("Retrieved {} hits for query", result.len());
        Ok(result)
    }

    /// Answers `query` from the rank-1 hit of `result` only.
    pub async fn answer(&self, result: &QueryResult) -> Result<Answer> {
        let generator = self.generator.as_ref().ok_or_else(|| {
            PipelineError::Config("No generation provider configured".to_string())
        })?;

        let top = result.top()?;
        info!("Answering from {} (score {:.4})", top.source, top.score);

        let prompt = self.template.render(&result.query, &top.text);
        let generated = generator.generate(&prompt).await?;

        Ok(Answer::new(result.query.clone(), &generated, top.source.clone()))
    }

    /// Loads, indexes and retrieves without calling the generation provider.
    pub async fn search(&self, query: &str) -> Result<QueryResult> {
        let documents = self.load_documents()?;
        let (index, _) = self.build_index(&documents).await?;
        self.retrieve(index.as_ref(), query).await
    }

    /// Runs the whole pipeline once: load, index, retrieve, generate.
    pub async fn ask(&self, query: &str) -> Result<Answer> {
        if self.generator.is_none() {
            return Err(PipelineError::Config(
                "No generation provider configured".to_string(),
            ));
        }

        let result = self.search(query).await?;
        self.answer(&result).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{EmbeddingBackend, IndexBackend};
    use crate::providers::HashingEmbedder;
    use async_trait::async_trait;
    use std::fs;
    use tempfile::TempDir;

    struct StaticGenerator;

    #[async_trait]
    impl GenerationProvider for StaticGenerator {
        fn model_name(&self) -> &str {
            "static"
        }

        async fn generate(&self, _prompt: &str) -> Result<String> {
            Ok("  Only on Fridays.\n".to_string())
        }
    }

    fn test_config(data_dir: &std::path::Path) -> Config {
        let mut config = Config::default_config();
        config.corpus.data_dir = data_dir.to_path_buf();
        config.index.backend = IndexBackend::Memory;
        config.provider.embedding = EmbeddingBackend::Hashing;
        config
    }

    fn pipeline(config: Config) -> RagPipeline {
        RagPipeline::new(
            config,
            Arc::new(HashingEmbedder::new(256)),
            Arc::new(StaticGenerator),
        )
    }

    #[tokio::test]
    async fn test_empty_corpus_is_reported() {
        let temp = TempDir::new().unwrap();
        let err = pipeline(test_config(temp.path()))
            .ask("Can I work from home?")
            .await
            .unwrap_err();
        assert!(matches!(err, PipelineError::EmptyCorpus(_)));
        assert_eq!(err.exit_code(), 3);
    }

    #[tokio::test]
    async fn test_build_index_assigns_every_document() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("a.txt"), "alpha").unwrap();
        fs::write(temp.path().join("b.txt"), "beta").unwrap();

        let pipeline = pipeline(test_config(temp.path()));
        let documents = pipeline.load_documents().unwrap();
        let (index, stats) = pipeline.build_index(&documents).await.unwrap();

        assert_eq!(index.len().await.unwrap(), 2);
        assert!(stats.is_complete());
    }

    #[tokio::test]
    async fn test_ask_trims_answer() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join("policy.txt"),
            "Interns may work from home on Fridays only.",
        )
        .unwrap();

        let answer = pipeline(test_config(temp.path()))
            .ask("Can interns work from home?")
            .await
            .unwrap();

        assert_eq!(answer.text, "Only on Fridays.");
        assert_eq!(answer.source, "policy.txt");
    }

    #[tokio::test]
    async fn test_retrieval_only_pipeline_cannot_answer() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("a.txt"), "alpha").unwrap();

        let mut config = test_config(temp.path());
        config.provider.api_key = None;
        let pipeline = RagPipeline::for_retrieval(config).unwrap();

        assert_eq!(pipeline.search("alpha").await.unwrap().len(), 1);
        assert!(matches!(
            pipeline.ask("alpha").await,
            Err(PipelineError::Config(_))
        ));
    }

    #[test]
    fn test_progress_color_follows_setting() {
        let temp = TempDir::new().unwrap();
        let plain = pipeline(test_config(temp.path()))
            .with_progress(true)
            .with_color(false);

        assert!(plain.show_progress);
        assert!(!plain.colored_progress);
        assert!(pipeline(test_config(temp.path())).colored_progress);
    }

    #[tokio::test]
    async fn test_blank_query_rejected() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("a.txt"), "alpha").unwrap();

        let err = pipeline(test_config(temp.path())).ask("   ").await.unwrap_err();
        assert!(matches!(err, PipelineError::Validation(_)));
    }
}
