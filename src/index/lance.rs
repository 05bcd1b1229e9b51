// file: src/index/lance.rs
// description: LanceDB-backed vector index with per-run table lifecycle
// reference: https://docs.rs/lancedb

use crate::error::{PipelineError, Result};
use crate::index::VectorIndex;
use crate::models::search_result::MIN_SCORE;
use crate::models::{EntryMetadata, QueryResult, SearchResult};
use crate::providers::EmbeddingProvider;
use arrow_array::{
    Array, FixedSizeListArray, Float32Array, RecordBatch, RecordBatchIterator, StringArray,
};
use arrow_schema::{DataType, Field, Schema};
use async_trait::async_trait;
use futures::StreamExt;
use lancedb::query::{ExecutableQuery, QueryBase};
use lancedb::{Connection, DistanceType, Table, connect};
use std::sync::Arc;
use tracing::{debug, info};

pub struct LanceDbIndex {
    connection: Connection,
    table_name: String,
    embedder: Arc<dyn EmbeddingProvider>,
    table: Option<Table>,
    dimension: Option<usize>,
}

impl LanceDbIndex {
    /// Connects to `uri` and drops any table left behind under
    /// `table_name`, so every run starts from an empty collection.
    pub async fn create(
        uri: &str,
        table_name: &str,
        embedder: Arc<dyn EmbeddingProvider>,
    ) -> Result<Self> {
        info!("Connecting to LanceDB at {}", uri);

        let connection = connect(uri)
            .execute()
            .await
            .map_err(|e| PipelineError::Index(format!("Failed to connect to LanceDB: {}", e)))?;

        let index = Self {
            connection,
            table_name: table_name.to_string(),
            embedder,
            table: None,
            dimension: None,
        };

        if index.table_exists().await? {
            info!("Dropping table left from a previous run: {}", table_name);
            index
                .connection
                .drop_table(table_name)
                .await
                .map_err(|e| {
                    PipelineError::Index(format!("Failed to drop table {}: {}", table_name, e))
                })?;
        }

        Ok(index)
    }

    async fn table_exists(&self) -> Result<bool> {
        let table_names = self
            .connection
            .table_names()
            .execute()
            .await
            .map_err(|e| PipelineError::Index(format!("Failed to list tables: {}", e)))?;

        Ok(table_names.iter().any(|name| name == &self.table_name))
    }

    /// Returns the Arrow schema for index entries with `embedding_dim` vectors
    pub fn entries_schema(embedding_dim: usize) -> Arc<Schema> {
        Arc::new(Schema::new(vec![
            Field::new("id", DataType::Utf8, false),
            Field::new("source", DataType::Utf8, false),
            Field::new("text", DataType::Utf8, false),
            Field::new(
                "embedding",
                DataType::FixedSizeList(
                    Arc::new(Field::new("item", DataType::Float32, true)),
                    embedding_dim as i32,
                ),
                false,
            ),
        ]))
    }

    fn create_record_batch(
        schema: Arc<Schema>,
        id: &str,
        text: &str,
        metadata: &EntryMetadata,
        embedding: Vec<f32>,
    ) -> Result<RecordBatch> {
        let dim = embedding.len() as i32;
        let ids = StringArray::from(vec![id]);
        let sources = StringArray::from(vec![metadata.source.as_str()]);
        let texts = StringArray::from(vec![text]);

        let embedding_list =
            FixedSizeListArray::try_new_from_values(Float32Array::from(embedding), dim).map_err(
                |e| PipelineError::Index(format!("Failed to create embedding array: {}", e)),
            )?;

        RecordBatch::try_new(
            schema,
            vec![
                Arc::new(ids),
                Arc::new(sources),
                Arc::new(texts),
                Arc::new(embedding_list),
            ],
        )
        .map_err(|e| PipelineError::Index(format!("Failed to create record batch: {}", e)))
    }

    fn string_column<'b>(batch: &'b RecordBatch, name: &str) -> Result<&'b StringArray> {
        batch
            .column_by_name(name)
            .ok_or_else(|| PipelineError::Index(format!("Missing '{}' column", name)))?
            .as_any()
            .downcast_ref::<StringArray>()
            .ok_or_else(|| PipelineError::Index(format!("Invalid '{}' column type", name)))
    }
}

#[async_trait]
impl VectorIndex for LanceDbIndex {
    fn backend_name(&self) -> &'static str {
        "lancedb"
    }

    async fn insert(&mut self, id: &str, text: &str, metadata: EntryMetadata) -> Result<()> {
        let embedding = self.embedder.embed(text).await?;
        let dim = embedding.len();

        match self.dimension {
            Some(expected) if expected != dim => {
                return Err(PipelineError::Index(format!(
                    "Embedding dimension {} does not match index dimension {}",
                    dim, expected
                )));
            }
            _ => {}
        }

        let schema = Self::entries_schema(dim);
        let record_batch =
            Self::create_record_batch(schema.clone(), id, text, &metadata, embedding)?;
        let batches = RecordBatchIterator::new(vec![Ok(record_batch)], schema);

        match &self.table {
            Some(table) => {
                table.add(batches).execute().await.map_err(|e| {
                    PipelineError::Index(format!("Failed to insert entry {}: {}", id, e))
                })?;
            }
            None => {
                let table = self
                    .connection
                    .create_table(&self.table_name, batches)
                    .execute()
                    .await
                    .map_err(|e| PipelineError::Index(format!("Failed to create table: {}", e)))?;
                info!("Created new table: {}", self.table_name);
                self.table = Some(table);
                self.dimension = Some(dim);
            }
        }

        debug!("Indexed entry {} ({})", id, metadata.source);
        Ok(())
    }

    async fn query(&self, text: &str, top_k: usize) -> Result<QueryResult> {
        let Some(table) = &self.table else {
            return Ok(QueryResult::from_hits(text, Vec::new(), top_k));
        };

        let query_embedding = self.embedder.embed(text).await?;

        // Fetch every row so ties at the top_k boundary are broken by id
        // before truncation rather than by LanceDB's scan order.
        let limit = top_k.max(self.len().await?);
        debug!("Performing vector search with limit {} for top {}", limit, top_k);

        let mut results_stream = table
            .vector_search(query_embedding)
            .map_err(|e| PipelineError::Index(format!("Failed to create vector search: {}", e)))?
            .distance_type(DistanceType::Cosine)
            .limit(limit)
            .execute()
            .await
            .map_err(|e| PipelineError::Index(format!("Vector search failed: {}", e)))?;

        let mut hits = Vec::new();

        while let Some(batch_result) = results_stream.next().await {
            let batch = batch_result
                .map_err(|e| PipelineError::Index(format!("Failed to read result batch: {}", e)))?;

            let ids = Self::string_column(&batch, "id")?;
            let sources = Self::string_column(&batch, "source")?;
            let texts = Self::string_column(&batch, "text")?;

            // LanceDB reports cosine distance in a special column
            let distances = batch
                .column_by_name("_distance")
                .and_then(|col| col.as_any().downcast_ref::<Float32Array>());

            for i in 0..batch.num_rows() {
                let distance = distances.filter(|d| d.is_valid(i)).map(|d| d.value(i));
                let score = distance.map(|d| 1.0 - d).unwrap_or(MIN_SCORE);

                hits.push(SearchResult::new(
                    ids.value(i).to_string(),
                    sources.value(i).to_string(),
                    texts.value(i).to_string(),
                    score,
                    distance,
                ));
            }
        }

        debug!("Vector search returned {} results", hits.len());
        Ok(QueryResult::from_hits(text, hits, top_k))
    }

    async fn len(&self) -> Result<usize> {
        match &self.table {
            Some(table) => table
                .count_rows(None)
                .await
                .map_err(|e| PipelineError::Index(format!("Failed to count rows: {}", e))),
            None => Ok(0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::HashingEmbedder;
    use tempfile::TempDir;

    #[test]
    fn test_schema_generation() {
        let schema = LanceDbIndex::entries_schema(384);
        assert_eq!(schema.fields().len(), 4);

        let embedding_field = schema.field_with_name("embedding").unwrap();
        assert!(matches!(
            embedding_field.data_type(),
            DataType::FixedSizeList(_, 384)
        ));
    }

    #[test]
    fn test_record_batch() {
        let schema = LanceDbIndex::entries_schema(3);
        let batch = LanceDbIndex::create_record_batch(
            schema,
            "0",
            "hello",
            &EntryMetadata {
                source: "hello.txt".to_string(),
            },
            vec![0.1, 0.2, 0.3],
        )
        .unwrap();

        assert_eq!(batch.num_rows(), 1);
        assert_eq!(
            LanceDbIndex::string_column(&batch, "source").unwrap().value(0),
            "hello.txt"
        );
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_insert_and_query_round_trip() {
        let temp = TempDir::new().unwrap();
        let uri = temp.path().join("lancedb").display().to_string();
        let embedder = Arc::new(HashingEmbedder::new(64));

        let mut index = LanceDbIndex::create(&uri, "entries", embedder.clone())
            .await
            .unwrap();
        index
            .insert(
                "0",
                "The cafeteria opens at noon.",
                EntryMetadata {
                    source: "food.txt".to_string(),
                },
            )
            .await
            .unwrap();
        index
            .insert(
                "1",
                "Interns may work from home on Fridays only.",
                EntryMetadata {
                    source: "policy.txt".to_string(),
                },
            )
            .await
            .unwrap();

        assert_eq!(index.len().await.unwrap(), 2);

        let result = index.query("Can interns work from home?", 3).await.unwrap();
        assert_eq!(result.len(), 2);
        assert_eq!(result.top().unwrap().source, "policy.txt");

        // Reopening starts from an empty collection
        let reopened = LanceDbIndex::create(&uri, "entries", embedder).await.unwrap();
        assert_eq!(reopened.len().await.unwrap(), 0);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_tied_scores_keep_lowest_ids() {
        let temp = TempDir::new().unwrap();
        let uri = temp.path().join("lancedb").display().to_string();
        let mut index = LanceDbIndex::create(&uri, "ties", Arc::new(HashingEmbedder::new(32)))
            .await
            .unwrap();

        for position in 0..5 {
            index
                .insert(
                    &position.to_string(),
                    "Every handbook page says the same thing.",
                    EntryMetadata {
                        source: format!("copy{}.txt", position),
                    },
                )
                .await
                .unwrap();
        }

        let result = index.query("handbook page", 3).await.unwrap();
        let ids: Vec<&str> = result.hits.iter().map(|h| h.document_id.as_str()).collect();

        assert_eq!(ids, vec!["0", "1", "2"]);
        assert_eq!(result.top().unwrap().source, "copy0.txt");
    }
}
