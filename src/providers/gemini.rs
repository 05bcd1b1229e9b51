// file: src/providers/gemini.rs
// description: Gemini API integration for text embeddings and generation
// reference: https://ai.google.dev/api/embeddings, https://ai.google.dev/api/generate-content

use crate::config::ProviderConfig;
use crate::error::{PipelineError, Result};
use crate::providers::{EmbeddingProvider, GenerationProvider};
use crate::utils::Validator;
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

impl Content {
    fn text(role: Option<&str>, text: &str) -> Self {
        Self {
            role: role.map(str::to_string),
            parts: vec![Part {
                text: text.to_string(),
            }],
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct EmbedContentRequest {
    model: String,
    content: Content,
    #[serde(skip_serializing_if = "Option::is_none")]
    task_type: Option<String>,
}

#[derive(Debug, Deserialize)]
struct EmbedContentResponse {
    embedding: Option<ContentEmbedding>,
}

#[derive(Debug, Deserialize)]
struct ContentEmbedding {
    values: Vec<f32>,
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<Content>,
    #[serde(default)]
    finish_reason: Option<String>,
}

/// Model names are accepted with or without the `models/` prefix.
fn model_path(model: &str) -> String {
    if model.starts_with("models/") {
        model.to_string()
    } else {
        format!("models/{}", model)
    }
}

async fn read_json<T: DeserializeOwned>(response: Response, api: &str) -> Result<T> {
    if !response.status().is_success() {
        let status = response.status();
        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        return Err(PipelineError::Provider(format!(
            "Gemini {} request failed with status {}: {}",
            api, status, error_text
        )));
    }

    response.json().await.map_err(|e| {
        PipelineError::Provider(format!("Failed to parse Gemini {} response: {}", api, e))
    })
}

fn embedding_from_response(response: EmbedContentResponse) -> Result<Vec<f32>> {
    match response.embedding {
        Some(embedding) if !embedding.values.is_empty() => Ok(embedding.values),
        _ => Err(PipelineError::Provider(
            "No embedding data returned from Gemini API".to_string(),
        )),
    }
}

fn text_from_response(response: GenerateContentResponse) -> Result<String> {
    let candidate = response.candidates.into_iter().next().ok_or_else(|| {
        PipelineError::Provider("Gemini API returned no candidates".to_string())
    })?;

    let text: String = candidate
        .content
        .map(|content| content.parts.into_iter().map(|p| p.text).collect())
        .unwrap_or_default();

    if text.is_empty() {
        return Err(PipelineError::Provider(format!(
            "Gemini API returned an empty candidate (finish reason: {})",
            candidate.finish_reason.as_deref().unwrap_or("unknown")
        )));
    }

    Ok(text)
}

pub struct GeminiEmbeddingClient {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    task_type: Option<String>,
}

impl GeminiEmbeddingClient {
    pub fn new(api_key: String, base_url: String, model: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model_path(&model),
            task_type: None,
        }
    }

    pub fn from_config(config: &ProviderConfig) -> Result<Self> {
        let api_key = config.require_api_key()?.to_string();
        Validator::validate_url(&config.base_url)
            .map_err(|e| PipelineError::Config(e.to_string()))?;

        let mut client = Self::new(
            api_key,
            config.base_url.clone(),
            config.embedding_model.clone(),
        );
        client.task_type = config.embedding_task_type.clone();
        Ok(client)
    }

    fn endpoint(&self) -> String {
        format!("{}/{}:embedContent", self.base_url, self.model)
    }
}

#[async_trait]
impl EmbeddingProvider for GeminiEmbeddingClient {
    fn model_name(&self) -> &str {
        &self.model
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let request = EmbedContentRequest {
            model: self.model.clone(),
            content: Content::text(None, text),
            task_type: self.task_type.clone(),
        };

        debug!(
            "Requesting embedding from Gemini API for {} chars",
            text.len()
        );

        let response = self
            .client
            .post(self.endpoint())
            .query(&[("key", self.api_key.as_str())])
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                PipelineError::Provider(format!("Failed to send Gemini embedding request: {}", e))
            })?;

        let embedding = embedding_from_response(read_json(response, "embedding").await?)?;
        debug!("Received embedding of dimension {}", embedding.len());
        Ok(embedding)
    }
}

pub struct GeminiGenerationClient {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl GeminiGenerationClient {
    pub fn new(api_key: String, base_url: String, model: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model_path(&model),
        }
    }

    pub fn from_config(config: &ProviderConfig) -> Result<Self> {
        let api_key = config.require_api_key()?.to_string();
        Validator::validate_url(&config.base_url)
            .map_err(|e| PipelineError::Config(e.to_string()))?;

        Ok(Self::new(
            api_key,
            config.base_url.clone(),
            config.generation_model.clone(),
        ))
    }

    fn endpoint(&self) -> String {
        format!("{}/{}:generateContent", self.base_url, self.model)
    }
}

#[async_trait]
impl GenerationProvider for GeminiGenerationClient {
    fn model_name(&self) -> &str {
        &self.model
    }

    async fn generate(&self, prompt: &str) -> Result<String> {
        let request = GenerateContentRequest {
            contents: vec![Content::text(Some("user"), prompt)],
        };

        debug!("Requesting generation from {} ({} chars)", self.model, prompt.len());

        let response = self
            .client
            .post(self.endpoint())
            .query(&[("key", self.api_key.as_str())])
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                PipelineError::Provider(format!("Failed to send Gemini generation request: {}", e))
            })?;

        text_from_response(read_json(response, "generation").await?)
    }
}
