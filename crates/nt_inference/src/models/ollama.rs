use async_trait::async_trait;
use nt_core::{EmbeddingProvider, Error, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{check_dimension, endpoint};
use crate::Config;

pub const DEFAULT_BASE_URL: &str = "http://localhost:11434";
pub const DEFAULT_MODEL: &str = "nomic-embed-text";
pub const DEFAULT_DIMENSION: usize = 768;

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    prompt: &'a str,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    embedding: Vec<f32>,
}

/// Embeddings from a local Ollama server, one request per text.
#[derive(Debug)]
pub struct OllamaEmbedder {
    client: Client,
    base_url: String,
    model_name: String,
    dimension: usize,
}

impl OllamaEmbedder {
    pub fn new(config: &Config) -> Result<Self> {
        let base_url = config.base_url.clone().unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        // Fail on a bad URL at construction rather than on first use
        endpoint(&base_url, "api/embeddings")?;
        Ok(Self {
            client: Client::new(),
            base_url,
            model_name: config.model_name.clone().unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            dimension: config.dimension.unwrap_or(DEFAULT_DIMENSION),
        })
    }
}

#[async_trait]
impl EmbeddingProvider for OllamaEmbedder {
    fn name(&self) -> &str {
        "ollama"
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let request = EmbeddingRequest {
            model: &self.model_name,
            prompt: text,
        };

        let response = self
            .client
            .post(endpoint(&self.base_url, "api/embeddings")?)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                Error::Provider(format!("Ollama is not available at {}: {}", self.base_url, e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(Error::Provider(format!(
                "Ollama embedding request failed: {} {}. Please ensure the model '{}' is installed.",
                status.as_u16(),
                message,
                self.model_name
            )));
        }

        let response = response
            .json::<EmbeddingResponse>()
            .await
            .map_err(|e| Error::Provider(format!("Malformed embedding response: {}", e)))?;
        check_dimension("Ollama", self.dimension, &response.embedding)?;
        Ok(response.embedding)
    }
}
