use async_trait::async_trait;
use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};
use nt_core::{EmbeddingProvider, Error, Result};
use std::fmt;
use std::sync::Arc;
use tokio::task::spawn_blocking;
use tracing::info;

use super::check_dimension;
use crate::Config;

pub const DEFAULT_MODEL: &str = "all-MiniLM-L6-v2";

/// Supported local models and their output dimension.
fn resolve(name: &str) -> Result<(EmbeddingModel, usize)> {
    match name.trim_start_matches("sentence-transformers/") {
        "all-MiniLM-L6-v2" => Ok((EmbeddingModel::AllMiniLML6V2, 384)),
        "bge-small-en-v1.5" => Ok((EmbeddingModel::BGESmallENV15, 384)),
        other => Err(Error::Config(format!(
            "Unknown local embedding model: {}. Available models: all-MiniLM-L6-v2, bge-small-en-v1.5",
            other
        ))),
    }
}

/// Sentence-transformer embeddings computed in process with fastembed.
pub struct FastEmbedder {
    model: Arc<TextEmbedding>,
    model_name: String,
    dimension: usize,
}

impl fmt::Debug for FastEmbedder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FastEmbedder")
            .field("model_name", &self.model_name)
            .field("dimension", &self.dimension)
            .finish()
    }
}

impl FastEmbedder {
    /// Load the model named by `config.model_name`, downloading it on first use.
    pub fn new(config: &Config) -> Result<Self> {
        let model_name = config.model_name.clone().unwrap_or_else(|| DEFAULT_MODEL.to_string());
        let (model, dimension) = resolve(&model_name)?;
        if let Some(expected) = config.dimension.filter(|d| *d != dimension) {
            return Err(Error::Config(format!(
                "{} produces {}-dimensional embeddings, not {}",
                model_name, dimension, expected
            )));
        }

        info!("📦 Loading local embedding model {}", model_name);
        let model = TextEmbedding::try_new(InitOptions::new(model))
            .map_err(|e| Error::Provider(format!("Failed to load {}: {}", model_name, e)))?;
        Ok(Self { model: Arc::new(model), model_name, dimension })
    }
}

#[async_trait]
impl EmbeddingProvider for FastEmbedder {
    fn name(&self) -> &str {
        "fastembed"
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let mut embeddings = self.embed_batch(&[text.to_string()]).await?;
        embeddings
            .pop()
            .ok_or_else(|| Error::provider("fastembed returned no embedding"))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let model = self.model.clone();
        let inputs = texts.to_vec();
        let embeddings = spawn_blocking(move || model.embed(inputs, None))
            .await
            .map_err(|e| Error::Provider(format!("Embedding task failed: {}", e)))?
            .map_err(|e| Error::Provider(format!("fastembed failed: {}", e)))?;

        if embeddings.len() != texts.len() {
            return Err(Error::Provider(format!(
                "fastembed returned {} embeddings for {} inputs",
                embeddings.len(),
                texts.len()
            )));
        }
        for embedding in &embeddings {
            check_dimension("fastembed", self.dimension, embedding)?;
        }
        Ok(embeddings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_models() {
        assert_eq!(resolve("all-MiniLM-L6-v2").unwrap().1, 384);
        assert_eq!(resolve("sentence-transformers/all-MiniLM-L6-v2").unwrap().1, 384);
        assert!(matches!(resolve("word2vec"), Err(Error::Config(_))));
    }

    #[test]
    fn test_rejects_bad_config_before_loading() {
        let config = Config { model_name: Some("word2vec".to_string()), ..Config::default() };
        assert!(matches!(FastEmbedder::new(&config), Err(Error::Config(_))));

        let config = Config { dimension: Some(768), ..Config::default() };
        assert!(matches!(FastEmbedder::new(&config), Err(Error::Config(_))));
    }
}
