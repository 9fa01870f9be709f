use std::sync::Arc;
use nt_core::{EmbeddingProvider, Error, Result};
use tracing::info;

use crate::Config;

pub mod hash;
#[cfg(feature = "fastembed")]
pub mod local;
pub mod ollama;
pub mod openai;

pub use hash::HashEmbedder;
#[cfg(feature = "fastembed")]
pub use local::FastEmbedder;
pub use ollama::OllamaEmbedder;
pub use openai::OpenAiModel;

/// Build the embedding provider named by `config.provider`.
pub fn create_embedder(config: &Config) -> Result<Arc<dyn EmbeddingProvider>> {
    let provider = config.provider.as_deref().unwrap_or("hash");
    let embedder: Arc<dyn EmbeddingProvider> = match provider {
        "hash" | "dummy" => Arc::new(HashEmbedder::new(
            config.dimension.unwrap_or(hash::DEFAULT_DIMENSION),
        )?),
        "openai" => Arc::new(OpenAiModel::new(config.into())?),
        "ollama" => Arc::new(OllamaEmbedder::new(config)?),
        #[cfg(feature = "fastembed")]
        "fastembed" => Arc::new(FastEmbedder::new(config)?),
        #[cfg(not(feature = "fastembed"))]
        "fastembed" => {
            return Err(Error::Config(
                "The fastembed provider requires building with the `fastembed` feature".to_string(),
            ))
        }
        other => {
            return Err(Error::Config(format!(
                "Unknown embedding provider: {}. Available providers: hash, openai, ollama, fastembed",
                other
            )))
        }
    };
    info!("🧠 Embedding provider ready: {} ({} dimensions)", embedder.name(), embedder.dimension());
    Ok(embedder)
}

/// Ensure a provider returned a vector of the advertised size.
pub(crate) fn check_dimension(provider: &str, expected: usize, embedding: &[f32]) -> Result<()> {
    if embedding.len() != expected {
        return Err(Error::Provider(format!(
            "{} returned a {}-dimensional embedding, expected {}",
            provider,
            embedding.len(),
            expected
        )));
    }
    Ok(())
}

/// Join `path` onto `base`, tolerating a trailing slash on the base.
pub(crate) fn endpoint(base: &str, path: &str) -> Result<url::Url> {
    let joined = format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'));
    url::Url::parse(&joined).map_err(|e| Error::Config(format!("Invalid URL {}: {}", joined, e)))
}
