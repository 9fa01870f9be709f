use std::fmt;

pub mod keywords;
pub mod models;
pub mod speech;
pub mod synthesis;

#[cfg(test)]
pub(crate) mod test_utils;

/// Selects and configures the embedding provider.
#[derive(Clone, Default)]
pub struct Config {
    /// `hash` (default), `openai`, `ollama` or `fastembed` (feature-gated).
    pub provider: Option<String>,
    pub api_key: Option<String>,
    pub model_name: Option<String>,
    pub base_url: Option<String>,
    pub dimension: Option<usize>,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("provider", &self.provider)
            .field("api_key", &self.api_key.as_deref().map(|_| "<redacted>"))
            .field("model_name", &self.model_name)
            .field("base_url", &self.base_url)
            .field("dimension", &self.dimension)
            .finish()
    }
}

pub mod prelude {
    pub use super::Config;
    pub use super::keywords::TfIdfExtractor;
    pub use super::models::create_embedder;
    pub use super::speech::ElevenLabsClient;
    pub use super::synthesis::StorySynthesizer;
    pub use nt_core::{Article, Result, Error};
}

pub use models::create_embedder;
