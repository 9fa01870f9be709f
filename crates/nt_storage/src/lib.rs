use nt_core::TextField;
use serde::{Deserialize, Serialize};

pub mod index;
pub mod vector_db;

pub use index::{FlatL2Index, Neighbor};
pub use vector_db::{derive_topic, VectorDatabase};

/// Number of keywords kept per enriched article unless configured otherwise.
pub const DEFAULT_TOP_N: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexConfig {
    /// Attach keywords, a topic and the embedding to each stored article.
    pub enrich: bool,
    /// Keywords extracted per article when enriching.
    pub top_n: usize,
    /// Embedding input when not enriching.
    pub text_field: TextField,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            enrich: false,
            top_n: DEFAULT_TOP_N,
            text_field: TextField::default(),
        }
    }
}

impl IndexConfig {
    pub fn enriched(top_n: usize) -> Self {
        Self { enrich: true, top_n, ..Self::default() }
    }
}

pub mod prelude {
    pub use super::{FlatL2Index, IndexConfig, VectorDatabase};
}
