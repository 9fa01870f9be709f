pub mod error;
pub mod models;
pub mod storage;
pub mod types;

pub use error::{Error, Result};
pub use models::{
    ChatMessage, ChatModel, CompletionOptions, EmbeddingProvider, KeywordExtractor,
    SpeechSynthesizer, VoiceSettings,
};
pub use storage::ArticleIndex;
pub use types::{Article, ArticleSource, TextField, UNKNOWN_TOPIC};

pub mod prelude {
    pub use super::{Article, ArticleIndex, ArticleSource, EmbeddingProvider, Error, Result};
}
