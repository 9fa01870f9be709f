use async_trait::async_trait;
use futures::future::try_join_all;
use serde::{Deserialize, Serialize};
use std::fmt;
use crate::Result;

/// Turns text into fixed-length vectors.
///
/// The dimension is fixed for the lifetime of the provider; every vector it
/// returns must have exactly [`EmbeddingProvider::dimension`] components.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync + fmt::Debug {
    fn name(&self) -> &str;

    fn dimension(&self) -> usize;

    /// Generate embeddings for a piece of text
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Generate one embedding per input, in input order.
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        try_join_all(texts.iter().map(|text| self.embed(text))).await
    }
}

pub trait KeywordExtractor: Send + Sync + fmt::Debug {
    /// Up to `top_n` salient terms, most salient first. May be empty.
    fn extract(&self, text: &str, top_n: usize) -> Result<Vec<String>>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: "system".to_string(), content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: "user".to_string(), content: content.into() }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompletionOptions {
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for CompletionOptions {
    fn default() -> Self {
        Self { temperature: 0.7, max_tokens: 500 }
    }
}

#[async_trait]
pub trait ChatModel: Send + Sync + fmt::Debug {
    fn name(&self) -> &str;

    async fn complete(&self, messages: &[ChatMessage], options: CompletionOptions) -> Result<String>;
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VoiceSettings {
    pub stability: f32,
    pub similarity_boost: f32,
}

impl Default for VoiceSettings {
    fn default() -> Self {
        Self { stability: 0.5, similarity_boost: 0.5 }
    }
}

#[async_trait]
pub trait SpeechSynthesizer: Send + Sync + fmt::Debug {
    /// Synthesize `text` with the given voice, returning encoded audio bytes.
    async fn synthesize(&self, text: &str, voice_id: &str, settings: VoiceSettings) -> Result<Vec<u8>>;
}
