use async_trait::async_trait;
use nt_core::{ChatMessage, ChatModel, CompletionOptions, EmbeddingProvider, Error, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use super::{check_dimension, endpoint};
use crate::Config;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-3-small";
pub const DEFAULT_EMBEDDING_DIMENSION: usize = 1536;
pub const DEFAULT_CHAT_MODEL: &str = "gpt-3.5-turbo";

#[derive(Clone)]
pub struct OpenAiConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub embedding_model: String,
    pub dimension: usize,
    pub chat_model: String,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            embedding_model: DEFAULT_EMBEDDING_MODEL.to_string(),
            dimension: DEFAULT_EMBEDDING_DIMENSION,
            chat_model: DEFAULT_CHAT_MODEL.to_string(),
        }
    }
}

impl fmt::Debug for OpenAiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiConfig")
            .field("api_key", &self.api_key.as_deref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("embedding_model", &self.embedding_model)
            .field("dimension", &self.dimension)
            .field("chat_model", &self.chat_model)
            .finish()
    }
}

impl From<&Config> for OpenAiConfig {
    fn from(config: &Config) -> Self {
        let defaults = Self::default();
        Self {
            api_key: config.api_key.clone(),
            base_url: config.base_url.clone().unwrap_or(defaults.base_url),
            embedding_model: config.model_name.clone().unwrap_or(defaults.embedding_model),
            dimension: config.dimension.unwrap_or(defaults.dimension),
            chat_model: defaults.chat_model,
        }
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: Message,
}

#[derive(Deserialize)]
struct Message {
    content: Option<String>,
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    input: &'a [String],
    model: &'a str,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    #[serde(default)]
    index: usize,
    embedding: Vec<f32>,
}

/// Client for OpenAI-compatible embedding and chat completion endpoints.
pub struct OpenAiModel {
    client: Client,
    api_key: String,
    config: OpenAiConfig,
}

impl fmt::Debug for OpenAiModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiModel")
            .field("client", &"<reqwest::Client>")
            .field("config", &self.config)
            .finish()
    }
}

impl OpenAiModel {
    pub fn new(config: OpenAiConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| Error::Config("OPENAI_API_KEY is not set".to_string()))?;
        Ok(Self {
            client: Client::new(),
            api_key,
            config,
        })
    }

    pub fn with_chat_model(mut self, model: impl Into<String>) -> Self {
        self.config.chat_model = model.into();
        self
    }

    async fn post<T: Serialize + ?Sized>(&self, path: &str, body: &T) -> Result<reqwest::Response> {
        let url = endpoint(&self.config.base_url, path)?;
        let response = self
            .client
            .post(url)
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| Error::Provider(format!("OpenAI request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(Error::Provider(format!(
                "OpenAI API request failed: {} {}",
                status.as_u16(),
                message
            )));
        }
        Ok(response)
    }
}

#[async_trait]
impl EmbeddingProvider for OpenAiModel {
    fn name(&self) -> &str {
        "openai"
    }

    fn dimension(&self) -> usize {
        self.config.dimension
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let mut embeddings = self.embed_batch(&[text.to_string()]).await?;
        embeddings
            .pop()
            .ok_or_else(|| Error::provider("OpenAI returned no embedding"))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let request = EmbeddingRequest {
            input: texts,
            model: &self.config.embedding_model,
        };
        debug!("Requesting {} embeddings from {}", texts.len(), self.config.embedding_model);

        let mut response = self
            .post("embeddings", &request)
            .await?
            .json::<EmbeddingResponse>()
            .await
            .map_err(|e| Error::Provider(format!("Malformed embedding response: {}", e)))?;

        if response.data.len() != texts.len() {
            return Err(Error::Provider(format!(
                "OpenAI returned {} embeddings for {} inputs",
                response.data.len(),
                texts.len()
            )));
        }

        response.data.sort_by_key(|data| data.index);
        if let Some((position, data)) =
            response.data.iter().enumerate().find(|(position, data)| data.index != *position)
        {
            return Err(Error::Provider(format!(
                "OpenAI returned embedding index {} where {} was expected",
                data.index, position
            )));
        }
        response
            .data
            .into_iter()
            .map(|data| {
                check_dimension("OpenAI", self.config.dimension, &data.embedding)?;
                Ok(data.embedding)
            })
            .collect()
    }
}

#[async_trait]
impl ChatModel for OpenAiModel {
    fn name(&self) -> &str {
        &self.config.chat_model
    }

    async fn complete(&self, messages: &[ChatMessage], options: CompletionOptions) -> Result<String> {
        let request = ChatRequest {
            model: &self.config.chat_model,
            messages,
            temperature: options.temperature,
            max_tokens: options.max_tokens,
        };

        let response = self
            .post("chat/completions", &request)
            .await?
            .json::<ChatResponse>()
            .await
            .map_err(|e| Error::Provider(format!("Malformed chat response: {}", e)))?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .ok_or_else(|| Error::provider("OpenAI returned no completion"))
    }
}
