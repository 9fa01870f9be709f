use async_trait::async_trait;
use nt_core::{
    Article, ArticleIndex, EmbeddingProvider, Error, KeywordExtractor, Result, UNKNOWN_TOPIC,
};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

use crate::index::FlatL2Index;
use crate::IndexConfig;

/// In-memory semantic index over news articles.
///
/// Position `i` of the vector index always refers to `documents[i]`. Both are
/// replaced together by [`VectorDatabase::build_index`], and neither is touched
/// when a build fails.
///
/// There is no internal locking: `build_index` takes `&mut self`, so callers
/// sharing an instance across tasks must serialize access themselves.
pub struct VectorDatabase {
    provider: Arc<dyn EmbeddingProvider>,
    extractor: Option<Arc<dyn KeywordExtractor>>,
    config: IndexConfig,
    dimension: usize,
    index: Option<FlatL2Index>,
    documents: Vec<Article>,
}

impl fmt::Debug for VectorDatabase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VectorDatabase")
            .field("provider", &self.provider.name())
            .field("extractor", &self.extractor)
            .field("config", &self.config)
            .field("dimension", &self.dimension)
            .field("documents", &self.documents.len())
            .finish()
    }
}

impl VectorDatabase {
    pub fn new(provider: Arc<dyn EmbeddingProvider>, config: IndexConfig) -> Self {
        let dimension = provider.dimension();
        Self {
            provider,
            extractor: None,
            config,
            dimension,
            index: None,
            documents: Vec::new(),
        }
    }

    pub fn with_keyword_extractor(mut self, extractor: Arc<dyn KeywordExtractor>) -> Self {
        self.extractor = Some(extractor);
        self
    }

    pub fn config(&self) -> &IndexConfig {
        &self.config
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Indexed articles in index order.
    pub fn documents(&self) -> &[Article] {
        &self.documents
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn is_ready(&self) -> bool {
        self.index.is_some()
    }

    /// Embed `articles` and replace the current index with them.
    ///
    /// An empty batch leaves the store with no index, so a following
    /// [`VectorDatabase::query`] reports [`Error::NotReady`].
    pub async fn build_index(&mut self, articles: Vec<Article>) -> Result<()> {
        if articles.is_empty() {
            info!("🗂️ No articles to index, clearing vector database");
            self.index = None;
            self.documents = Vec::new();
            return Ok(());
        }

        let (mut documents, texts) = self.prepare(articles)?;

        info!("🔢 Embedding {} documents with {}", texts.len(), self.provider.name());
        let embeddings = self.provider.embed_batch(&texts).await?;
        if embeddings.len() != documents.len() {
            return Err(Error::Provider(format!(
                "Embedding provider returned {} vectors for {} documents",
                embeddings.len(),
                documents.len()
            )));
        }

        let index = FlatL2Index::with_vectors(self.dimension, &embeddings)?;

        if self.config.enrich {
            for (document, embedding) in documents.iter_mut().zip(embeddings) {
                document.embedding = Some(embedding);
            }
        }

        self.index = Some(index);
        self.documents = documents;
        info!("✨ Vector index built with {} documents", self.documents.len());
        Ok(())
    }

    /// Up to `k` indexed articles closest to `query_text`, nearest first.
    ///
    /// Equal distances are returned in index order.
    pub async fn query(&self, query_text: &str, k: usize) -> Result<Vec<Article>> {
        let index = self.index.as_ref().ok_or(Error::NotReady)?;
        if k == 0 {
            return Ok(Vec::new());
        }

        let embedding = self.provider.embed(query_text).await?;
        let neighbors = index.search(&embedding, k)?;
        debug!("🔍 Query {:?} matched {} neighbors", query_text, neighbors.len());

        Ok(neighbors
            .into_iter()
            .filter_map(|neighbor| self.documents.get(neighbor.position).cloned())
            .collect())
    }

    /// Derive the stored documents and the text to embed for each of them.
    fn prepare(&self, articles: Vec<Article>) -> Result<(Vec<Article>, Vec<String>)> {
        if !self.config.enrich {
            let texts = articles
                .iter()
                .map(|article| article.text_for(self.config.text_field))
                .collect();
            return Ok((articles, texts));
        }

        let extractor = self.extractor.as_ref().ok_or_else(|| {
            Error::Config("Enrichment is enabled but no keyword extractor was provided".to_string())
        })?;

        let mut documents = Vec::with_capacity(articles.len());
        let mut texts = Vec::with_capacity(articles.len());
        for mut article in articles {
            let text = format!("{} {}", article.title, article.description());
            let keywords = extractor
                .extract(&text, self.config.top_n)
                .map_err(|e| match e {
                    Error::Provider(_) => e,
                    other => Error::Provider(format!("Keyword extraction failed: {}", other)),
                })?;
            article.topic = Some(derive_topic(&keywords));
            article.keywords = keywords;
            debug!("🏷️ {:?} -> topic {:?}", article.title, article.topic);
            documents.push(article);
            texts.push(text);
        }
        Ok((documents, texts))
    }
}

/// The first keyword, or [`UNKNOWN_TOPIC`] when there are none.
pub fn derive_topic(keywords: &[String]) -> String {
    keywords
        .first()
        .cloned()
        .unwrap_or_else(|| UNKNOWN_TOPIC.to_string())
}

#[async_trait]
impl ArticleIndex for VectorDatabase {
    async fn build_index(&mut self, articles: Vec<Article>) -> Result<()> {
        VectorDatabase::build_index(self, articles).await
    }

    async fn query(&self, query_text: &str, k: usize) -> Result<Vec<Article>> {
        VectorDatabase::query(self, query_text, k).await
    }
}
