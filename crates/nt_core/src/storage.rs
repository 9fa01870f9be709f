use async_trait::async_trait;
use crate::types::Article;
use crate::Result;

/// A searchable collection of articles, rebuilt wholesale on every build.
#[async_trait]
pub trait ArticleIndex: Send + Sync {
    /// Replace the indexed articles. Nothing from a previous build survives.
    async fn build_index(&mut self, articles: Vec<Article>) -> Result<()>;

    /// Up to `k` indexed articles nearest to `query_text`, nearest first.
    async fn query(&self, query_text: &str, k: usize) -> Result<Vec<Article>>;
}
