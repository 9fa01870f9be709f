use async_trait::async_trait;
use nt_core::{Article, ArticleIndex, EmbeddingProvider, Error, KeywordExtractor, Result, UNKNOWN_TOPIC};
use nt_storage::{IndexConfig, VectorDatabase};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

/// Embeds known texts to fixed points on a line; anything else lands at the origin.
#[derive(Debug, Default)]
struct LineEmbedder {
    points: HashMap<String, f32>,
}

impl LineEmbedder {
    fn with(points: &[(&str, f32)]) -> Self {
        Self {
            points: points.iter().map(|(t, x)| (t.to_string(), *x)).collect(),
        }
    }
}

#[async_trait]
impl EmbeddingProvider for LineEmbedder {
    fn name(&self) -> &str {
        "line"
    }

    fn dimension(&self) -> usize {
        2
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        Ok(vec![self.points.get(text).copied().unwrap_or(0.0), 0.0])
    }
}

#[derive(Debug)]
struct WrongDimensionEmbedder;

#[async_trait]
impl EmbeddingProvider for WrongDimensionEmbedder {
    fn name(&self) -> &str {
        "wrong"
    }

    fn dimension(&self) -> usize {
        4
    }

    async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
        Ok(vec![0.0; 3])
    }
}

#[derive(Debug)]
struct FailingEmbedder;

#[async_trait]
impl EmbeddingProvider for FailingEmbedder {
    fn name(&self) -> &str {
        "failing"
    }

    fn dimension(&self) -> usize {
        2
    }

    async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
        Err(Error::provider("model unavailable"))
    }
}

/// Embeds by text length, failing every batch after the first.
#[derive(Debug, Default)]
struct FailsAfterFirstBatch {
    batches: AtomicUsize,
}

#[async_trait]
impl EmbeddingProvider for FailsAfterFirstBatch {
    fn name(&self) -> &str {
        "fails-after-first-batch"
    }

    fn dimension(&self) -> usize {
        2
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        Ok(vec![text.len() as f32, 0.0])
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if self.batches.fetch_add(1, Ordering::SeqCst) > 0 {
            return Err(Error::provider("quota exhausted"));
        }
        Ok(texts.iter().map(|text| vec![text.len() as f32, 0.0]).collect())
    }
}

/// Behaves like [`LongWords`] until switched off.
#[derive(Debug, Default)]
struct SwitchableExtractor {
    broken: AtomicBool,
}

impl KeywordExtractor for SwitchableExtractor {
    fn extract(&self, text: &str, top_n: usize) -> Result<Vec<String>> {
        if self.broken.load(Ordering::SeqCst) {
            return Err(Error::Config("vocabulary unavailable".to_string()));
        }
        LongWords.extract(text, top_n)
    }
}

/// Splits on whitespace and returns words longer than three characters.
#[derive(Debug)]
struct LongWords;

impl KeywordExtractor for LongWords {
    fn extract(&self, text: &str, top_n: usize) -> Result<Vec<String>> {
        Ok(text
            .split_whitespace()
            .filter(|w| w.len() > 3)
            .take(top_n)
            .map(str::to_lowercase)
            .collect())
    }
}

fn article(title: &str, description: &str) -> Article {
    Article::new(title, "test").with_description(description)
}

/// Three articles whose raw text embeds at x = 1, 5 and 10.
fn fixture() -> (Arc<LineEmbedder>, Vec<Article>) {
    let embedder = LineEmbedder::with(&[
        ("Near. one", 1.0),
        ("Middle. five", 5.0),
        ("Far. ten", 10.0),
    ]);
    let articles = vec![
        article("Far", "ten"),
        article("Near", "one"),
        article("Middle", "five"),
    ];
    (Arc::new(embedder), articles)
}

fn titles(articles: &[Article]) -> Vec<&str> {
    articles.iter().map(|a| a.title.as_str()).collect()
}

#[tokio::test]
async fn test_nearest_first_ordering() {
    let (embedder, articles) = fixture();
    let mut db = VectorDatabase::new(embedder, IndexConfig::default());
    db.build_index(articles).await.unwrap();

    let results = db.query("anything at the origin", 2).await.unwrap();
    assert_eq!(titles(&results), vec!["Near", "Middle"]);
}

#[tokio::test]
async fn test_results_come_from_the_indexed_articles() {
    let (embedder, articles) = fixture();
    let mut db = VectorDatabase::new(embedder, IndexConfig::default());
    db.build_index(articles.clone()).await.unwrap();

    for result in db.query("q", 3).await.unwrap() {
        assert!(articles.contains(&result));
    }
}

#[tokio::test]
async fn test_k_bounds_results() {
    let (embedder, articles) = fixture();
    let mut db = VectorDatabase::new(embedder, IndexConfig::default());
    db.build_index(articles).await.unwrap();

    assert_eq!(db.query("q", 1).await.unwrap().len(), 1);
    assert_eq!(db.query("q", 3).await.unwrap().len(), 3);
    // More than indexed: everything, ordered, no padding or duplicates
    let all = db.query("q", 10).await.unwrap();
    assert_eq!(titles(&all), vec!["Near", "Middle", "Far"]);
    assert!(db.query("q", 0).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_query_before_build_is_not_ready() {
    let (embedder, _) = fixture();
    let db = VectorDatabase::new(embedder, IndexConfig::default());
    assert!(matches!(db.query("q", 3).await, Err(Error::NotReady)));
}

#[tokio::test]
async fn test_empty_build_is_not_ready() {
    let (embedder, articles) = fixture();
    let mut db = VectorDatabase::new(embedder, IndexConfig::default());
    db.build_index(articles).await.unwrap();

    db.build_index(Vec::new()).await.unwrap();
    assert!(db.is_empty());
    assert!(matches!(db.query("x", 3).await, Err(Error::NotReady)));
}

#[tokio::test]
async fn test_rebuild_replaces_previous_documents() {
    let (embedder, articles) = fixture();
    let mut db = VectorDatabase::new(embedder, IndexConfig::default());

    db.build_index(articles.clone()).await.unwrap();
    let once = db.query("q", 3).await.unwrap();

    db.build_index(articles).await.unwrap();
    assert_eq!(db.len(), 3);
    assert_eq!(db.query("q", 3).await.unwrap(), once);

    db.build_index(vec![article("Middle", "five")]).await.unwrap();
    let results = db.query("q", 3).await.unwrap();
    assert_eq!(titles(&results), vec!["Middle"]);
}

#[tokio::test]
async fn test_repeated_queries_are_deterministic() {
    let (embedder, articles) = fixture();
    let mut db = VectorDatabase::new(embedder, IndexConfig::default());
    db.build_index(articles).await.unwrap();

    let first = db.query("q", 2).await.unwrap();
    for _ in 0..5 {
        assert_eq!(db.query("q", 2).await.unwrap(), first);
    }
}

#[tokio::test]
async fn test_equal_distances_are_all_returned() {
    // Both articles embed at the origin. Their relative order is whatever the
    // search yields, so only membership is checked.
    let mut db = VectorDatabase::new(Arc::new(LineEmbedder::default()), IndexConfig::default());
    db.build_index(vec![article("A", ""), article("B", "")]).await.unwrap();

    let results = db.query("q", 2).await.unwrap();
    let mut found = titles(&results);
    found.sort();
    assert_eq!(found, vec!["A", "B"]);
}

#[tokio::test]
async fn test_dimension_mismatch_is_a_provider_error() {
    let (embedder, articles) = fixture();
    let mut db = VectorDatabase::new(embedder, IndexConfig::default());
    db.build_index(articles).await.unwrap();

    let mut broken = VectorDatabase::new(Arc::new(WrongDimensionEmbedder), IndexConfig::default());
    let result = broken.build_index(vec![article("A", "")]).await;
    assert!(matches!(result, Err(Error::Provider(_))));
    assert!(!broken.is_ready());

    // The healthy store is unaffected by the failed one
    assert_eq!(db.len(), 3);
}

#[tokio::test]
async fn test_provider_failure_leaves_new_store_unready() {
    let (embedder, articles) = fixture();
    let mut db = VectorDatabase::new(embedder.clone(), IndexConfig::default());
    db.build_index(articles).await.unwrap();

    let mut failing = VectorDatabase::new(Arc::new(FailingEmbedder), IndexConfig::default());
    assert!(matches!(
        failing.build_index(vec![article("A", "")]).await,
        Err(Error::Provider(_))
    ));
    assert!(failing.is_empty());
    assert!(matches!(failing.query("q", 1).await, Err(Error::NotReady)));
}

#[tokio::test]
async fn test_text_field_selects_embedding_input() {
    let embedder = LineEmbedder::with(&[("Near", 1.0), ("Far", 10.0)]);
    let config = IndexConfig {
        text_field: nt_core::TextField::Title,
        ..IndexConfig::default()
    };
    let mut db = VectorDatabase::new(Arc::new(embedder), config);
    db.build_index(vec![article("Far", "x"), article("Near", "y")]).await.unwrap();

    let results = db.query("q", 1).await.unwrap();
    assert_eq!(titles(&results), vec!["Near"]);
}

#[tokio::test]
async fn test_enrichment_sets_topic_keywords_and_embedding() {
    let embedder = LineEmbedder::with(&[("Senate passes budget tonight", 3.0)]);
    let mut db = VectorDatabase::new(Arc::new(embedder), IndexConfig::enriched(2))
        .with_keyword_extractor(Arc::new(LongWords));

    db.build_index(vec![
        article("Senate passes", "budget tonight"),
        article("A", "b"),
    ])
    .await
    .unwrap();

    let docs = db.documents();
    assert_eq!(docs[0].keywords, vec!["senate", "passes"]);
    assert_eq!(docs[0].topic.as_deref(), Some("senate"));
    assert_eq!(docs[0].embedding.as_deref(), Some(&[3.0, 0.0][..]));
    assert!(docs[1].keywords.is_empty());
    assert_eq!(docs[1].topic.as_deref(), Some(UNKNOWN_TOPIC));

    for doc in docs {
        let expected = doc.keywords.first().map(String::as_str).unwrap_or(UNKNOWN_TOPIC);
        assert_eq!(doc.topic.as_deref(), Some(expected));
    }
}

#[tokio::test]
async fn test_usable_through_article_index_trait() {
    let (embedder, articles) = fixture();
    let mut index: Box<dyn ArticleIndex> =
        Box::new(VectorDatabase::new(embedder, IndexConfig::default()));
    index.build_index(articles).await.unwrap();
    let results = index.query("q", 1).await.unwrap();
    assert_eq!(titles(&results), vec!["Near"]);
}

#[tokio::test]
async fn test_failed_rebuild_keeps_previous_index() {
    let mut db = VectorDatabase::new(Arc::new(FailsAfterFirstBatch::default()), IndexConfig::default());
    db.build_index(vec![article("a", ""), article("bb", "")]).await.unwrap();
    let documents = db.documents().to_vec();
    let results = db.query("", 2).await.unwrap();

    let rebuild = db.build_index(vec![article("ccc", ""), article("dddd", ""), article("e", "")]).await;
    assert!(matches!(rebuild, Err(Error::Provider(_))));

    assert!(db.is_ready());
    assert_eq!(db.len(), 2);
    assert_eq!(db.documents(), &documents[..]);
    assert_eq!(db.query("", 2).await.unwrap(), results);
    assert_eq!(titles(&results), vec!["a", "bb"]);
}

#[tokio::test]
async fn test_failed_enrichment_keeps_previous_index() {
    let extractor = Arc::new(SwitchableExtractor::default());
    let embedder = LineEmbedder::with(&[("Senate passes budget tonight", 3.0)]);
    let mut db = VectorDatabase::new(Arc::new(embedder), IndexConfig::enriched(2))
        .with_keyword_extractor(extractor.clone());
    db.build_index(vec![article("Senate passes", "budget tonight")]).await.unwrap();
    let documents = db.documents().to_vec();

    extractor.broken.store(true, Ordering::SeqCst);
    let rebuild = db.build_index(vec![article("Other", "story")]).await;
    assert!(matches!(rebuild, Err(Error::Provider(_))));

    assert_eq!(db.len(), 1);
    assert_eq!(db.documents(), &documents[..]);
    assert_eq!(db.documents()[0].topic.as_deref(), Some("senate"));
    assert_eq!(titles(&db.query("q", 3).await.unwrap()), vec!["Senate passes"]);
}
