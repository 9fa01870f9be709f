use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use nt_core::{Article, Error, Result};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::fmt;
use tracing::{debug, info, warn};
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://newsapi.org";

/// Format NewsAPI uses for `publishedAt`.
pub const PUBLISHED_AT_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

#[derive(Clone)]
pub struct NewsApiConfig {
    pub api_key: Option<String>,
    pub base_url: String,
}

impl Default for NewsApiConfig {
    fn default() -> Self {
        Self { api_key: None, base_url: DEFAULT_BASE_URL.to_string() }
    }
}

impl fmt::Debug for NewsApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewsApiConfig")
            .field("api_key", &self.api_key.as_deref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[derive(Debug, Deserialize)]
struct HeadlinesResponse {
    #[serde(default)]
    status: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    articles: Vec<Article>,
}

/// Client for the NewsAPI `top-headlines` endpoint.
pub struct NewsApiClient {
    client: Client,
    api_key: String,
    endpoint: Url,
}

impl fmt::Debug for NewsApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewsApiClient")
            .field("endpoint", &self.endpoint.as_str())
            .finish()
    }
}

impl NewsApiClient {
    pub fn new(config: NewsApiConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .filter(|key| !key.is_empty())
            .ok_or_else(|| Error::Config("Environment variable NEWS_API_KEY is not set.".to_string()))?;
        let joined = format!("{}/v2/top-headlines", config.base_url.trim_end_matches('/'));
        let endpoint = Url::parse(&joined)
            .map_err(|e| Error::Config(format!("Invalid NewsAPI URL {}: {}", joined, e)))?;
        Ok(Self { client: Client::new(), api_key, endpoint })
    }

    /// All current headlines for `sources`, unfiltered.
    pub async fn fetch_headlines(&self, sources: &[String]) -> Result<Vec<Article>> {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("sources", &sources.join(","))
            .append_pair("apiKey", &self.api_key);

        debug!("Fetching top headlines for sources {:?}", sources);
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            warn!("⏳ NewsAPI rate limit exceeded");
            return Err(Error::RateLimited);
        }
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<HeadlinesResponse>(&body)
                .ok()
                .and_then(|parsed| parsed.message)
                .unwrap_or(body);
            return Err(Error::Api { status: status.as_u16(), message });
        }

        let body: HeadlinesResponse = response.json().await?;
        if body.status != "ok" {
            return Err(Error::Api {
                status: status.as_u16(),
                message: body.message.unwrap_or_else(|| "Unknown error".to_string()),
            });
        }
        Ok(body.articles)
    }

    /// Headlines for `sources` published within the last `hours` hours.
    pub async fn fetch_top_headlines(&self, sources: &[String], hours: i64) -> Result<Vec<Article>> {
        let articles = self.fetch_headlines(sources).await?;
        let total = articles.len();
        let recent = filter_recent(articles, Utc::now(), hours);
        info!("📰 Fetched {} articles, {} from the last {} hours", total, recent.len(), hours);
        Ok(recent)
    }
}

/// Parse a NewsAPI `publishedAt` value as UTC.
pub fn parse_published_at(value: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(value, PUBLISHED_AT_FORMAT)
        .ok()
        .map(|naive| naive.and_utc())
}

/// Earliest publication time kept by a `hours` window ending at `now`.
///
/// Windows reaching past the representable range clamp to its bounds.
pub fn cutoff(now: DateTime<Utc>, hours: i64) -> DateTime<Utc> {
    Duration::try_hours(hours)
        .and_then(|window| now.checked_sub_signed(window))
        .unwrap_or(if hours > 0 { DateTime::<Utc>::MIN_UTC } else { DateTime::<Utc>::MAX_UTC })
}

/// Keep articles published at or after `now - hours`.
///
/// Articles without a parseable `publishedAt` are dropped.
pub fn filter_recent(articles: Vec<Article>, now: DateTime<Utc>, hours: i64) -> Vec<Article> {
    let cutoff = cutoff(now, hours);
    articles
        .into_iter()
        .filter(|article| {
            article
                .published_at
                .as_deref()
                .and_then(parse_published_at)
                .is_some_and(|published| published >= cutoff)
        })
        .collect()
}
