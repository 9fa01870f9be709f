pub mod client;
pub mod display;

pub use client::{filter_recent, parse_published_at, NewsApiClient, NewsApiConfig};
pub use display::{format_article, print_articles, write_articles};

/// Sources queried when none are given.
pub const DEFAULT_SOURCES: &[&str] = &["cnn", "fox-news", "the-new-york-times"];

/// Default look-back window, one week.
pub const DEFAULT_HOURS: i64 = 168;

pub mod prelude {
    pub use super::{NewsApiClient, NewsApiConfig};
    pub use nt_core::{Article, Error, Result};
}
