use nt_core::Article;
use std::io::{self, Write};

pub const NO_ARTICLES: &str = "No articles found for the specified criteria.";

/// Render one article followed by an 80 column rule.
///
/// Topic, keywords and description lines are omitted when empty.
pub fn format_article(article: &Article) -> String {
    let title = if article.title.is_empty() { "No Title" } else { &article.title };
    let mut out = format!(
        "Title: {}\nSource: {}\nTimestamp: {}\n",
        title,
        article.source.name(),
        article.timestamp()
    );
    if let Some(topic) = article.topic.as_deref().filter(|t| !t.is_empty()) {
        out.push_str(&format!("Topic: {}\n", topic));
    }
    if !article.keywords.is_empty() {
        out.push_str(&format!("Keywords: {}\n", article.keywords.join(", ")));
    }
    if !article.description().is_empty() {
        out.push_str(&format!("Description: {}\n", article.description()));
    }
    out.push_str(&"-".repeat(80));
    out.push('\n');
    out
}

pub fn write_articles<W: Write>(out: &mut W, articles: &[Article]) -> io::Result<()> {
    if articles.is_empty() {
        return writeln!(out, "{}", NO_ARTICLES);
    }
    for article in articles {
        out.write_all(format_article(article).as_bytes())?;
    }
    Ok(())
}

/// Print `articles` to stdout.
pub fn print_articles(articles: &[Article]) -> io::Result<()> {
    let stdout = io::stdout();
    let mut lock = stdout.lock();
    write_articles(&mut lock, articles)
}
