use nt_core::{Article, ChatMessage, ChatModel, CompletionOptions, Error, Result};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

pub const SYSTEM_PROMPT: &str = "You are an experienced journalist and story synthesizer.";

/// Read a prompt template from disk.
pub async fn load_prompt(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    debug!("Loading prompt template from {}", path.display());
    Ok(tokio::fs::read_to_string(path).await?)
}

/// Render articles as the block substituted for `{articles}`.
pub fn format_articles_for_prompt(articles: &[Article]) -> String {
    articles
        .iter()
        .map(|article| {
            let title = if article.title.is_empty() { "No Title" } else { &article.title };
            format!(
                "Title: {}\nSource: {}\nTimestamp: {}\nTopic: {}\nKeywords: {}\nDescription: {}\n",
                title,
                article.source.name(),
                article.timestamp(),
                article.topic.as_deref().unwrap_or_default(),
                article.keywords.join(", "),
                article.description(),
            )
        })
        .collect::<Vec<_>>()
        .join("\n---\n")
}

/// Substitute `{query}` and `{articles}` in `template`.
///
/// `{{` and `}}` produce literal braces. Any other placeholder, or an
/// unmatched brace, is a configuration error.
pub fn render_prompt(template: &str, query: &str, articles: &str) -> Result<String> {
    let mut rendered = String::with_capacity(template.len() + query.len() + articles.len());
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '{' if chars.peek() == Some(&'{') => {
                chars.next();
                rendered.push('{');
            }
            '}' if chars.peek() == Some(&'}') => {
                chars.next();
                rendered.push('}');
            }
            '{' => {
                let mut name = String::new();
                loop {
                    match chars.next() {
                        Some('}') => break,
                        Some(c) => name.push(c),
                        None => {
                            return Err(Error::Config(
                                "Unterminated placeholder in prompt template".to_string(),
                            ))
                        }
                    }
                }
                match name.as_str() {
                    "query" => rendered.push_str(query),
                    "articles" => rendered.push_str(articles),
                    other => {
                        return Err(Error::Config(format!(
                            "Unknown placeholder {{{}}} in prompt template",
                            other
                        )))
                    }
                }
            }
            '}' => {
                return Err(Error::Config(
                    "Single '}' encountered in prompt template".to_string(),
                ))
            }
            c => rendered.push(c),
        }
    }
    Ok(rendered)
}

/// Turns a query and its matching articles into a narrative via a chat model.
#[derive(Debug, Clone)]
pub struct StorySynthesizer {
    model: Arc<dyn ChatModel>,
    options: CompletionOptions,
}

impl StorySynthesizer {
    pub fn new(model: Arc<dyn ChatModel>) -> Self {
        Self { model, options: CompletionOptions::default() }
    }

    pub fn with_options(mut self, options: CompletionOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> CompletionOptions {
        self.options
    }

    pub async fn synthesize_story(
        &self,
        query: &str,
        articles: &[Article],
        template: &str,
    ) -> Result<String> {
        let articles_text = format_articles_for_prompt(articles);
        let prompt = render_prompt(template, query, &articles_text)?;
        let messages = [ChatMessage::system(SYSTEM_PROMPT), ChatMessage::user(prompt)];

        info!("✍️ Synthesizing story from {} articles with {}", articles.len(), self.model.name());
        self.model.complete(&messages, self.options).await
    }

    /// Load the template at `prompt_file` and synthesize with it.
    pub async fn synthesize_from_file(
        &self,
        query: &str,
        articles: &[Article],
        prompt_file: impl AsRef<Path>,
    ) -> Result<String> {
        let template = load_prompt(prompt_file).await?;
        self.synthesize_story(query, articles, &template).await
    }
}
