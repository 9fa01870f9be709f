use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Topic assigned to an enriched article whose text yields no keywords.
pub const UNKNOWN_TOPIC: &str = "unknown";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default)]
    pub source: ArticleSource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url_to_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub keywords: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embedding: Option<Vec<f32>>,
}

impl Article {
    pub fn new(title: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            source: ArticleSource::Plain(source.into()),
            author: None,
            description: None,
            url: None,
            url_to_image: None,
            content: None,
            published_at: None,
            timestamp: None,
            topic: None,
            keywords: Vec::new(),
            embedding: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_published_at(mut self, published_at: impl Into<String>) -> Self {
        self.published_at = Some(published_at.into());
        self
    }

    /// `timestamp` when set, otherwise `publishedAt`, otherwise empty.
    pub fn timestamp(&self) -> &str {
        self.timestamp
            .as_deref()
            .or(self.published_at.as_deref())
            .unwrap_or_default()
    }

    pub fn description(&self) -> &str {
        self.description.as_deref().unwrap_or_default()
    }

    /// Text handed to the embedding provider for this article.
    pub fn text_for(&self, field: TextField) -> String {
        let selected = match field {
            TextField::TitleAndDescription => None,
            TextField::Title => Some(self.title.as_str()),
            TextField::Description => self.description.as_deref(),
            TextField::Content => self.content.as_deref(),
        };
        match selected {
            Some(text) => text.to_string(),
            None => format!("{}. {}", self.title, self.description()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ArticleSource {
    Named {
        #[serde(default)]
        id: Option<String>,
        #[serde(default)]
        name: Option<String>,
    },
    Plain(String),
}

impl ArticleSource {
    pub fn name(&self) -> &str {
        match self {
            Self::Named { name: Some(name), .. } => name,
            Self::Named { name: None, .. } => "Unknown Source",
            Self::Plain(name) => name,
        }
    }
}

impl Default for ArticleSource {
    fn default() -> Self {
        Self::Named { id: None, name: None }
    }
}

impl fmt::Display for ArticleSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Field of an [`Article`] used as embedding input when enrichment is off.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TextField {
    #[default]
    TitleAndDescription,
    Title,
    Description,
    Content,
}

impl std::str::FromStr for TextField {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "title-and-description" => Ok(Self::TitleAndDescription),
            "title" => Ok(Self::Title),
            "description" => Ok(Self::Description),
            "content" => Ok(Self::Content),
            _ => Err(format!("Invalid text field: {}", s)),
        }
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
