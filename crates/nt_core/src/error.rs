use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Index has not been built. Call build_index() with at least one article first.")]
    NotReady,

    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("API request failed: {status} {message}")]
    Api { status: u16, message: String },

    #[error("API rate limit exceeded. Please try again later.")]
    RateLimited,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl Error {
    pub fn provider(message: impl Into<String>) -> Self {
        Self::Provider(message.into())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
