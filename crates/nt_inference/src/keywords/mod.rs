use nt_core::{Error, KeywordExtractor, Result};
use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::fmt;

mod stop_words;

pub use stop_words::ENGLISH_STOP_WORDS;

/// Vocabulary cap applied before ranking.
pub const DEFAULT_MAX_FEATURES: usize = 1000;

const TOKEN_PATTERN: &str = r"(?u)\b\w\w+\b";

/// TF-IDF keyword extractor fitted on one document at a time.
///
/// With a single document every idf is 1, so the ranking reduces to raw term
/// frequency after stop-word removal. Ties go to the lexically greater term.
pub struct TfIdfExtractor {
    token_pattern: Regex,
    stop_words: HashSet<&'static str>,
    max_features: usize,
}

impl fmt::Debug for TfIdfExtractor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TfIdfExtractor")
            .field("stop_words", &self.stop_words.len())
            .field("max_features", &self.max_features)
            .finish()
    }
}

impl TfIdfExtractor {
    pub fn new() -> Result<Self> {
        Self::with_max_features(DEFAULT_MAX_FEATURES)
    }

    pub fn with_max_features(max_features: usize) -> Result<Self> {
        if max_features == 0 {
            return Err(Error::Config("max_features must be at least 1".to_string()));
        }
        let token_pattern = Regex::new(TOKEN_PATTERN)
            .map_err(|e| Error::Config(format!("Invalid token pattern: {}", e)))?;
        Ok(Self {
            token_pattern,
            stop_words: ENGLISH_STOP_WORDS.iter().copied().collect(),
            max_features,
        })
    }

    /// Lowercased tokens of `text` with stop words removed.
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let lowered = text.to_lowercase();
        self.token_pattern
            .find_iter(&lowered)
            .map(|m| m.as_str())
            .filter(|token| !self.stop_words.contains(*token))
            .map(str::to_string)
            .collect()
    }

    /// Every vocabulary term with its l2-normalized weight, highest first.
    pub fn weights(&self, text: &str) -> Vec<(String, f32)> {
        let mut counts: HashMap<String, usize> = HashMap::new();
        for token in self.tokenize(text) {
            *counts.entry(token).or_default() += 1;
        }

        let mut terms: Vec<(String, usize)> = counts.into_iter().collect();
        terms.sort_by(|(a_term, a_count), (b_term, b_count)| {
            b_count.cmp(a_count).then_with(|| b_term.cmp(a_term))
        });
        terms.truncate(self.max_features);

        let norm = terms
            .iter()
            .map(|(_, count)| (*count as f32).powi(2))
            .sum::<f32>()
            .sqrt();
        terms
            .into_iter()
            .map(|(term, count)| (term, count as f32 / norm))
            .collect()
    }
}

impl KeywordExtractor for TfIdfExtractor {
    fn extract(&self, text: &str, top_n: usize) -> Result<Vec<String>> {
        Ok(self
            .weights(text)
            .into_iter()
            .take(top_n)
            .map(|(term, _)| term)
            .collect())
    }
}
