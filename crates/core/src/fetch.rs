//! Article lookup and paragraph extraction.

use crate::config::DeckConfig;
use crate::error::Result;
use crate::types::ArticleContent;

/// Outcome of looking up a title in a knowledge source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Article {
    /// Whether the article exists.
    pub exists: bool,

    /// Plain-text body; empty when the article does not exist.
    pub text: String,
}

impl Article {
    /// An article that exists with the given text.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            exists: true,
            text: text.into(),
        }
    }

    /// An article that does not exist.
    pub fn missing() -> Self {
        Self {
            exists: false,
            text: String::new(),
        }
    }
}

/// A title → plain text lookup service.
pub trait KnowledgeSource {
    /// Look up an article by title.
    fn lookup(&self, title: &str) -> Result<Article>;
}

impl<T: KnowledgeSource + ?Sized> KnowledgeSource for &T {
    fn lookup(&self, title: &str) -> Result<Article> {
        (**self).lookup(title)
    }
}

/// Fetch the paragraphs of the article named `topic`.
///
/// Paragraphs are split on blank lines, trimmed, and limited to
/// `config.max_slides`. A missing article yields the not-found message as
/// the only paragraph. Lookup errors are returned as is.
pub fn fetch_content<S: KnowledgeSource + ?Sized>(
    source: &S,
    topic: &str,
    config: &DeckConfig,
) -> Result<ArticleContent> {
    let article = source.lookup(topic)?;

    if !article.exists {
        log::warn!("No article found for topic '{}'", topic);
        return Ok(ArticleContent::not_found(config.not_found_message.clone()));
    }

    let paragraphs = split_paragraphs(&article.text, config.max_slides);
    log::debug!(
        "Fetched '{}': {} bytes, {} paragraphs kept",
        topic,
        article.text.len(),
        paragraphs.len()
    );

    Ok(ArticleContent::found(paragraphs))
}

/// Split text on blank lines into trimmed, non-empty paragraphs.
pub fn split_paragraphs(text: &str, limit: usize) -> Vec<String> {
    text.split("\n\n")
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .take(limit)
        .map(str::to_string)
        .collect()
}
