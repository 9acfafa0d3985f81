//! Generation settings.
//!
//! Everything that used to be a fixed constant (font sizes, slide limits,
//! closing slide text) lives here so callers can override it per request.

use crate::error::{Error, Result};
use crate::types::FontSize;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Message used as the only paragraph when the article does not exist.
pub const DEFAULT_NOT_FOUND_MESSAGE: &str =
    "No information found for the given topic. Please try another topic.";

/// Top-level configuration, as loaded from a JSON file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Slide layout and output settings.
    pub deck: DeckConfig,

    /// Knowledge source settings.
    pub wiki: WikiConfig,
}

impl Config {
    /// Load configuration from a JSON file. Missing fields take defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
            .map_err(|e| Error::ConfigError(format!("{}: {}", path.display(), e)))
    }

    /// Parse configuration from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Config =
            serde_json::from_str(json).map_err(|e| Error::ConfigError(e.to_string()))?;
        config.deck.validate()?;
        Ok(config)
    }
}

/// Settings for turning article text into slides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeckConfig {
    /// Font size for content slide titles.
    pub title_font_size: FontSize,

    /// Font size for every paragraph of a content slide.
    pub body_font_size: FontSize,

    /// Maximum number of content slides (and of fetched paragraphs).
    pub max_slides: usize,

    /// Number of sentence fragments per content slide.
    pub bullets_per_slide: usize,

    /// Apply `body_font_size` to the title frame too, after the title size
    /// has been set. This matches the historical output where content slide
    /// titles end up at the body size.
    pub uniform_text_size: bool,

    /// Directory generated decks are written to.
    pub output_dir: PathBuf,

    /// Title of the final slide.
    pub closing_title: String,

    /// Subtitle of the final slide.
    pub closing_subtitle: String,

    /// Paragraph used when the article does not exist.
    pub not_found_message: String,
}

impl Default for DeckConfig {
    fn default() -> Self {
        Self {
            title_font_size: FontSize::pt(30),
            body_font_size: FontSize::pt(18),
            max_slides: 12,
            bullets_per_slide: 3,
            uniform_text_size: true,
            output_dir: PathBuf::from("generated_ppt"),
            closing_title: "Thank You".to_string(),
            closing_subtitle: "Questions?".to_string(),
            not_found_message: DEFAULT_NOT_FOUND_MESSAGE.to_string(),
        }
    }
}

impl DeckConfig {
    /// Create a config with the default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum number of content slides.
    pub fn with_max_slides(mut self, max_slides: usize) -> Self {
        self.max_slides = max_slides;
        self
    }

    /// Set the number of bullets per slide (at least 1).
    pub fn with_bullets_per_slide(mut self, bullets: usize) -> Self {
        self.bullets_per_slide = bullets.max(1);
        self
    }

    /// Set the output directory.
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Set title and body font sizes.
    pub fn with_font_sizes(mut self, title: FontSize, body: FontSize) -> Self {
        self.title_font_size = title;
        self.body_font_size = body;
        self
    }

    /// Choose whether the body size also overrides content slide titles.
    pub fn with_uniform_text_size(mut self, uniform: bool) -> Self {
        self.uniform_text_size = uniform;
        self
    }

    /// Check values that would produce an unusable deck.
    pub fn validate(&self) -> Result<()> {
        if self.max_slides == 0 {
            return Err(Error::ConfigError("max_slides must be at least 1".into()));
        }
        if self.bullets_per_slide == 0 {
            return Err(Error::ConfigError(
                "bullets_per_slide must be at least 1".into(),
            ));
        }
        if self.title_font_size.0 == 0 || self.body_font_size.0 == 0 {
            return Err(Error::ConfigError("font sizes must be positive".into()));
        }
        Ok(())
    }
}

/// Settings for the Wikipedia client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WikiConfig {
    /// Wikipedia language edition, e.g. `en`.
    pub language: String,

    /// User agent sent with every request.
    pub user_agent: String,

    /// Full API URL, overriding the one derived from `language`.
    pub endpoint: Option<String>,

    /// Request timeout in seconds.
    pub timeout_secs: Option<u64>,
}

impl Default for WikiConfig {
    fn default() -> Self {
        Self {
            language: "en".to_string(),
            user_agent: format!("wiki-deck/{}", env!("CARGO_PKG_VERSION")),
            endpoint: None,
            timeout_secs: None,
        }
    }
}

impl WikiConfig {
    /// The Action API URL to query.
    pub fn api_url(&self) -> String {
        match &self.endpoint {
            Some(endpoint) => endpoint.clone(),
            None => format!("https://{}.wikipedia.org/w/api.php", self.language),
        }
    }
}
