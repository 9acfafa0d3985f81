//! Core domain types, content segmentation, deck building and delivery
//! for generating PowerPoint decks from Wikipedia articles.

pub mod builder;
pub mod config;
pub mod delivery;
pub mod error;
pub mod fetch;
pub mod pipeline;
pub mod segment;
pub mod types;

pub use builder::{output_path, sanitize_filename, DeckBuilder, DeckSerializer};
pub use config::{Config, DeckConfig, WikiConfig};
pub use delivery::{DownloadLink, PPTX_MIME_TYPE};
pub use error::{Error, Result};
pub use fetch::{fetch_content, Article, KnowledgeSource};
pub use pipeline::{GeneratedDeck, Outcome, RequestHandler};
pub use segment::Segmenter;
pub use types::{ArticleContent, Deck, FontSize, Slide, SlideLayout, SlidePlan, TextFrame};
