//! Assembling slides into a deck and writing it to disk.

use crate::config::DeckConfig;
use crate::error::Result;
use crate::types::{Deck, Slide, SlidePlan, TextFrame};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

/// Characters that are not allowed in generated file names.
static UNSAFE_FILENAME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[/\\:*?"<>|\x00-\x1F\x7F]"#).unwrap());

/// File extension of generated decks.
pub const DECK_EXTENSION: &str = "pptx";

/// Turns a deck into the bytes of a presentation file.
pub trait DeckSerializer {
    /// Serialize the whole deck.
    fn serialize(&self, deck: &Deck) -> Result<Vec<u8>>;
}

impl<T: DeckSerializer + ?Sized> DeckSerializer for &T {
    fn serialize(&self, deck: &Deck) -> Result<Vec<u8>> {
        (**self).serialize(deck)
    }
}

/// Builds decks from slide plans.
#[derive(Debug, Clone)]
pub struct DeckBuilder<'a> {
    config: &'a DeckConfig,
}

impl<'a> DeckBuilder<'a> {
    /// Create a builder using the given settings.
    pub fn new(config: &'a DeckConfig) -> Self {
        Self { config }
    }

    /// Build the deck: a title slide, one slide per plan, and a closing slide.
    pub fn build(&self, topic: &str, plans: &[SlidePlan]) -> Deck {
        let mut deck = Deck::new(topic);

        deck.add_slide(Slide::title_slide(
            TextFrame::from_text(topic),
            Some(TextFrame::empty()),
        ));

        for plan in plans {
            deck.add_slide(self.content_slide(plan));
        }

        deck.add_slide(Slide::title_slide(
            TextFrame::from_text(&self.config.closing_title),
            Some(TextFrame::from_text(&self.config.closing_subtitle)),
        ));

        log::debug!("Built deck '{}' with {} slides", topic, deck.slide_count());
        deck
    }

    /// A title-and-content slide with the configured font sizes.
    fn content_slide(&self, plan: &SlidePlan) -> Slide {
        let title = TextFrame::from_text(&plan.title).with_font_size(self.config.title_font_size);
        let body = TextFrame::from_text(&plan.bullets.join("\n"));
        let mut slide = Slide::content_slide(title, body);

        for frame in slide.text_frames_mut() {
            if frame.font_size.is_none() || self.config.uniform_text_size {
                frame.font_size = Some(self.config.body_font_size);
            }
        }

        slide
    }

    /// Serialize the deck and write it to the output path for `topic`.
    ///
    /// Creates the output directory if needed and overwrites any existing
    /// file.
    pub fn save<S: DeckSerializer + ?Sized>(
        &self,
        deck: &Deck,
        serializer: &S,
        topic: &str,
    ) -> Result<PathBuf> {
        let bytes = serializer.serialize(deck)?;

        std::fs::create_dir_all(&self.config.output_dir)?;
        let path = output_path(&self.config.output_dir, topic);
        std::fs::write(&path, &bytes)?;

        log::debug!("Wrote {} bytes to {}", bytes.len(), path.display());
        Ok(path)
    }
}

/// Output path for a topic: `<dir>/<topic>_presentation.pptx`.
pub fn output_path(dir: &Path, topic: &str) -> PathBuf {
    dir.join(format!(
        "{}_presentation.{}",
        sanitize_filename(topic),
        DECK_EXTENSION
    ))
}

/// Replace characters that cannot appear in a file name with `_`.
pub fn sanitize_filename(name: &str) -> String {
    UNSAFE_FILENAME_REGEX.replace_all(name, "_").into_owned()
}
