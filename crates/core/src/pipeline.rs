//! Request handling: topic in, presentation file and download link out.

use crate::builder::{DeckBuilder, DeckSerializer};
use crate::config::DeckConfig;
use crate::delivery::DownloadLink;
use crate::error::{Error, Result};
use crate::fetch::{fetch_content, KnowledgeSource};
use crate::segment::Segmenter;
use serde::Serialize;
use std::path::PathBuf;

/// Message shown after a successful run.
pub const SUCCESS_MESSAGE: &str = "Presentation generated successfully!";

/// Message shown when fetching or writing fails.
pub const FAILURE_MESSAGE: &str =
    "Something went wrong while generating the presentation. Please try again later.";

/// Result of a successful generation.
#[derive(Debug, Clone, Serialize)]
pub struct GeneratedDeck {
    /// Topic the deck was generated for.
    pub topic: String,

    /// Where the presentation was written.
    pub path: PathBuf,

    /// Total number of slides, including title and closing slides.
    pub slide_count: usize,

    /// Whether the article existed.
    pub article_found: bool,

    /// The file, ready for download.
    pub link: DownloadLink,
}

/// What the user sees after submitting a topic.
#[derive(Debug)]
pub enum Outcome {
    /// The topic was rejected; nothing was generated.
    Invalid(String),

    /// The presentation was generated.
    Success(GeneratedDeck),

    /// Fetching or writing failed.
    Failed(String),
}

impl Outcome {
    /// Whether generation succeeded.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Message to display to the user.
    pub fn message(&self) -> &str {
        match self {
            Self::Invalid(msg) | Self::Failed(msg) => msg,
            Self::Success(_) => SUCCESS_MESSAGE,
        }
    }
}

/// Runs the fetch → segment → build → deliver pipeline for one topic.
pub struct RequestHandler<S, W> {
    source: S,
    serializer: W,
    config: DeckConfig,
}

impl<S: KnowledgeSource, W: DeckSerializer> RequestHandler<S, W> {
    /// Create a handler with the default settings.
    pub fn new(source: S, serializer: W) -> Self {
        Self::with_config(source, serializer, DeckConfig::default())
    }

    /// Create a handler with custom settings.
    pub fn with_config(source: S, serializer: W, config: DeckConfig) -> Self {
        Self {
            source,
            serializer,
            config,
        }
    }

    /// The settings in use.
    pub fn config(&self) -> &DeckConfig {
        &self.config
    }

    /// Generate a presentation, returning errors as they occur.
    pub fn generate(&self, topic: &str) -> Result<GeneratedDeck> {
        if topic.trim().is_empty() {
            return Err(Error::EmptyTopic);
        }
        self.config.validate()?;

        log::info!("Fetching content and generating presentation for '{}'", topic);

        let content = fetch_content(&self.source, topic, &self.config)?;

        let plans = Segmenter::new()
            .with_max_slides(self.config.max_slides)
            .with_bullets_per_slide(self.config.bullets_per_slide)
            .plan(&content.paragraphs);

        let builder = DeckBuilder::new(&self.config);
        let deck = builder.build(topic, &plans);
        let path = builder.save(&deck, &self.serializer, topic)?;

        let link = DownloadLink::from_path(&path)?;

        log::info!("Generated {} slides at {}", deck.slide_count(), path.display());

        Ok(GeneratedDeck {
            topic: topic.to_string(),
            path,
            slide_count: deck.slide_count(),
            article_found: content.found,
            link,
        })
    }

    /// Generate a presentation and map the result to a user-facing outcome.
    pub fn handle(&self, topic: &str) -> Outcome {
        match self.generate(topic) {
            Ok(generated) => Outcome::Success(generated),
            Err(Error::EmptyTopic) => Outcome::Invalid(Error::EmptyTopic.to_string()),
            Err(e) => {
                log::error!("Generation failed for '{}': {}", topic, e);
                Outcome::Failed(FAILURE_MESSAGE.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::Article;
    use crate::types::Deck;
    use std::cell::Cell;

    struct MapSource {
        text: Option<String>,
        calls: Cell<usize>,
    }

    impl MapSource {
        fn with_text(text: &str) -> Self {
            Self {
                text: Some(text.to_string()),
                calls: Cell::new(0),
            }
        }

        fn missing() -> Self {
            Self {
                text: None,
                calls: Cell::new(0),
            }
        }
    }

    impl KnowledgeSource for MapSource {
        fn lookup(&self, _title: &str) -> Result<Article> {
            self.calls.set(self.calls.get() + 1);
            Ok(match &self.text {
                Some(text) => Article::new(text.clone()),
                None => Article::missing(),
            })
        }
    }

    struct DownSource;

    impl KnowledgeSource for DownSource {
        fn lookup(&self, _title: &str) -> Result<Article> {
            Err(Error::FetchError("service unavailable".into()))
        }
    }

    /// One line per slide: layout, title and body.
    struct OutlineSerializer;

    impl DeckSerializer for OutlineSerializer {
        fn serialize(&self, deck: &Deck) -> Result<Vec<u8>> {
            let lines: Vec<String> = deck
                .slides
                .iter()
                .map(|s| {
                    format!(
                        "{:?}|{}|{}",
                        s.layout,
                        s.title.text(),
                        s.body.as_ref().map(|b| b.text()).unwrap_or_default()
                    )
                })
                .collect();
            Ok(lines.join("\n").into_bytes())
        }
    }

    fn config_in(dir: &tempfile::TempDir) -> DeckConfig {
        DeckConfig::default().with_output_dir(dir.path().join("generated_ppt"))
    }

    fn article(paragraphs: usize) -> String {
        (0..paragraphs)
            .map(|i| format!("Section {i} begins. It continues. It ends. Extra sentence."))
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    #[test]
    fn test_empty_topic_is_rejected_without_work() {
        let dir = tempfile::tempdir().unwrap();
        let source = MapSource::with_text("Text.");
        let handler = RequestHandler::with_config(&source, OutlineSerializer, config_in(&dir));

        let outcome = handler.handle("   ");
        assert!(matches!(outcome, Outcome::Invalid(_)));
        assert_eq!(outcome.message(), "Please enter a valid topic.");
        assert_eq!(source.calls.get(), 0);
        assert!(!dir.path().join("generated_ppt").exists());
    }

    #[test]
    fn test_slide_count_for_existing_article() {
        let dir = tempfile::tempdir().unwrap();
        let text = article(4);
        let handler =
            RequestHandler::with_config(MapSource::with_text(&text), OutlineSerializer, config_in(&dir));

        let generated = handler.generate("Topic").unwrap();
        assert!(generated.article_found);
        assert_eq!(generated.slide_count, 4 + 2);
        assert!(generated.path.exists());
    }

    #[test]
    fn test_slide_count_capped() {
        let dir = tempfile::tempdir().unwrap();
        let text = article(40);
        let handler =
            RequestHandler::with_config(MapSource::with_text(&text), OutlineSerializer, config_in(&dir));

        let generated = handler.generate("Topic").unwrap();
        assert_eq!(generated.slide_count, 12 + 2);
    }

    #[test]
    fn test_missing_article_gives_single_content_slide() {
        let dir = tempfile::tempdir().unwrap();
        let handler =
            RequestHandler::with_config(MapSource::missing(), OutlineSerializer, config_in(&dir));

        let generated = handler.generate("Xyyzqqnonexistentarticle12345").unwrap();
        assert!(!generated.article_found);
        assert_eq!(generated.slide_count, 3);

        let outline = String::from_utf8(generated.link.decode().unwrap()).unwrap();
        let lines: Vec<&str> = outline.lines().collect();
        assert_eq!(
            lines[1],
            "TitleAndContent|No information found for the given topic|No information found for the given topic"
        );
        assert_eq!(lines[2], "Please try another topic.");
        assert_eq!(lines[3], "Title|Thank You|Questions?");
    }

    #[test]
    fn test_link_matches_written_file() {
        let dir = tempfile::tempdir().unwrap();
        let handler =
            RequestHandler::with_config(MapSource::with_text("A. B. C."), OutlineSerializer, config_in(&dir));

        let generated = handler.generate("Letters").unwrap();
        let on_disk = std::fs::read(&generated.path).unwrap();
        assert_eq!(generated.link.decode().unwrap(), on_disk);
        assert_eq!(generated.link.filename, "Letters_presentation.pptx");
    }

    #[test]
    fn test_fetch_failure_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let handler = RequestHandler::with_config(DownSource, OutlineSerializer, config_in(&dir));

        assert!(matches!(
            handler.generate("Topic"),
            Err(Error::FetchError(_))
        ));

        let outcome = handler.handle("Topic");
        assert!(!outcome.is_success());
        assert_eq!(outcome.message(), FAILURE_MESSAGE);
    }

    #[test]
    fn test_write_failure_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, b"file").unwrap();
        let config = DeckConfig::default().with_output_dir(&blocker);
        let handler = RequestHandler::with_config(MapSource::with_text("A."), OutlineSerializer, config);

        let outcome = handler.handle("Topic");
        assert!(matches!(outcome, Outcome::Failed(_)));
    }

    #[test]
    fn test_invalid_config_is_rejected_before_fetch() {
        let dir = tempfile::tempdir().unwrap();
        let source = MapSource::with_text("A. B. C.");
        let handler =
            RequestHandler::with_config(&source, OutlineSerializer, config_in(&dir).with_max_slides(0));

        assert!(matches!(
            handler.generate("Topic"),
            Err(Error::ConfigError(_))
        ));
        assert!(matches!(handler.handle("Topic"), Outcome::Failed(_)));
        assert_eq!(source.calls.get(), 0);
        assert!(!dir.path().join("generated_ppt").exists());
    }
}
