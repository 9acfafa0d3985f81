//! Domain types for article content and the presentation being built.

use serde::{Deserialize, Serialize};

/// Paragraphs of an article, in source order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleContent {
    /// Non-empty, trimmed paragraphs.
    pub paragraphs: Vec<String>,

    /// False when the article does not exist and `paragraphs` holds the
    /// not-found message instead.
    pub found: bool,
}

impl ArticleContent {
    /// Content of an article that exists.
    pub fn found(paragraphs: Vec<String>) -> Self {
        Self {
            paragraphs,
            found: true,
        }
    }

    /// Placeholder content for a missing article.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            paragraphs: vec![message.into()],
            found: false,
        }
    }

    /// Number of paragraphs.
    pub fn len(&self) -> usize {
        self.paragraphs.len()
    }

    /// Whether there are no paragraphs at all.
    pub fn is_empty(&self) -> bool {
        self.paragraphs.is_empty()
    }
}

/// A content slide's title paired with its bullets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlidePlan {
    /// Slide title, taken from the first sentence of a paragraph.
    pub title: String,

    /// Sentence fragments shown as bullets.
    pub bullets: Vec<String>,
}

impl SlidePlan {
    /// Create a new slide plan.
    pub fn new(title: impl Into<String>, bullets: Vec<String>) -> Self {
        Self {
            title: title.into(),
            bullets,
        }
    }
}

/// A font size in points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FontSize(pub u32);

impl FontSize {
    /// Create a font size from whole points.
    pub const fn pt(points: u32) -> Self {
        Self(points)
    }

    /// Size in hundredths of a point, the unit DrawingML uses for `sz`.
    pub fn hundredths(self) -> u32 {
        self.0 * 100
    }
}

/// Slide layouts available in the generated deck.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SlideLayout {
    /// Centered title with a subtitle placeholder.
    Title,
    /// Title on top, bulleted body below.
    TitleAndContent,
}

/// Text placed in a placeholder, one entry per paragraph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextFrame {
    /// Paragraph texts.
    pub paragraphs: Vec<String>,

    /// Size applied to every run; `None` inherits from the layout.
    pub font_size: Option<FontSize>,
}

impl TextFrame {
    /// Build a frame from text, one paragraph per line.
    pub fn from_text(text: &str) -> Self {
        Self {
            paragraphs: text.split('\n').map(str::to_string).collect(),
            font_size: None,
        }
    }

    /// A frame with no text at all.
    pub fn empty() -> Self {
        Self {
            paragraphs: Vec::new(),
            font_size: None,
        }
    }

    /// Set the font size for every paragraph.
    pub fn with_font_size(mut self, size: FontSize) -> Self {
        self.font_size = Some(size);
        self
    }

    /// The frame's text with paragraphs joined by newlines.
    pub fn text(&self) -> String {
        self.paragraphs.join("\n")
    }
}

/// A single slide of the deck.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slide {
    /// Layout the slide is based on.
    pub layout: SlideLayout,

    /// Title placeholder text.
    pub title: TextFrame,

    /// Subtitle (title layout) or body (content layout) placeholder text.
    pub body: Option<TextFrame>,
}

impl Slide {
    /// Create a title-layout slide.
    pub fn title_slide(title: TextFrame, subtitle: Option<TextFrame>) -> Self {
        Self {
            layout: SlideLayout::Title,
            title,
            body: subtitle,
        }
    }

    /// Create a title-and-content slide.
    pub fn content_slide(title: TextFrame, body: TextFrame) -> Self {
        Self {
            layout: SlideLayout::TitleAndContent,
            title,
            body: Some(body),
        }
    }

    /// Text frames of this slide in placeholder order.
    pub fn text_frames_mut(&mut self) -> impl Iterator<Item = &mut TextFrame> {
        std::iter::once(&mut self.title).chain(self.body.as_mut())
    }
}

/// An in-memory presentation ready to be serialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deck {
    /// Presentation title, used for document metadata.
    pub title: String,

    /// Slides in presentation order.
    pub slides: Vec<Slide>,
}

impl Deck {
    /// Create an empty deck.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            slides: Vec::new(),
        }
    }

    /// Add a slide to the deck.
    pub fn add_slide(&mut self, slide: Slide) {
        self.slides.push(slide);
    }

    /// Number of slides.
    pub fn slide_count(&self) -> usize {
        self.slides.len()
    }
}
