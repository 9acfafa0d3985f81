//! Full pipeline runs with an in-memory article source and the real PPTX
//! writer, read back through the parser.

use deck_core::{
    Article, DeckConfig, Error, FontSize, KnowledgeSource, Outcome, RequestHandler, Result,
};
use deck_pptx::{ParsedPresentation, PptxParser, PptxWriter};
use std::collections::HashMap;
use std::io::Cursor;

struct Library {
    articles: HashMap<String, String>,
}

impl Library {
    fn new(entries: &[(&str, &str)]) -> Self {
        Self {
            articles: entries
                .iter()
                .map(|(title, text)| (title.to_string(), text.to_string()))
                .collect(),
        }
    }
}

impl KnowledgeSource for Library {
    fn lookup(&self, title: &str) -> Result<Article> {
        Ok(match self.articles.get(title) {
            Some(text) => Article::new(text.clone()),
            None => Article::missing(),
        })
    }
}

const RUST_ARTICLE: &str = "Rust is a general-purpose programming language. It emphasizes performance. \
It enforces memory safety. It has no garbage collector.\n\n\
Rust was designed by Graydon Hoare. Work began in 2006. Mozilla sponsored it.\n\n\
\n\n\
The borrow checker tracks lifetimes";

fn handler(dir: &tempfile::TempDir, config: DeckConfig) -> RequestHandler<Library, PptxWriter> {
    let library = Library::new(&[("Rust (programming language)", RUST_ARTICLE)]);
    RequestHandler::with_config(
        library,
        PptxWriter::new(),
        config.with_output_dir(dir.path().join("generated_ppt")),
    )
}

fn read_back(bytes: Vec<u8>) -> ParsedPresentation {
    PptxParser::new()
        .parse(Cursor::new(bytes), "deck.pptx")
        .unwrap()
}

#[test]
fn test_existing_article_deck() {
    let dir = tempfile::tempdir().unwrap();
    let generated = handler(&dir, DeckConfig::default())
        .generate("Rust (programming language)")
        .unwrap();

    assert!(generated.article_found);
    assert_eq!(
        generated.path,
        dir.path()
            .join("generated_ppt")
            .join("Rust (programming language)_presentation.pptx")
    );

    // 3 + 3 + 1 fragments regroup into windows of 3, 3 and 1.
    let deck = read_back(std::fs::read(&generated.path).unwrap());
    assert_eq!(deck.slides.len(), 3 + 2);
    assert_eq!(generated.slide_count, deck.slides.len());

    let first = &deck.slides[0];
    assert_eq!(first.title_text(), "Rust (programming language)");
    assert_eq!(first.body().unwrap().text(), "");

    let titles: Vec<String> = deck.slides.iter().map(|s| s.title_text()).collect();
    assert_eq!(
        titles[1..4],
        [
            "Rust is a general-purpose programming language",
            "Rust was designed by Graydon Hoare",
            "The borrow checker tracks lifetimes",
        ]
    );

    let body = deck.slides[1].body().unwrap();
    assert_eq!(
        body.text(),
        "Rust is a general-purpose programming language\nIt emphasizes performance\nIt enforces memory safety"
    );

    let last = deck.slides.last().unwrap();
    assert_eq!(last.title_text(), "Thank You");
    assert_eq!(last.body().unwrap().text(), "Questions?");
}

#[test]
fn test_content_fonts_default_to_body_size() {
    let dir = tempfile::tempdir().unwrap();
    let generated = handler(&dir, DeckConfig::default())
        .generate("Rust (programming language)")
        .unwrap();
    let deck = read_back(generated.link.decode().unwrap());

    for slide in &deck.slides[1..deck.slides.len() - 1] {
        for shape in &slide.shapes {
            for paragraph in &shape.paragraphs {
                assert_eq!(paragraph.font_size, Some(FontSize::pt(18)));
            }
        }
    }
}

#[test]
fn test_content_titles_keep_title_size_when_not_uniform() {
    let dir = tempfile::tempdir().unwrap();
    let config = DeckConfig::default().with_uniform_text_size(false);
    let generated = handler(&dir, config)
        .generate("Rust (programming language)")
        .unwrap();
    let deck = read_back(generated.link.decode().unwrap());

    let slide = &deck.slides[1];
    assert_eq!(
        slide.title().unwrap().paragraphs[0].font_size,
        Some(FontSize::pt(30))
    );
    assert_eq!(
        slide.body().unwrap().paragraphs[0].font_size,
        Some(FontSize::pt(18))
    );
}

#[test]
fn test_missing_article_deck() {
    let dir = tempfile::tempdir().unwrap();
    let outcome = handler(&dir, DeckConfig::default()).handle("Xyyzqqnonexistentarticle12345");

    let generated = match outcome {
        Outcome::Success(generated) => generated,
        other => panic!("unexpected outcome: {:?}", other),
    };
    assert!(!generated.article_found);
    assert!(generated.path.exists());

    let deck = read_back(generated.link.decode().unwrap());
    assert_eq!(deck.slides.len(), 3);
    assert_eq!(
        deck.slides[1].title_text(),
        "No information found for the given topic"
    );
    assert_eq!(
        deck.slides[1].body().unwrap().text(),
        "No information found for the given topic\nPlease try another topic."
    );
}

#[test]
fn test_slide_cap() {
    let long_article: String = (0..30)
        .map(|i| format!("Paragraph {i} opens. It goes on. It closes."))
        .collect::<Vec<_>>()
        .join("\n\n");
    let dir = tempfile::tempdir().unwrap();
    let library = Library::new(&[("Long", long_article.as_str())]);
    let handler = RequestHandler::with_config(
        library,
        PptxWriter::new(),
        DeckConfig::default()
            .with_max_slides(5)
            .with_output_dir(dir.path()),
    );

    let generated = handler.generate("Long").unwrap();
    let deck = read_back(generated.link.decode().unwrap());
    assert_eq!(deck.slides.len(), 5 + 2);
    assert_eq!(deck.slides[5].title_text(), "Paragraph 4 opens");
}

#[test]
fn test_same_input_gives_identical_files() {
    let dir = tempfile::tempdir().unwrap();
    let handler = handler(&dir, DeckConfig::default());

    let first = handler.generate("Rust (programming language)").unwrap();
    let first_bytes = std::fs::read(&first.path).unwrap();
    let second = handler.generate("Rust (programming language)").unwrap();
    let second_bytes = std::fs::read(&second.path).unwrap();

    assert_eq!(first.path, second.path);
    assert_eq!(first_bytes, second_bytes);
    assert_eq!(first.link, second.link);
}

#[test]
fn test_link_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let generated = handler(&dir, DeckConfig::default())
        .generate("Rust (programming language)")
        .unwrap();

    assert_eq!(
        generated.link.decode().unwrap(),
        std::fs::read(&generated.path).unwrap()
    );
    assert_eq!(
        generated.link.filename,
        "Rust (programming language)_presentation.pptx"
    );
    assert!(generated
        .link
        .to_html()
        .starts_with("<a href=\"data:application/vnd.openxmlformats-officedocument.presentationml.presentation;base64,UEsDB"));
}

#[test]
fn test_empty_topic_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let handler = handler(&dir, DeckConfig::default());

    assert!(matches!(handler.generate(""), Err(Error::EmptyTopic)));
    assert!(matches!(handler.handle(" \t "), Outcome::Invalid(_)));
    assert!(!dir.path().join("generated_ppt").exists());
}
