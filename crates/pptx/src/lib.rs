//! PPTX (Office Open XML) backend for generated decks.
//!
//! Writes decks as .pptx files, which are ZIP archives containing XML
//! documents, and reads them back for inspection.

pub mod parser;
pub mod template;
pub mod writer;
pub mod xml;

pub use parser::{ParsedParagraph, ParsedPresentation, ParsedShape, ParsedSlide, PptxParser};
pub use writer::PptxWriter;
