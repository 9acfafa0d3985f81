//! PPTX file parser implementation.
//!
//! Reads a deck back into slides, shapes and paragraphs. Used to inspect
//! generated files.

use deck_core::{Error, FontSize, Result};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::collections::HashMap;
use std::io::{Read, Seek};
use zip::ZipArchive;

/// A presentation read from a PPTX file.
#[derive(Debug, Clone)]
pub struct ParsedPresentation {
    /// Original filename (without path).
    pub filename: String,

    /// Slides in presentation order.
    pub slides: Vec<ParsedSlide>,
}

/// One slide of a parsed presentation.
#[derive(Debug, Clone)]
pub struct ParsedSlide {
    /// 1-based slide number.
    pub number: usize,

    /// Shapes with text, in document order.
    pub shapes: Vec<ParsedShape>,
}

impl ParsedSlide {
    /// The title placeholder, if the slide has one.
    pub fn title(&self) -> Option<&ParsedShape> {
        self.shapes.iter().find(|s| s.is_title())
    }

    /// The first non-title placeholder, if any.
    pub fn body(&self) -> Option<&ParsedShape> {
        self.shapes
            .iter()
            .find(|s| s.placeholder.is_some() && !s.is_title())
    }

    /// Text of the title placeholder, or an empty string.
    pub fn title_text(&self) -> String {
        self.title().map(ParsedShape::text).unwrap_or_default()
    }
}

/// A shape and the paragraphs of its text body.
#[derive(Debug, Clone, Default)]
pub struct ParsedShape {
    /// Placeholder type (`title`, `ctrTitle`, `subTitle`, `obj`, ...), if the
    /// shape is a placeholder.
    pub placeholder: Option<String>,

    /// Paragraphs in order.
    pub paragraphs: Vec<ParsedParagraph>,
}

impl ParsedShape {
    /// Whether this is a title placeholder.
    pub fn is_title(&self) -> bool {
        matches!(self.placeholder.as_deref(), Some("title" | "ctrTitle"))
    }

    /// Paragraph texts joined by newlines.
    pub fn text(&self) -> String {
        self.paragraphs
            .iter()
            .map(|p| p.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// A paragraph with the font size of its first run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedParagraph {
    /// Concatenated run text.
    pub text: String,

    /// Explicit size from the first `a:rPr` or `a:endParaRPr`.
    pub font_size: Option<FontSize>,
}

/// Parser for PPTX (Office Open XML) files.
pub struct PptxParser;

impl PptxParser {
    /// Create a new PPTX parser.
    pub fn new() -> Self {
        Self
    }

    /// Parse a PPTX file from a reader.
    pub fn parse<R: Read + Seek>(&self, reader: R, filename: &str) -> Result<ParsedPresentation> {
        let mut archive = ZipArchive::new(reader)
            .map_err(|e| Error::ZipError(format!("Failed to open ZIP: {}", e)))?;

        let slide_order = self.get_slide_order(&mut archive)?;
        log::debug!("{}: {} slides", filename, slide_order.len());

        let mut slides = Vec::with_capacity(slide_order.len());
        for (idx, slide_path) in slide_order.iter().enumerate() {
            let content = self.read_file_from_archive(&mut archive, slide_path)?;
            slides.push(ParsedSlide {
                number: idx + 1,
                shapes: extract_shapes_from_xml(&content)?,
            });
        }

        Ok(ParsedPresentation {
            filename: filename.to_string(),
            slides,
        })
    }

    /// Get the ordered list of slide paths.
    ///
    /// Follows `p:sldIdLst` in `presentation.xml`; if that list is absent,
    /// falls back to the numbers in the relationship IDs.
    fn get_slide_order<R: Read + Seek>(&self, archive: &mut ZipArchive<R>) -> Result<Vec<String>> {
        let rels_content = self.read_file_from_archive(archive, "ppt/_rels/presentation.xml.rels")?;
        let slide_rels = parse_slide_relationships(&rels_content)?;

        let presentation = self.read_file_from_archive(archive, "ppt/presentation.xml")?;
        let listed = parse_slide_id_list(&presentation)?;

        if !listed.is_empty() {
            return listed
                .iter()
                .map(|rel_id| {
                    slide_rels.get(rel_id).cloned().ok_or_else(|| {
                        Error::PptxParseError(format!("Unknown slide relationship '{}'", rel_id))
                    })
                })
                .collect();
        }

        let mut slides: Vec<(&String, &String)> = slide_rels.iter().collect();
        slides.sort_by_key(|(id, path)| {
            extract_slide_number(id).or_else(|| extract_slide_number(path))
        });
        Ok(slides.into_iter().map(|(_, path)| path.clone()).collect())
    }

    /// Read a file from the ZIP archive.
    fn read_file_from_archive<R: Read + Seek>(
        &self,
        archive: &mut ZipArchive<R>,
        path: &str,
    ) -> Result<String> {
        let mut file = archive
            .by_name(path)
            .map_err(|e| Error::ZipError(format!("File not found in archive '{}': {}", path, e)))?;

        let mut content = String::new();
        file.read_to_string(&mut content)
            .map_err(|e| Error::ZipError(format!("Failed to read '{}': {}", path, e)))?;

        Ok(content)
    }
}

impl Default for PptxParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Map slide relationship IDs to archive paths.
fn parse_slide_relationships(xml: &str) -> Result<HashMap<String, String>> {
    let mut slides = HashMap::new();
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    loop {
        match reader.read_event() {
            Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e))
                if local_name(e.name().as_ref()) == b"Relationship" =>
            {
                let rel_type = attribute(e, b"Type").unwrap_or_default();
                if !rel_type.ends_with("/slide") {
                    continue;
                }
                if let (Some(id), Some(target)) = (attribute(e, b"Id"), attribute(e, b"Target")) {
                    let full_path = match target.strip_prefix('/') {
                        Some(absolute) => absolute.to_string(),
                        None => format!("ppt/{}", target),
                    };
                    slides.insert(id, full_path);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::XmlError(format!(
                    "Error parsing relationships: {}",
                    e
                )));
            }
            _ => {}
        }
    }

    Ok(slides)
}

/// Relationship IDs of `p:sldId` entries, in order.
fn parse_slide_id_list(xml: &str) -> Result<Vec<String>> {
    let mut ids = Vec::new();
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    loop {
        match reader.read_event() {
            Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e))
                if local_name(e.name().as_ref()) == b"sldId" =>
            {
                let rel_id = e
                    .attributes()
                    .flatten()
                    .find(|a| a.key.as_ref().ends_with(b":id"))
                    .map(|a| String::from_utf8_lossy(&a.value).into_owned());
                if let Some(rel_id) = rel_id {
                    ids.push(rel_id);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::XmlError(format!(
                    "Error parsing presentation: {}",
                    e
                )));
            }
            _ => {}
        }
    }

    Ok(ids)
}

/// Extract shapes with their paragraphs from slide XML.
fn extract_shapes_from_xml(xml_content: &str) -> Result<Vec<ParsedShape>> {
    let mut shapes = Vec::new();
    let mut reader = Reader::from_str(xml_content);

    let mut current_shape: Option<ParsedShape> = None;
    let mut current_paragraph: Option<ParsedParagraph> = None;
    let mut in_text = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => match local_name(e.name().as_ref()) {
                b"sp" => current_shape = Some(ParsedShape::default()),
                b"p" if current_shape.is_some() => {
                    current_paragraph = Some(ParsedParagraph::default());
                }
                b"t" => in_text = current_paragraph.is_some(),
                b"rPr" | b"endParaRPr" => record_font_size(e, current_paragraph.as_mut()),
                b"ph" => record_placeholder(e, current_shape.as_mut()),
                _ => {}
            },
            Ok(Event::Empty(ref e)) => match local_name(e.name().as_ref()) {
                b"ph" => record_placeholder(e, current_shape.as_mut()),
                b"rPr" | b"endParaRPr" => record_font_size(e, current_paragraph.as_mut()),
                _ => {}
            },
            Ok(Event::Text(ref e)) => {
                if in_text {
                    if let Some(paragraph) = current_paragraph.as_mut() {
                        let text = e.unescape().unwrap_or_default();
                        paragraph.text.push_str(&text);
                    }
                }
            }
            Ok(Event::End(ref e)) => match local_name(e.name().as_ref()) {
                b"t" => in_text = false,
                b"p" => {
                    if let (Some(shape), Some(paragraph)) =
                        (current_shape.as_mut(), current_paragraph.take())
                    {
                        shape.paragraphs.push(paragraph);
                    }
                }
                b"sp" => {
                    if let Some(shape) = current_shape.take() {
                        if !shape.paragraphs.is_empty() {
                            shapes.push(shape);
                        }
                    }
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::XmlError(format!("Error parsing slide: {}", e)));
            }
            _ => {}
        }
    }

    Ok(shapes)
}

/// Set the placeholder type of the current shape. A `p:ph` without a type
/// is a content (`obj`) placeholder.
fn record_placeholder(e: &BytesStart, shape: Option<&mut ParsedShape>) {
    if let Some(shape) = shape {
        shape.placeholder = Some(attribute(e, b"type").unwrap_or_else(|| "obj".to_string()));
    }
}

/// Keep the first explicit `sz` seen in a paragraph.
fn record_font_size(e: &BytesStart, paragraph: Option<&mut ParsedParagraph>) {
    if let Some(paragraph) = paragraph {
        if paragraph.font_size.is_none() {
            paragraph.font_size = attribute(e, b"sz")
                .and_then(|sz| sz.parse::<u32>().ok())
                .map(|hundredths| FontSize::pt(hundredths / 100));
        }
    }
}

/// Value of an unprefixed attribute.
fn attribute(e: &BytesStart, key: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|a| a.key.as_ref() == key)
        .map(|a| String::from_utf8_lossy(&a.value).into_owned())
}

/// Extract the local name from a potentially namespaced XML element name.
fn local_name(name: &[u8]) -> &[u8] {
    if let Some(pos) = name.iter().position(|&b| b == b':') {
        &name[pos + 1..]
    } else {
        name
    }
}

/// Extract a slide number from a string like "rId2" or "slide3.xml".
fn extract_slide_number(s: &str) -> Option<usize> {
    let s = s.trim_end_matches(".xml").trim_end_matches(".rels");

    let digits: String = s.chars().rev().take_while(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    let digits: String = digits.chars().rev().collect();
    digits.parse().ok()
}
