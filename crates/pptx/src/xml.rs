//! Small wrapper over the quick-xml writer used to build OOXML parts.

use deck_core::{Error, Result};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::borrow::Cow;

/// Namespace of PresentationML elements (`p:`).
pub const NS_P: &str = "http://schemas.openxmlformats.org/presentationml/2006/main";
/// Namespace of DrawingML elements (`a:`).
pub const NS_A: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
/// Namespace of relationship attributes (`r:`).
pub const NS_R: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
/// Namespace of package relationship parts.
pub const NS_PACKAGE_RELS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";

/// Streaming XML document builder.
pub struct XmlBuilder {
    writer: Writer<Vec<u8>>,
}

impl XmlBuilder {
    /// Start a document with the standalone UTF-8 declaration.
    pub fn new() -> Result<Self> {
        let mut builder = Self {
            writer: Writer::new(Vec::new()),
        };
        builder.event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))?;
        Ok(builder)
    }

    /// Open an element.
    pub fn start(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<&mut Self> {
        let start = BytesStart::new(name).with_attributes(attrs.iter().copied());
        self.event(Event::Start(start))?;
        Ok(self)
    }

    /// Close an element.
    pub fn end(&mut self, name: &str) -> Result<&mut Self> {
        self.event(Event::End(BytesEnd::new(name)))?;
        Ok(self)
    }

    /// Write a self-closing element.
    pub fn empty(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<&mut Self> {
        let start = BytesStart::new(name).with_attributes(attrs.iter().copied());
        self.event(Event::Empty(start))?;
        Ok(self)
    }

    /// Write escaped text content. Characters XML 1.0 does not allow are
    /// dropped.
    pub fn text(&mut self, text: &str) -> Result<&mut Self> {
        let text = xml_safe(text);
        self.event(Event::Text(BytesText::new(&text)))?;
        Ok(self)
    }

    /// Write an element containing only text.
    pub fn text_element(&mut self, name: &str, text: &str) -> Result<&mut Self> {
        self.start(name, &[])?.text(text)?.end(name)
    }

    /// Finish the document and return its UTF-8 bytes.
    pub fn finish(self) -> Vec<u8> {
        self.writer.into_inner()
    }

    fn event(&mut self, event: Event<'_>) -> Result<()> {
        self.writer
            .write_event(event)
            .map_err(|e| Error::XmlError(e.to_string()))
    }
}

/// Whether `c` may appear in XML 1.0 character data.
fn is_xml_char(c: char) -> bool {
    matches!(c,
        '\t' | '\n' | '\r'
        | '\u{20}'..='\u{D7FF}'
        | '\u{E000}'..='\u{FFFD}'
        | '\u{10000}'..='\u{10FFFF}')
}

/// `text` without the characters XML 1.0 forbids.
fn xml_safe(text: &str) -> Cow<'_, str> {
    if text.chars().all(is_xml_char) {
        Cow::Borrowed(text)
    } else {
        Cow::Owned(text.chars().filter(|&c| is_xml_char(c)).collect())
    }
}
