//! PPTX file writer implementation.

use crate::template::{
    CONTENT_LAYOUT_PART, PRESENTATION_RELS, STATIC_PARTS, STATIC_RELS, TITLE_LAYOUT_PART,
};
use crate::xml::{XmlBuilder, NS_A, NS_P, NS_PACKAGE_RELS, NS_R};
use deck_core::{Deck, DeckSerializer, Error, Result, Slide, SlideLayout, TextFrame};
use std::io::{Cursor, Write};
use zip::write::FileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

const SLIDE_REL_TYPE: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide";
const SLIDE_LAYOUT_REL_TYPE: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideLayout";
const SLIDE_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.slide+xml";

/// Language tag written on every text run.
const TEXT_LANGUAGE: &str = "en-US";

/// `p:sldId` values must start at 256.
const FIRST_SLIDE_ID: usize = 256;

/// 10in x 7.5in, in EMU.
const DEFAULT_SLIDE_WIDTH: u32 = 9_144_000;
const DEFAULT_SLIDE_HEIGHT: u32 = 6_858_000;

/// Writer for PPTX (Office Open XML) files.
#[derive(Debug, Clone)]
pub struct PptxWriter {
    slide_width: u32,
    slide_height: u32,
}

impl PptxWriter {
    /// Create a writer producing 4:3 slides.
    pub fn new() -> Self {
        Self {
            slide_width: DEFAULT_SLIDE_WIDTH,
            slide_height: DEFAULT_SLIDE_HEIGHT,
        }
    }

    /// Use a custom slide size in EMU.
    pub fn with_slide_size(mut self, width: u32, height: u32) -> Self {
        self.slide_width = width;
        self.slide_height = height;
        self
    }

    /// Write the deck as a PPTX package.
    ///
    /// Entries carry a fixed timestamp, so the same deck always produces
    /// the same bytes.
    pub fn to_bytes(&self, deck: &Deck) -> Result<Vec<u8>> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let options = FileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .last_modified_time(DateTime::default());

        let slide_count = deck.slides.len();

        write_part(&mut zip, options, "[Content_Types].xml", &content_types_xml(slide_count)?)?;
        for (path, xml) in STATIC_RELS {
            write_part(&mut zip, options, path, xml.as_bytes())?;
        }
        write_part(&mut zip, options, "docProps/core.xml", &core_properties_xml(deck)?)?;
        write_part(&mut zip, options, "docProps/app.xml", &app_properties_xml(slide_count)?)?;
        write_part(&mut zip, options, "ppt/presentation.xml", &self.presentation_xml(slide_count)?)?;
        write_part(
            &mut zip,
            options,
            "ppt/_rels/presentation.xml.rels",
            &presentation_rels_xml(slide_count)?,
        )?;
        for (path, _, xml) in STATIC_PARTS {
            write_part(&mut zip, options, path, xml.as_bytes())?;
        }

        for (index, slide) in deck.slides.iter().enumerate() {
            let number = index + 1;
            write_part(
                &mut zip,
                options,
                &format!("ppt/slides/slide{}.xml", number),
                &slide_xml(slide)?,
            )?;
            write_part(
                &mut zip,
                options,
                &format!("ppt/slides/_rels/slide{}.xml.rels", number),
                &slide_rels_xml(slide.layout)?,
            )?;
        }

        let cursor = zip.finish().map_err(zip_error)?;
        let bytes = cursor.into_inner();
        log::debug!("Serialized {} slides into {} bytes", slide_count, bytes.len());
        Ok(bytes)
    }

    /// Generate `ppt/presentation.xml`.
    fn presentation_xml(&self, slide_count: usize) -> Result<Vec<u8>> {
        let mut xml = XmlBuilder::new()?;
        xml.start(
            "p:presentation",
            &[
                ("xmlns:a", NS_A),
                ("xmlns:r", NS_R),
                ("xmlns:p", NS_P),
                ("saveSubsetFonts", "1"),
            ],
        )?;

        xml.start("p:sldMasterIdLst", &[])?
            .empty("p:sldMasterId", &[("id", "2147483648"), ("r:id", "rId1")])?
            .end("p:sldMasterIdLst")?;

        if slide_count > 0 {
            xml.start("p:sldIdLst", &[])?;
            for index in 0..slide_count {
                let id = (FIRST_SLIDE_ID + index).to_string();
                let rel_id = slide_rel_id(index);
                xml.empty("p:sldId", &[("id", id.as_str()), ("r:id", rel_id.as_str())])?;
            }
            xml.end("p:sldIdLst")?;
        }

        let width = self.slide_width.to_string();
        let height = self.slide_height.to_string();
        xml.empty("p:sldSz", &[("cx", width.as_str()), ("cy", height.as_str())])?
            .empty("p:notesSz", &[("cx", "6858000"), ("cy", "9144000")])?
            .end("p:presentation")?;

        Ok(xml.finish())
    }
}

impl Default for PptxWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl DeckSerializer for PptxWriter {
    fn serialize(&self, deck: &Deck) -> Result<Vec<u8>> {
        self.to_bytes(deck)
    }
}

/// A placeholder shape a slide fills in.
struct Placeholder {
    name: &'static str,
    kind: Option<&'static str>,
    idx: Option<&'static str>,
}

/// Title and body placeholders of a layout.
fn placeholders(layout: SlideLayout) -> (Placeholder, Placeholder) {
    match layout {
        SlideLayout::Title => (
            Placeholder {
                name: "Title 1",
                kind: Some("ctrTitle"),
                idx: None,
            },
            Placeholder {
                name: "Subtitle 2",
                kind: Some("subTitle"),
                idx: Some("1"),
            },
        ),
        SlideLayout::TitleAndContent => (
            Placeholder {
                name: "Title 1",
                kind: Some("title"),
                idx: None,
            },
            Placeholder {
                name: "Content Placeholder 2",
                kind: None,
                idx: Some("1"),
            },
        ),
    }
}

/// Relationship ID of the slide at `index`, numbered after the fixed parts.
fn slide_rel_id(index: usize) -> String {
    format!("rId{}", PRESENTATION_RELS.len() + 1 + index)
}

fn layout_part(layout: SlideLayout) -> &'static str {
    match layout {
        SlideLayout::Title => TITLE_LAYOUT_PART,
        SlideLayout::TitleAndContent => CONTENT_LAYOUT_PART,
    }
}

/// Generate the XML of one slide.
fn slide_xml(slide: &Slide) -> Result<Vec<u8>> {
    let mut xml = XmlBuilder::new()?;
    xml.start(
        "p:sld",
        &[("xmlns:a", NS_A), ("xmlns:r", NS_R), ("xmlns:p", NS_P)],
    )?
    .start("p:cSld", &[])?
    .start("p:spTree", &[])?;

    // Group shape properties are required even when empty
    xml.start("p:nvGrpSpPr", &[])?
        .empty("p:cNvPr", &[("id", "1"), ("name", "")])?
        .empty("p:cNvGrpSpPr", &[])?
        .empty("p:nvPr", &[])?
        .end("p:nvGrpSpPr")?
        .start("p:grpSpPr", &[])?
        .start("a:xfrm", &[])?
        .empty("a:off", &[("x", "0"), ("y", "0")])?
        .empty("a:ext", &[("cx", "0"), ("cy", "0")])?
        .empty("a:chOff", &[("x", "0"), ("y", "0")])?
        .empty("a:chExt", &[("cx", "0"), ("cy", "0")])?
        .end("a:xfrm")?
        .end("p:grpSpPr")?;

    let (title_ph, body_ph) = placeholders(slide.layout);
    write_placeholder(&mut xml, 2, &title_ph, &slide.title)?;
    if let Some(body) = &slide.body {
        write_placeholder(&mut xml, 3, &body_ph, body)?;
    }

    xml.end("p:spTree")?
        .end("p:cSld")?
        .start("p:clrMapOvr", &[])?
        .empty("a:masterClrMapping", &[])?
        .end("p:clrMapOvr")?
        .end("p:sld")?;

    Ok(xml.finish())
}

/// Write a placeholder shape holding `frame`.
fn write_placeholder(
    xml: &mut XmlBuilder,
    shape_id: u32,
    placeholder: &Placeholder,
    frame: &TextFrame,
) -> Result<()> {
    let id = shape_id.to_string();
    let mut ph_attrs: Vec<(&str, &str)> = Vec::new();
    if let Some(kind) = placeholder.kind {
        ph_attrs.push(("type", kind));
    }
    if let Some(idx) = placeholder.idx {
        ph_attrs.push(("idx", idx));
    }

    xml.start("p:sp", &[])?
        .start("p:nvSpPr", &[])?
        .empty("p:cNvPr", &[("id", id.as_str()), ("name", placeholder.name)])?
        .start("p:cNvSpPr", &[])?
        .empty("a:spLocks", &[("noGrp", "1")])?
        .end("p:cNvSpPr")?
        .start("p:nvPr", &[])?
        .empty("p:ph", &ph_attrs)?
        .end("p:nvPr")?
        .end("p:nvSpPr")?
        .empty("p:spPr", &[])?;

    write_text_body(xml, frame)?;
    xml.end("p:sp")?;
    Ok(())
}

/// Write a text body with one `a:p` per paragraph.
fn write_text_body(xml: &mut XmlBuilder, frame: &TextFrame) -> Result<()> {
    let size = frame.font_size.map(|s| s.hundredths().to_string());

    let mut end_attrs: Vec<(&str, &str)> = vec![("lang", TEXT_LANGUAGE)];
    if let Some(sz) = &size {
        end_attrs.push(("sz", sz.as_str()));
    }
    let mut run_attrs = end_attrs.clone();
    run_attrs.push(("dirty", "0"));

    xml.start("p:txBody", &[])?
        .empty("a:bodyPr", &[])?
        .empty("a:lstStyle", &[])?;

    if frame.paragraphs.is_empty() {
        xml.start("a:p", &[])?
            .empty("a:endParaRPr", &end_attrs)?
            .end("a:p")?;
    }

    for paragraph in &frame.paragraphs {
        xml.start("a:p", &[])?;
        if !paragraph.is_empty() {
            xml.start("a:r", &[])?
                .empty("a:rPr", &run_attrs)?
                .text_element("a:t", paragraph)?
                .end("a:r")?;
        }
        xml.empty("a:endParaRPr", &end_attrs)?.end("a:p")?;
    }

    xml.end("p:txBody")?;
    Ok(())
}

/// Generate a slide's relationship part pointing at its layout.
fn slide_rels_xml(layout: SlideLayout) -> Result<Vec<u8>> {
    let target = format!(
        "../slideLayouts/{}",
        layout_part(layout).rsplit('/').next().unwrap_or_default()
    );

    let mut xml = XmlBuilder::new()?;
    xml.start("Relationships", &[("xmlns", NS_PACKAGE_RELS)])?
        .empty(
            "Relationship",
            &[
                ("Id", "rId1"),
                ("Type", SLIDE_LAYOUT_REL_TYPE),
                ("Target", target.as_str()),
            ],
        )?
        .end("Relationships")?;
    Ok(xml.finish())
}

/// Generate `ppt/_rels/presentation.xml.rels`.
fn presentation_rels_xml(slide_count: usize) -> Result<Vec<u8>> {
    let mut xml = XmlBuilder::new()?;
    xml.start("Relationships", &[("xmlns", NS_PACKAGE_RELS)])?;

    for (id, rel_type, target) in PRESENTATION_RELS {
        xml.empty(
            "Relationship",
            &[("Id", *id), ("Type", *rel_type), ("Target", *target)],
        )?;
    }

    for index in 0..slide_count {
        let id = slide_rel_id(index);
        let target = format!("slides/slide{}.xml", index + 1);
        xml.empty(
            "Relationship",
            &[("Id", id.as_str()), ("Type", SLIDE_REL_TYPE), ("Target", target.as_str())],
        )?;
    }

    xml.end("Relationships")?;
    Ok(xml.finish())
}

/// Generate `[Content_Types].xml`.
fn content_types_xml(slide_count: usize) -> Result<Vec<u8>> {
    let mut xml = XmlBuilder::new()?;
    xml.start(
        "Types",
        &[(
            "xmlns",
            "http://schemas.openxmlformats.org/package/2006/content-types",
        )],
    )?
    .empty(
        "Default",
        &[
            ("Extension", "rels"),
            (
                "ContentType",
                "application/vnd.openxmlformats-package.relationships+xml",
            ),
        ],
    )?
    .empty(
        "Default",
        &[("Extension", "xml"), ("ContentType", "application/xml")],
    )?;

    let mut overrides: Vec<(String, &str)> = vec![
        (
            "/ppt/presentation.xml".to_string(),
            "application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml",
        ),
        (
            "/docProps/core.xml".to_string(),
            "application/vnd.openxmlformats-package.core-properties+xml",
        ),
        (
            "/docProps/app.xml".to_string(),
            "application/vnd.openxmlformats-officedocument.extended-properties+xml",
        ),
    ];
    overrides.extend(
        STATIC_PARTS
            .iter()
            .map(|(path, content_type, _)| (format!("/{}", path), *content_type)),
    );
    overrides.extend(
        (1..=slide_count).map(|n| (format!("/ppt/slides/slide{}.xml", n), SLIDE_CONTENT_TYPE)),
    );

    for (part_name, content_type) in &overrides {
        xml.empty(
            "Override",
            &[("PartName", part_name.as_str()), ("ContentType", *content_type)],
        )?;
    }

    xml.end("Types")?;
    Ok(xml.finish())
}

/// Generate `docProps/core.xml`. No timestamps, to keep output stable.
fn core_properties_xml(deck: &Deck) -> Result<Vec<u8>> {
    let mut xml = XmlBuilder::new()?;
    xml.start(
        "cp:coreProperties",
        &[
            (
                "xmlns:cp",
                "http://schemas.openxmlformats.org/package/2006/metadata/core-properties",
            ),
            ("xmlns:dc", "http://purl.org/dc/elements/1.1/"),
            ("xmlns:dcterms", "http://purl.org/dc/terms/"),
            ("xmlns:dcmitype", "http://purl.org/dc/dcmitype/"),
            ("xmlns:xsi", "http://www.w3.org/2001/XMLSchema-instance"),
        ],
    )?
    .text_element("dc:title", &deck.title)?
    .text_element("dc:creator", "wiki-deck")?
    .end("cp:coreProperties")?;
    Ok(xml.finish())
}

/// Generate `docProps/app.xml`.
fn app_properties_xml(slide_count: usize) -> Result<Vec<u8>> {
    let slides = slide_count.to_string();
    let mut xml = XmlBuilder::new()?;
    xml.start(
        "Properties",
        &[
            (
                "xmlns",
                "http://schemas.openxmlformats.org/officeDocument/2006/extended-properties",
            ),
            (
                "xmlns:vt",
                "http://schemas.openxmlformats.org/officeDocument/2006/docPropsVTypes",
            ),
        ],
    )?
    .text_element("Application", "wiki-deck")?
    .text_element("Slides", &slides)?
    .end("Properties")?;
    Ok(xml.finish())
}

/// Add one file to the archive.
fn write_part<W: Write + std::io::Seek>(
    zip: &mut ZipWriter<W>,
    options: FileOptions,
    name: &str,
    data: &[u8],
) -> Result<()> {
    zip.start_file(name, options).map_err(zip_error)?;
    zip.write_all(data)
        .map_err(|e| Error::ZipError(format!("Failed to write '{}': {}", name, e)))?;
    Ok(())
}

fn zip_error(e: zip::result::ZipError) -> Error {
    Error::ZipError(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use deck_core::{FontSize, TextFrame};
    use std::io::Read;
    use zip::ZipArchive;

    fn sample_deck() -> Deck {
        let mut deck = Deck::new("Rust & Friends");
        deck.add_slide(Slide::title_slide(
            TextFrame::from_text("Rust & Friends"),
            Some(TextFrame::empty()),
        ));
        deck.add_slide(Slide::content_slide(
            TextFrame::from_text("Ownership").with_font_size(FontSize::pt(18)),
            TextFrame::from_text("Moves\n\nBorrows").with_font_size(FontSize::pt(18)),
        ));
        deck.add_slide(Slide::title_slide(
            TextFrame::from_text("Thank You"),
            Some(TextFrame::from_text("Questions?")),
        ));
        deck
    }

    fn read_entry(bytes: &[u8], name: &str) -> String {
        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut file = archive.by_name(name).unwrap();
        let mut content = String::new();
        file.read_to_string(&mut content).unwrap();
        content
    }

    #[test]
    fn test_package_contains_required_parts() {
        let bytes = PptxWriter::new().to_bytes(&sample_deck()).unwrap();
        let archive = ZipArchive::new(Cursor::new(&bytes[..])).unwrap();
        let names: Vec<&str> = archive.file_names().collect();

        for required in [
            "[Content_Types].xml",
            "_rels/.rels",
            "ppt/presentation.xml",
            "ppt/_rels/presentation.xml.rels",
            "ppt/slideMasters/slideMaster1.xml",
            "ppt/slideLayouts/slideLayout1.xml",
            "ppt/slideLayouts/slideLayout2.xml",
            "ppt/theme/theme1.xml",
            "ppt/slides/slide1.xml",
            "ppt/slides/slide3.xml",
            "ppt/slides/_rels/slide2.xml.rels",
        ] {
            assert!(names.contains(&required), "missing {}", required);
        }
        assert!(!names.contains(&"ppt/slides/slide4.xml"));
    }

    #[test]
    fn test_output_is_deterministic() {
        let writer = PptxWriter::new();
        let deck = sample_deck();
        assert_eq!(writer.to_bytes(&deck).unwrap(), writer.to_bytes(&deck).unwrap());
    }

    #[test]
    fn test_presentation_lists_slides_in_order() {
        let bytes = PptxWriter::new().to_bytes(&sample_deck()).unwrap();
        let presentation = read_entry(&bytes, "ppt/presentation.xml");
        assert!(presentation.contains(
            r#"<p:sldIdLst><p:sldId id="256" r:id="rId6"/><p:sldId id="257" r:id="rId7"/><p:sldId id="258" r:id="rId8"/></p:sldIdLst>"#
        ));

        let rels = read_entry(&bytes, "ppt/_rels/presentation.xml.rels");
        assert!(rels.contains(r#"Id="rId7" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide" Target="slides/slide2.xml""#));
    }

    #[test]
    fn test_content_slide_xml() {
        let bytes = PptxWriter::new().to_bytes(&sample_deck()).unwrap();
        let slide = read_entry(&bytes, "ppt/slides/slide2.xml");

        assert!(slide.contains(r#"<p:ph type="title"/>"#));
        assert!(slide.contains(r#"<p:ph idx="1"/>"#));
        assert!(slide.contains(r#"<a:rPr lang="en-US" sz="1800" dirty="0"/><a:t>Ownership</a:t>"#));
        // The blank middle bullet has no run
        assert!(slide.contains(r#"<a:p><a:endParaRPr lang="en-US" sz="1800"/></a:p>"#));

        let rels = read_entry(&bytes, "ppt/slides/_rels/slide2.xml.rels");
        assert!(rels.contains(r#"Target="../slideLayouts/slideLayout2.xml""#));
    }

    #[test]
    fn test_title_slide_xml_escapes_text() {
        let bytes = PptxWriter::new().to_bytes(&sample_deck()).unwrap();
        let slide = read_entry(&bytes, "ppt/slides/slide1.xml");

        assert!(slide.contains(r#"<p:ph type="ctrTitle"/>"#));
        assert!(slide.contains(r#"<p:ph type="subTitle" idx="1"/>"#));
        assert!(slide.contains("<a:t>Rust &amp; Friends</a:t>"));
        assert!(!slide.contains("sz="));

        let core = read_entry(&bytes, "docProps/core.xml");
        assert!(core.contains("<dc:title>Rust &amp; Friends</dc:title>"));
    }

    #[test]
    fn test_content_types_cover_slides() {
        let bytes = PptxWriter::new().to_bytes(&sample_deck()).unwrap();
        let types = read_entry(&bytes, "[Content_Types].xml");
        assert!(types.contains(r#"<Override PartName="/ppt/slides/slide3.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slide+xml"/>"#));
        assert!(types.contains(r#"PartName="/ppt/theme/theme1.xml""#));
    }

    #[test]
    fn test_control_characters_never_reach_parts() {
        let mut deck = Deck::new("Tab\u{B}le");
        deck.add_slide(Slide::content_slide(
            TextFrame::from_text("Escape\u{1B} codes"),
            TextFrame::from_text("Nul\u{0}byte\nBack\u{8}space"),
        ));
        let bytes = PptxWriter::new().to_bytes(&deck).unwrap();

        let slide = read_entry(&bytes, "ppt/slides/slide1.xml");
        assert!(slide.contains("<a:t>Escape codes</a:t>"));
        assert!(slide.contains("<a:t>Nulbyte</a:t>"));
        assert!(slide.contains("<a:t>Backspace</a:t>"));
        assert!(!slide.chars().any(|c| c < ' ' && c != '\n' && c != '\t' && c != '\r'));

        let core = read_entry(&bytes, "docProps/core.xml");
        assert!(core.contains("<dc:title>Table</dc:title>"));
    }
}
