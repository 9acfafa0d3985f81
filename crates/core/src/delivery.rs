//! Packaging a generated file for download.

use crate::error::{Error, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// MIME type of `.pptx` documents.
pub const PPTX_MIME_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.presentation";

/// Label of the rendered download link.
const LINK_LABEL: &str = "Download your presentation";

/// A file embedded as a base64 data URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadLink {
    /// File name offered to the browser.
    pub filename: String,

    /// MIME type of the payload.
    pub mime_type: String,

    /// Base64-encoded file content.
    pub payload: String,
}

impl DownloadLink {
    /// Read a presentation file and encode it.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;
        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| {
                Error::IoError(std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    format!("not a file path: {}", path.display()),
                ))
            })?;

        Ok(Self::from_bytes(filename, &bytes))
    }

    /// Encode in-memory bytes as a presentation download.
    pub fn from_bytes(filename: impl Into<String>, bytes: &[u8]) -> Self {
        Self {
            filename: filename.into(),
            mime_type: PPTX_MIME_TYPE.to_string(),
            payload: STANDARD.encode(bytes),
        }
    }

    /// The `data:` URL carrying the payload.
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.payload)
    }

    /// Decode the payload back to the original bytes.
    pub fn decode(&self) -> Result<Vec<u8>> {
        STANDARD
            .decode(&self.payload)
            .map_err(|e| Error::PayloadError(e.to_string()))
    }

    /// Render the link as an HTML anchor.
    pub fn to_html(&self) -> String {
        format!(
            r#"<a href="{}" download="{}">{}</a>"#,
            self.data_url(),
            escape_html(&self.filename),
            LINK_LABEL
        )
    }

    /// Render a standalone page with a heading and the link.
    pub fn render_page(&self, topic: &str) -> String {
        format!(
            "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n\
             <title>Text to PowerPoint Generator</title>\n</head>\n<body>\n\
             <h1>Text to PowerPoint Generator</h1>\n\
             <p>Presentation for <strong>{}</strong> generated successfully!</p>\n\
             <p>{}</p>\n</body>\n</html>\n",
            escape_html(topic),
            self.to_html()
        )
    }
}

/// Escape text for use in HTML content and attribute values.
fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Rust_presentation.pptx");
        let bytes: Vec<u8> = (0..=255u8).cycle().take(1000).collect();
        std::fs::write(&path, &bytes).unwrap();

        let link = DownloadLink::from_path(&path).unwrap();
        assert_eq!(link.filename, "Rust_presentation.pptx");
        assert_eq!(link.mime_type, PPTX_MIME_TYPE);
        assert_eq!(link.decode().unwrap(), bytes);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = DownloadLink::from_path(dir.path().join("absent.pptx")).unwrap_err();
        assert!(matches!(err, Error::IoError(_)));
    }

    #[test]
    fn test_to_html() {
        let link = DownloadLink::from_bytes("deck.pptx", b"abc");
        assert_eq!(
            link.to_html(),
            "<a href=\"data:application/vnd.openxmlformats-officedocument.presentationml.presentation;base64,YWJj\" download=\"deck.pptx\">Download your presentation</a>"
        );
    }

    #[test]
    fn test_download_attribute_is_escaped() {
        let link = DownloadLink::from_bytes("say \"hi\" & <go>.pptx", b"");
        assert!(link
            .to_html()
            .contains("download=\"say &quot;hi&quot; &amp; &lt;go&gt;.pptx\""));
    }

    #[test]
    fn test_render_page_contains_link() {
        let link = DownloadLink::from_bytes("deck.pptx", b"abc");
        let page = link.render_page("Rust & C");
        assert!(page.starts_with("<!DOCTYPE html>"));
        assert!(page.contains("<strong>Rust &amp; C</strong>"));
        assert!(page.contains(&link.to_html()));
    }
}
