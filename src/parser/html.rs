//! HTML parser using scraper (html5ever)

use super::DocumentModel;
use crate::DocumentUnavailable;
use scraper::Html;

/// Turns fetched markup into a [`DocumentModel`].
///
/// html5ever recovers from any malformed markup (stray NULs become U+FFFD),
/// so parse failures are limited to bytes that do not decode as UTF-8.
#[derive(Debug, Default, Clone, Copy)]
pub struct HtmlParser;

impl HtmlParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse markup already decoded to a string
    pub fn parse(&self, markup: &str) -> Result<DocumentModel, DocumentUnavailable> {
        let html = Html::parse_document(markup);
        tracing::debug!(
            bytes = markup.len(),
            parse_errors = html.errors.len(),
            "parsed document"
        );
        Ok(DocumentModel::from_html(markup.to_string(), &html))
    }

    /// Parse raw bytes, which must be UTF-8 (a leading BOM is skipped)
    pub fn parse_bytes(&self, bytes: &[u8]) -> Result<DocumentModel, DocumentUnavailable> {
        let markup = decode_markup(bytes)?;
        self.parse(&markup)
    }
}

/// Decode raw page bytes as UTF-8, skipping a leading BOM
pub fn decode_markup(bytes: &[u8]) -> Result<String, DocumentUnavailable> {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    std::str::from_utf8(bytes)
        .map(str::to_string)
        .map_err(|e| DocumentUnavailable::parse(format!("document is not valid UTF-8 ({})", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_malformed_markup() {
        let doc = HtmlParser::new()
            .parse("<html><body><h1>Unclosed <p>text<div></span>")
            .unwrap();
        assert_eq!(doc.heading_count(1), 1);
    }

    #[test]
    fn stray_nul_does_not_block_scoring() {
        let markup = "<html><head><title>Ordinary page</title></head>\
                      <body><h1>Hi</h1>\0</body></html>";
        let doc = HtmlParser::new().parse(markup).unwrap();
        assert_eq!(doc.title(), Some("Ordinary page"));
        assert_eq!(doc.heading_count(1), 1);
    }

    #[test]
    fn rejects_invalid_utf8() {
        let err = HtmlParser::new()
            .parse_bytes(&[0x3c, 0x68, 0xff, 0xfe])
            .unwrap_err();
        assert!(err.to_string().contains("not valid UTF-8"));
    }

    #[test]
    fn skips_bom() {
        let mut bytes = b"\xEF\xBB\xBF".to_vec();
        bytes.extend_from_slice(b"<title>Hi</title>");
        let doc = HtmlParser::new().parse_bytes(&bytes).unwrap();
        assert_eq!(doc.title(), Some("Hi"));
        assert!(!doc.raw().starts_with('\u{feff}'));
    }
}
