//! Edge case tests: degenerate pages must not panic.

use pagelens::analyzer::AnalysisEngine;
use pagelens::fetch::FileSource;
use pagelens::{AnalysisRequest, AnalysisResult, DocumentUnavailable, TrackSelector};
use std::io::Write;
use tempfile::NamedTempFile;

fn analyze_bytes(bytes: &[u8]) -> Result<AnalysisResult, DocumentUnavailable> {
    let mut file = NamedTempFile::with_suffix(".html").unwrap();
    file.write_all(bytes).unwrap();
    file.flush().unwrap();
    let target = file.path().display().to_string();
    let request = AnalysisRequest::new(target, "", TrackSelector::All);
    AnalysisEngine::new().run(&request, &FileSource::new())
}

#[test]
fn empty_file_no_panic() {
    let result = analyze_bytes(b"").unwrap();
    assert_eq!(result.seo.score, 0);
    assert_eq!(result.eco.score, 100);
}

#[test]
fn plain_text_no_panic() {
    let result = analyze_bytes(b"hello world").unwrap();
    assert!(result.overall_score() <= 100);
}

#[test]
fn non_utf8_is_parse_failure() {
    let err = analyze_bytes(&[0x3c, 0x68, 0x31, 0x3e, 0xff, 0xfe, 0xfd]).unwrap_err();
    assert_eq!(err.kind(), "parse");
    assert!(err.to_string().starts_with("Failed to parse HTML:"));
}

#[test]
fn binary_with_invalid_utf8_is_parse_failure() {
    let err = analyze_bytes(b"\x89PNG\r\n\x1a\n\x00\x00\x80\xff").unwrap_err();
    assert!(matches!(err, DocumentUnavailable::ParseFailure { .. }));
}

#[test]
fn stray_nul_in_valid_page_still_scores() {
    let page = b"<!DOCTYPE html><html><head><title>A perfectly ordinary page title here ok</title></head>\
                 <body><h1>Hi</h1>\x00</body></html>";
    let result = analyze_bytes(page).unwrap();
    assert_eq!(result.compatibility.score, 85);
    match &result.seo.details {
        pagelens::TrackDetails::Seo(d) => assert!(d.has_h1),
        other => panic!("expected SEO details, got {:?}", other),
    }
}

#[test]
fn file_with_bom_parses() {
    let mut bytes = vec![0xEF, 0xBB, 0xBF];
    bytes.extend_from_slice(b"<!DOCTYPE html><html><head><title>BOM page</title></head></html>");
    let result = analyze_bytes(&bytes).unwrap();
    match &result.seo.details {
        pagelens::TrackDetails::Seo(d) => assert_eq!(d.title, "BOM page"),
        other => panic!("expected SEO details, got {:?}", other),
    }
}

#[test]
fn unclosed_tags_recovered() {
    let result = analyze_bytes(b"<html><body><h1>Unclosed<h2>Still going<div><img src=a.png").unwrap();
    match &result.ux.details {
        pagelens::TrackDetails::Ux(d) => {
            assert_eq!(d.headings.h1, 1);
            assert_eq!(d.headings.h2, 1);
        }
        other => panic!("expected UX details, got {:?}", other),
    }
}

#[test]
fn deeply_nested_markup_completes() {
    let depth = 2_000;
    let mut page = String::new();
    for _ in 0..depth {
        page.push_str("<div>");
    }
    page.push_str("<h1>deep</h1>");
    for _ in 0..depth {
        page.push_str("</div>");
    }
    let result = analyze_bytes(page.as_bytes()).unwrap();
    assert!(result.ux.is_populated());
}

#[test]
fn unicode_content_no_crash() {
    let page = "<html><head><title>Ünïcødé 页面 タイトル für alle Leser today</title></head>\
                <body><h1>héllo 🌍</h1><p>ñandú</p></body></html>";
    let result = analyze_bytes(page.as_bytes()).unwrap();
    assert_eq!(result.seo.score, 50);
}

#[test]
fn large_page_completes() {
    let mut page = String::from("<html><body>");
    for i in 0..5_000 {
        page.push_str(&format!("<p style=\"color:red\">Paragraph {} <img src=\"{}.png\"></p>", i, i));
    }
    page.push_str("</body></html>");
    let result = analyze_bytes(page.as_bytes()).unwrap();
    assert_eq!(result.eco.details.issues().len(), 1);
    assert!(result
        .compatibility
        .details
        .issues()
        .contains(&"High inline style usage (5000)".to_string()));
}
