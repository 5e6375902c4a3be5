use super::MarkupSource;
use crate::parser::decode_markup;
use crate::DocumentUnavailable;
use std::fs;

/// Reads markup from local HTML files
#[derive(Debug, Default, Clone, Copy)]
pub struct FileSource;

impl FileSource {
    pub fn new() -> Self {
        Self
    }
}

impl MarkupSource for FileSource {
    fn fetch(&self, target: &str) -> Result<String, DocumentUnavailable> {
        tracing::debug!(path = target, "reading page from disk");
        let bytes = fs::read(target).map_err(|e| {
            DocumentUnavailable::fetch(target, format!("Failed to read {}: {}", target, e))
        })?;
        decode_markup(&bytes)
    }
}
