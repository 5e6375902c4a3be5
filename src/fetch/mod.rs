//! Markup sources: where a page's HTML comes from
//!
//! The engine never fetches anything itself. It asks a [`MarkupSource`] for
//! the markup behind a target string, so the CLI, the tool server and tests
//! can plug in HTTP, local files or in-memory markup.

pub mod file;
pub mod http;

pub use file::FileSource;
pub use http::{is_binary_content_type, HttpFetcher};

use crate::config::Config;
use crate::DocumentUnavailable;
use anyhow::Result;
use std::path::PathBuf;

/// Default User-Agent sent with page requests
pub const DEFAULT_USER_AGENT: &str = "ReimagineWeb-Bot/1.0";

/// Something that can produce markup for a target.
///
/// Sources are shared across threads during batch analysis.
pub trait MarkupSource: Send + Sync {
    fn fetch(&self, target: &str) -> Result<String, DocumentUnavailable>;
}

/// What a target string refers to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Url(String),
    File(PathBuf),
}

impl Target {
    /// `http://` and `https://` targets are URLs, anything else is a path
    pub fn parse(target: &str) -> Self {
        if is_url(target) {
            Target::Url(target.to_string())
        } else {
            Target::File(PathBuf::from(target))
        }
    }
}

pub fn is_url(target: &str) -> bool {
    let lower = target.trim_start().to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Dispatches URLs to HTTP and everything else to the filesystem
pub struct TargetSource {
    http: HttpFetcher,
    files: FileSource,
}

impl TargetSource {
    pub fn new(http: HttpFetcher) -> Self {
        Self {
            http,
            files: FileSource::new(),
        }
    }

    /// Build from config (user agent, timeout)
    pub fn from_config(config: &Config) -> Result<Self> {
        let http = HttpFetcher::new(config.user_agent(), config.timeout())?;
        Ok(Self::new(http))
    }
}

impl MarkupSource for TargetSource {
    fn fetch(&self, target: &str) -> Result<String, DocumentUnavailable> {
        match Target::parse(target) {
            Target::Url(url) => self.http.fetch(&url),
            Target::File(_) => self.files.fetch(target),
        }
    }
}

/// Fixed in-memory markup, returned for any target
#[derive(Debug, Clone)]
pub struct StaticSource {
    markup: String,
}

impl StaticSource {
    pub fn new(markup: impl Into<String>) -> Self {
        Self {
            markup: markup.into(),
        }
    }
}

impl MarkupSource for StaticSource {
    fn fetch(&self, _target: &str) -> Result<String, DocumentUnavailable> {
        Ok(self.markup.clone())
    }
}
