//! HTTP page fetching (single attempt, no retry)

use super::MarkupSource;
use crate::DocumentUnavailable;
use std::time::Duration;

/// Fetches pages over HTTP(S) with a blocking client.
///
/// One client is shared by every request this fetcher serves.
pub struct HttpFetcher {
    #[cfg(feature = "http")]
    client: reqwest::blocking::Client,
    user_agent: String,
}

impl HttpFetcher {
    /// Build a fetcher. `timeout: None` means no deadline.
    #[cfg(feature = "http")]
    pub fn new(user_agent: &str, timeout: Option<Duration>) -> anyhow::Result<Self> {
        use anyhow::Context;

        let client = reqwest::blocking::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            client,
            user_agent: user_agent.to_string(),
        })
    }

    /// Stub when the http feature is disabled
    #[cfg(not(feature = "http"))]
    pub fn new(user_agent: &str, _timeout: Option<Duration>) -> anyhow::Result<Self> {
        Ok(Self {
            user_agent: user_agent.to_string(),
        })
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }
}

impl MarkupSource for HttpFetcher {
    #[cfg(feature = "http")]
    fn fetch(&self, url: &str) -> Result<String, DocumentUnavailable> {
        tracing::debug!(url, user_agent = %self.user_agent, "fetching page");

        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| DocumentUnavailable::fetch(url, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let reason = status
                .canonical_reason()
                .map(str::to_string)
                .unwrap_or_else(|| status.as_str().to_string());
            return Err(DocumentUnavailable::fetch(url, reason));
        }

        if let Some(content_type) = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
        {
            if is_binary_content_type(content_type) {
                return Err(DocumentUnavailable::parse(format!(
                    "unsupported content type '{}'",
                    content_type
                )));
            }
        }

        let body = response
            .text()
            .map_err(|e| DocumentUnavailable::fetch(url, e.to_string()))?;
        tracing::debug!(url, bytes = body.len(), "fetched page");
        Ok(body)
    }

    #[cfg(not(feature = "http"))]
    fn fetch(&self, url: &str) -> Result<String, DocumentUnavailable> {
        Err(DocumentUnavailable::fetch(
            url,
            "HTTP support not enabled. Rebuild with: cargo build --features http",
        ))
    }
}

/// Media types that can never hold a page, however lenient the parser is
const BINARY_MIME_PREFIXES: &[&str] = &["image/", "audio/", "video/", "font/"];
const BINARY_MIME_TYPES: &[&str] = &[
    "application/octet-stream",
    "application/pdf",
    "application/zip",
    "application/gzip",
    "application/wasm",
];

/// Whether a Content-Type header names clearly binary content.
///
/// Anything else (including JSON or a missing subtype) goes to the parser.
pub fn is_binary_content_type(content_type: &str) -> bool {
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase();
    BINARY_MIME_PREFIXES.iter().any(|p| mime.starts_with(p))
        || BINARY_MIME_TYPES.contains(&mime.as_str())
}
