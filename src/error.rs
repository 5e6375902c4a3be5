use thiserror::Error;

/// Why a page's markup could not be obtained or parsed.
///
/// This is the only error an analysis run reports; scoring itself never
/// fails once a document exists.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DocumentUnavailable {
    #[error("Failed to fetch website: {reason}")]
    FetchFailure { url: String, reason: String },

    #[error("Failed to parse HTML: {reason}")]
    ParseFailure { reason: String },
}

impl DocumentUnavailable {
    pub fn fetch(url: impl Into<String>, reason: impl Into<String>) -> Self {
        DocumentUnavailable::FetchFailure {
            url: url.into(),
            reason: reason.into(),
        }
    }

    pub fn parse(reason: impl Into<String>) -> Self {
        DocumentUnavailable::ParseFailure {
            reason: reason.into(),
        }
    }

    /// Short machine-readable kind ("fetch" or "parse")
    pub fn kind(&self) -> &'static str {
        match self {
            DocumentUnavailable::FetchFailure { .. } => "fetch",
            DocumentUnavailable::ParseFailure { .. } => "parse",
        }
    }
}
