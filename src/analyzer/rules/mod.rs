//! Track scorers and their rule checks

pub mod compatibility;
pub mod eco;
pub mod geo;
pub mod seo;
pub mod ux;

pub use compatibility::CompatibilityScorer;
pub use eco::EcoScorer;
pub use geo::GeoScorer;
pub use seo::SeoScorer;
pub use ux::UxScorer;

use crate::parser::DocumentModel;
use crate::{Track, TrackScore};

/// A scorer for one track.
///
/// Implementations are pure functions of the document: same input, same
/// output, no shared state. That is what lets the engine run them in
/// parallel.
pub trait TrackScorer: Send + Sync {
    /// Track this scorer populates
    fn track(&self) -> Track;

    /// Name of the scorer
    fn name(&self) -> &'static str;

    /// Score the document
    fn score(&self, document: &DocumentModel) -> TrackScore;
}

/// What one rule check contributes to its track
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleOutcome {
    pub points: u32,
    /// The check's signal was found (used for GEO visibility flags)
    pub passed: bool,
    pub issues: Vec<String>,
    pub suggestions: Vec<String>,
}

impl RuleOutcome {
    /// Signal found, award points
    pub fn award(points: u32) -> Self {
        Self {
            points,
            passed: true,
            ..Self::default()
        }
    }

    /// Signal missing, no points
    pub fn miss() -> Self {
        Self::default()
    }

    /// Check that neither rewards nor penalizes
    pub fn neutral() -> Self {
        Self::default()
    }

    pub fn with_issue(mut self, issue: impl Into<String>) -> Self {
        self.issues.push(issue.into());
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }
}

/// A named, independently testable rule check
#[derive(Clone, Copy)]
pub struct RuleCheck {
    pub id: &'static str,
    pub eval: fn(&DocumentModel) -> RuleOutcome,
}

impl RuleCheck {
    pub fn run(&self, document: &DocumentModel) -> RuleOutcome {
        (self.eval)(document)
    }
}

impl std::fmt::Debug for RuleCheck {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleCheck").field("id", &self.id).finish()
    }
}

/// Scorer instance for a track
pub fn scorer_for(track: Track) -> &'static dyn TrackScorer {
    match track {
        Track::Seo => &SeoScorer,
        Track::Geo => &GeoScorer,
        Track::Compatibility => &CompatibilityScorer,
        Track::Eco => &EcoScorer,
        Track::Ux => &UxScorer,
    }
}

#[cfg(test)]
pub(crate) fn doc(markup: &str) -> DocumentModel {
    crate::parser::HtmlParser::new()
        .parse(markup)
        .expect("test markup parses")
}
