//! Browser compatibility track

use super::{RuleCheck, RuleOutcome, TrackScorer};
use crate::analyzer::scoring::{summarize, ScoreCalculator};
use crate::parser::{contains_ignore_ascii_case, count_occurrences, DocumentModel};
use crate::{CompatibilityDetails, DetailsBase, Track, TrackDetails, TrackScore};

const BASE_SCORE: u32 = 60;
const VIEWPORT_POINTS: u32 = 15;
const DOCTYPE_POINTS: u32 = 15;
const INLINE_STYLE_POINTS: u32 = 10;

/// Inline style attributes below this count earn points
const INLINE_STYLE_LIMIT: usize = 10;

/// Suggestions reported regardless of findings
pub const FIXED_SUGGESTIONS: [&str; 3] = [
    "Test across multiple browsers",
    "Use progressive enhancement",
    "Minimize inline styles",
];

const CHECKS: &[RuleCheck] = &[
    RuleCheck {
        id: "viewport",
        eval: check_viewport,
    },
    RuleCheck {
        id: "doctype",
        eval: check_doctype,
    },
    RuleCheck {
        id: "inline-styles",
        eval: check_inline_styles,
    },
];

/// Scorer for the compatibility track
pub struct CompatibilityScorer;

impl CompatibilityScorer {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CompatibilityScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl TrackScorer for CompatibilityScorer {
    fn track(&self) -> Track {
        Track::Compatibility
    }

    fn name(&self) -> &'static str {
        "compatibility"
    }

    fn score(&self, document: &DocumentModel) -> TrackScore {
        let tally = ScoreCalculator::fold(BASE_SCORE, CHECKS.iter().map(|c| c.run(document)));

        let details = CompatibilityDetails {
            base: DetailsBase {
                summary: summarize(&tally.issues, ", ", None, "Good browser compatibility"),
                issues: tally.issues,
                suggestions: FIXED_SUGGESTIONS.iter().map(|s| s.to_string()).collect(),
            },
        };

        TrackScore::new(tally.score, TrackDetails::Compatibility(details))
    }
}

fn check_viewport(document: &DocumentModel) -> RuleOutcome {
    if document.raw().contains("viewport") {
        RuleOutcome::award(VIEWPORT_POINTS)
    } else {
        RuleOutcome::miss().with_issue("Missing viewport meta tag")
    }
}

// Silent when absent: no issue, just no points
fn check_doctype(document: &DocumentModel) -> RuleOutcome {
    if contains_ignore_ascii_case(document.raw(), "<!doctype html>") {
        RuleOutcome::award(DOCTYPE_POINTS)
    } else {
        RuleOutcome::miss()
    }
}

fn check_inline_styles(document: &DocumentModel) -> RuleOutcome {
    let count = count_occurrences(document.raw(), "style=\"");
    if count < INLINE_STYLE_LIMIT {
        RuleOutcome::award(INLINE_STYLE_POINTS)
    } else {
        RuleOutcome::miss().with_issue(format!("High inline style usage ({})", count))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::rules::doc;

    fn compat(markup: &str) -> TrackScore {
        CompatibilityScorer::new().score(&doc(markup))
    }

    #[test]
    fn positive_modern_page() {
        let result = compat(
            r#"<!DOCTYPE html><html><head><meta name="viewport" content="width=device-width"></head></html>"#,
        );
        assert_eq!(result.score, 100);
        assert!(result.details.issues().is_empty());
        assert_eq!(result.details.summary(), "Good browser compatibility");
    }

    #[test]
    fn negative_bare_markup() {
        let result = compat("<p>hi</p>");
        // base 60 + inline style bonus only
        assert_eq!(result.score, 70);
        assert_eq!(result.details.issues(), &["Missing viewport meta tag".to_string()]);
        assert_eq!(result.details.summary(), "Missing viewport meta tag");
    }

    #[test]
    fn doctype_is_case_insensitive() {
        assert_eq!(check_doctype(&doc("<!doctype html><p>")).points, 15);
        assert_eq!(check_doctype(&doc("<!DocType HTML><p>")).points, 15);
        let missing = check_doctype(&doc("<html></html>"));
        assert_eq!(missing.points, 0);
        assert!(missing.issues.is_empty());
    }

    #[test]
    fn inline_style_threshold() {
        let nine = r#"<p style="a">"#.repeat(9);
        assert_eq!(check_inline_styles(&doc(&nine)).points, 10);

        let ten = r#"<p style="a">"#.repeat(10);
        let outcome = check_inline_styles(&doc(&ten));
        assert_eq!(outcome.points, 0);
        assert_eq!(outcome.issues, vec!["High inline style usage (10)".to_string()]);
    }

    #[test]
    fn suggestions_are_fixed() {
        let clean = compat(r#"<!doctype html><meta name="viewport">"#);
        let messy = compat(&r#"<p style="x">"#.repeat(12));
        assert_eq!(clean.details.suggestions(), messy.details.suggestions());
        assert_eq!(clean.details.suggestions().len(), 3);
    }

    #[test]
    fn summary_joins_issues() {
        let messy = compat(&r#"<p style="x">"#.repeat(12));
        assert_eq!(messy.score, 60);
        assert_eq!(
            messy.details.summary(),
            "Missing viewport meta tag, High inline style usage (12)"
        );
    }
}
