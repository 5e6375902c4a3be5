//! AI discoverability (GEO) track.
//!
//! Starts from a base of 50 and adds points for structural signals that
//! generative answer engines are assumed to favour. Each signal is tied to
//! one named AI surface, which is then reported as "Likely Visible". This is
//! a structural heuristic only: no AI model is ever queried, and the details
//! carry a `visibilityBasis` marker saying so.

use super::seo::JSON_LD_MARKER;
use super::{RuleCheck, RuleOutcome, TrackScorer};
use crate::analyzer::scoring::ScoreCalculator;
use crate::parser::{contains_any, DocumentModel};
use crate::{
    AiSurface, AiVisibility, DetailsBase, GeoDetails, Track, TrackDetails, TrackScore,
    VisibilitySignal, VISIBILITY_BASIS,
};

const BASE_SCORE: u32 = 50;
const SECTIONING_POINTS: u32 = 15;
const LAYOUT_POINTS: u32 = 15;
const OPEN_GRAPH_POINTS: u32 = 10;
const STRUCTURED_DATA_POINTS: u32 = 10;

/// Scores at or above this get the positive summary
const GOOD_VISIBILITY_SCORE: u8 = 70;

/// Each check paired with the surface it marks visible
const CHECKS: &[(AiSurface, RuleCheck)] = &[
    (
        AiSurface::ChatGpt,
        RuleCheck {
            id: "semantic-sectioning",
            eval: check_sectioning,
        },
    ),
    (
        AiSurface::Gemini,
        RuleCheck {
            id: "semantic-layout",
            eval: check_layout,
        },
    ),
    (
        AiSurface::Copilot,
        RuleCheck {
            id: "open-graph",
            eval: check_open_graph,
        },
    ),
    (
        AiSurface::Perplexity,
        RuleCheck {
            id: "structured-data",
            eval: check_structured_data,
        },
    ),
];

/// Scorer for the GEO track
pub struct GeoScorer;

impl GeoScorer {
    pub fn new() -> Self {
        Self
    }
}

impl Default for GeoScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl TrackScorer for GeoScorer {
    fn track(&self) -> Track {
        Track::Geo
    }

    fn name(&self) -> &'static str {
        "geo"
    }

    fn score(&self, document: &DocumentModel) -> TrackScore {
        let outcomes: Vec<(AiSurface, RuleOutcome)> = CHECKS
            .iter()
            .map(|(surface, check)| (*surface, check.run(document)))
            .collect();

        let mut visibility = AiVisibility::default();
        for (surface, outcome) in &outcomes {
            if outcome.passed {
                visibility.set(*surface, VisibilitySignal::LikelyVisible);
            }
        }

        let tally = ScoreCalculator::fold(BASE_SCORE, outcomes.into_iter().map(|(_, o)| o));
        let summary = if tally.score >= GOOD_VISIBILITY_SCORE {
            "Good AI visibility signals detected"
        } else {
            "Limited AI optimization - improvements needed"
        };

        let details = GeoDetails {
            base: DetailsBase {
                summary: summary.to_string(),
                issues: tally.issues,
                suggestions: tally.suggestions,
            },
            visibility,
            visibility_basis: VISIBILITY_BASIS,
        };

        TrackScore::new(tally.score, TrackDetails::Geo(details))
    }
}

fn check_sectioning(document: &DocumentModel) -> RuleOutcome {
    if contains_any(document.raw(), &["<article", "<section"]) {
        RuleOutcome::award(SECTIONING_POINTS)
    } else {
        RuleOutcome::miss().with_suggestion(
            "Use semantic HTML5 elements (article, section, aside) for better AI understanding",
        )
    }
}

fn check_layout(document: &DocumentModel) -> RuleOutcome {
    let raw = document.raw();
    if raw.contains("<header") && raw.contains("<main") {
        RuleOutcome::award(LAYOUT_POINTS)
    } else {
        RuleOutcome::miss()
            .with_suggestion("Add semantic HTML structure with header, main, nav, footer elements")
    }
}

fn check_open_graph(document: &DocumentModel) -> RuleOutcome {
    if contains_any(document.raw(), &["og:title", "og:description"]) {
        RuleOutcome::award(OPEN_GRAPH_POINTS)
    } else {
        RuleOutcome::miss()
            .with_suggestion("Include Open Graph meta tags for better social and AI visibility")
    }
}

fn check_structured_data(document: &DocumentModel) -> RuleOutcome {
    if contains_any(document.raw(), &[JSON_LD_MARKER, "itemscope", "itemprop"]) {
        RuleOutcome::award(STRUCTURED_DATA_POINTS)
            .with_suggestion("Great! Structured data helps AI models understand your content")
    } else {
        RuleOutcome::miss().with_suggestion(
            "Add JSON-LD structured data (Schema.org) for enhanced AI discoverability",
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::rules::doc;

    fn geo(markup: &str) -> (u8, GeoDetails) {
        match GeoScorer::new().score(&doc(markup)) {
            TrackScore {
                score,
                details: TrackDetails::Geo(d),
            } => (score, d),
            other => panic!("expected GEO details, got {:?}", other),
        }
    }

    #[test]
    fn negative_bare_page_stays_at_base() {
        let (score, d) = geo("<html><body><div>plain</div></body></html>");
        assert_eq!(score, 50);
        assert_eq!(d.visibility, AiVisibility::default());
        assert_eq!(d.base.suggestions.len(), 4);
        assert_eq!(d.base.summary, "Limited AI optimization - improvements needed");
        assert!(d.base.issues.is_empty());
    }

    #[test]
    fn positive_all_signals() {
        let (score, d) = geo(
            r#"<html><head><meta property="og:title" content="x">
            <script type="application/ld+json">{}</script></head>
            <body><header></header><main><article>Text</article></main></body></html>"#,
        );
        assert_eq!(score, 100);
        assert_eq!(d.visibility.chatgpt, VisibilitySignal::LikelyVisible);
        assert_eq!(d.visibility.gemini, VisibilitySignal::LikelyVisible);
        assert_eq!(d.visibility.copilot, VisibilitySignal::LikelyVisible);
        assert_eq!(d.visibility.perplexity, VisibilitySignal::LikelyVisible);
        assert_eq!(
            d.base.suggestions,
            vec!["Great! Structured data helps AI models understand your content".to_string()]
        );
        assert_eq!(d.base.summary, "Good AI visibility signals detected");
    }

    #[test]
    fn layout_needs_both_header_and_main() {
        let only_header = check_layout(&doc("<body><header></header></body>"));
        assert!(!only_header.passed);
        let both = check_layout(&doc("<body><header></header><main></main></body>"));
        assert_eq!(both.points, 15);
    }

    #[test]
    fn microdata_counts_as_structured_data() {
        let outcome = check_structured_data(&doc(r#"<div itemscope itemtype="x"></div>"#));
        assert!(outcome.passed);
        assert_eq!(outcome.points, 10);
    }

    #[test]
    fn sectioning_marks_only_its_surface() {
        let (score, d) = geo("<body><section>One</section></body>");
        assert_eq!(score, 65);
        assert_eq!(d.visibility.chatgpt, VisibilitySignal::LikelyVisible);
        assert_eq!(d.visibility.gemini, VisibilitySignal::Unknown);
    }

    #[test]
    fn layout_and_sectioning_read_as_good() {
        let (score, d) = geo("<body><header></header><main><section></section></main></body>");
        assert_eq!(score, 80);
        assert_eq!(d.base.summary, "Good AI visibility signals detected");
    }

    #[test]
    fn summary_turns_good_at_exactly_70() {
        let (score, d) = geo(
            r#"<head><meta property="og:title" content="x">
            <script type="application/ld+json">{}</script></head><body></body>"#,
        );
        assert_eq!(score, 70);
        assert_eq!(d.base.summary, "Good AI visibility signals detected");
    }

    #[test]
    fn summary_stays_limited_just_below_70() {
        let (score, d) = geo("<body><article>One</article></body>");
        assert_eq!(score, 65);
        assert_eq!(d.base.summary, "Limited AI optimization - improvements needed");
    }

    #[test]
    fn serialized_visibility_basis() {
        let json = serde_json::to_value(GeoScorer::new().score(&doc(""))).unwrap();
        assert_eq!(json["details"]["visibilityBasis"], "structural-heuristic");
        assert_eq!(json["details"]["visibility"]["copilot"], "Unknown");
    }
}
