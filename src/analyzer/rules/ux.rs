//! UX structure track: heading hierarchy, image alt attributes, form labels
//! and ARIA usage.

use super::{RuleCheck, RuleOutcome, TrackScorer};
use crate::analyzer::scoring::{summarize, ScoreCalculator, SuggestionPolicy};
use crate::parser::{contains_any, DocumentModel};
use crate::{DetailsBase, Track, TrackDetails, TrackScore, UxDetails};

const BASE_SCORE: u32 = 50;
const SINGLE_H1_POINTS: u32 = 15;
const H2_POINTS: u32 = 10;
const H3_POINTS: u32 = 5;
const IMAGE_ALT_POINTS: u32 = 15;
const FORM_LABEL_POINTS: u32 = 10;
const ARIA_POINTS: u32 = 5;

/// Only this many issues make it into the summary
const SUMMARY_ISSUES: usize = 2;

/// Accessibility suggestions appended after detection-driven ones
pub const FIXED_SUGGESTIONS: [&str; 3] = [
    "Ensure sufficient color contrast (WCAG AA standard)",
    "Make interactive elements easily tappable (min 44×44px)",
    "Use consistent navigation across pages",
];

const CHECKS: &[RuleCheck] = &[
    RuleCheck {
        id: "single-h1",
        eval: check_single_h1,
    },
    RuleCheck {
        id: "heading-hierarchy",
        eval: check_hierarchy,
    },
    RuleCheck {
        id: "image-alt",
        eval: check_image_alt,
    },
    RuleCheck {
        id: "form-labels",
        eval: check_form_labels,
    },
    RuleCheck {
        id: "aria",
        eval: check_aria,
    },
];

/// Scorer for the UX track
pub struct UxScorer;

impl UxScorer {
    pub fn new() -> Self {
        Self
    }
}

impl Default for UxScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl TrackScorer for UxScorer {
    fn track(&self) -> Track {
        Track::Ux
    }

    fn name(&self) -> &'static str {
        "ux"
    }

    fn score(&self, document: &DocumentModel) -> TrackScore {
        let tally = ScoreCalculator::fold(BASE_SCORE, CHECKS.iter().map(|c| c.run(document)));

        let details = UxDetails {
            base: DetailsBase {
                summary: summarize(
                    &tally.issues,
                    "; ",
                    Some(SUMMARY_ISSUES),
                    "Good UX structure with proper hierarchy and accessibility",
                ),
                issues: tally.issues,
                suggestions: SuggestionPolicy::default()
                    .apply(tally.suggestions, &FIXED_SUGGESTIONS),
            },
            headings: document.heading_counts(),
        };

        TrackScore::new(tally.score, TrackDetails::Ux(details))
    }
}

fn check_single_h1(document: &DocumentModel) -> RuleOutcome {
    match document.heading_count(1) {
        1 => RuleOutcome::award(SINGLE_H1_POINTS),
        0 => RuleOutcome::miss()
            .with_issue("Missing H1 heading")
            .with_suggestion("Add exactly one H1 heading per page for proper hierarchy"),
        n => RuleOutcome::miss()
            .with_issue(format!("Multiple H1 headings found: {} (should be 1)", n))
            .with_suggestion("Use only one H1 per page, use H2-H6 for subsections"),
    }
}

fn check_hierarchy(document: &DocumentModel) -> RuleOutcome {
    if document.heading_count(2) == 0 {
        return RuleOutcome::miss()
            .with_suggestion("Add H2 and H3 headings to create proper content hierarchy");
    }
    if document.heading_count(3) > 0 {
        RuleOutcome::award(H2_POINTS + H3_POINTS)
    } else {
        RuleOutcome::award(H2_POINTS)
    }
}

fn check_image_alt(document: &DocumentModel) -> RuleOutcome {
    if document.images().is_empty() {
        return RuleOutcome::neutral();
    }
    match document.images_without_alt() {
        0 => RuleOutcome::award(IMAGE_ALT_POINTS),
        n => RuleOutcome::miss()
            .with_issue(format!("{} images missing alt text", n))
            .with_suggestion("Add descriptive alt text to all images for accessibility and SEO"),
    }
}

// Counts are document-wide, not per form
fn check_form_labels(document: &DocumentModel) -> RuleOutcome {
    if document.forms().is_empty() {
        return RuleOutcome::neutral();
    }
    if document.label_count() >= document.input_count() {
        RuleOutcome::award(FORM_LABEL_POINTS)
    } else {
        RuleOutcome::miss()
            .with_issue("Some form inputs are missing labels")
            .with_suggestion("Associate every input with a label for better accessibility")
    }
}

fn check_aria(document: &DocumentModel) -> RuleOutcome {
    if contains_any(document.raw(), &["aria-label", "aria-labelledby"]) {
        RuleOutcome::award(ARIA_POINTS)
    } else {
        RuleOutcome::miss()
            .with_suggestion("Consider adding ARIA attributes for improved accessibility")
    }
}
