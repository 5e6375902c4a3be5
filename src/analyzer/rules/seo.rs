//! Search-engine optimization track.
//! Additive point model starting at 0: title, meta description, H1,
//! structured data and body length each contribute points.

use super::{RuleCheck, RuleOutcome, TrackScorer};
use crate::analyzer::scoring::{summarize, ScoreCalculator};
use crate::parser::DocumentModel;
use crate::{DetailsBase, SeoDetails, Track, TrackDetails, TrackScore};

const TITLE_POINTS: u32 = 20;
const TITLE_LENGTH_BONUS: u32 = 10;
const META_DESCRIPTION_POINTS: u32 = 20;
const H1_POINTS: u32 = 20;
const STRUCTURED_DATA_POINTS: u32 = 15;
const CONTENT_POINTS: u32 = 15;

/// Title lengths strictly inside this range earn the bonus
const TITLE_MIN_LEN: usize = 30;
const TITLE_MAX_LEN: usize = 60;
const META_DESCRIPTION_MIN_LEN: usize = 150;
const META_DESCRIPTION_MAX_LEN: usize = 160;
/// Body text must be longer than this to earn content points
const CONTENT_MIN_LEN: usize = 300;
const CONTENT_TARGET_LEN: usize = 600;

pub(crate) const JSON_LD_MARKER: &str = "application/ld+json";

const SUCCESS_SUMMARY: &str = "Strong SEO foundation with proper metadata and structure";

const CHECKS: &[RuleCheck] = &[
    RuleCheck {
        id: "title",
        eval: check_title,
    },
    RuleCheck {
        id: "meta-description",
        eval: check_meta_description,
    },
    RuleCheck {
        id: "h1",
        eval: check_h1,
    },
    RuleCheck {
        id: "structured-data",
        eval: check_structured_data,
    },
    RuleCheck {
        id: "content-length",
        eval: check_content_length,
    },
    RuleCheck {
        id: "image-alt",
        eval: check_image_alt,
    },
];

/// Scorer for the SEO track
pub struct SeoScorer;

impl SeoScorer {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SeoScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl TrackScorer for SeoScorer {
    fn track(&self) -> Track {
        Track::Seo
    }

    fn name(&self) -> &'static str {
        "seo"
    }

    fn score(&self, document: &DocumentModel) -> TrackScore {
        let tally = ScoreCalculator::fold(0, CHECKS.iter().map(|c| c.run(document)));

        let details = SeoDetails {
            base: DetailsBase {
                summary: summarize(&tally.issues, ", ", None, SUCCESS_SUMMARY),
                issues: tally.issues,
                suggestions: tally.suggestions,
            },
            title: document.title().unwrap_or("Not found").to_string(),
            has_meta_desc: document.has_meta_description_tag(),
            has_h1: document.heading_count(1) > 0,
        };

        TrackScore::new(tally.score, TrackDetails::Seo(details))
    }
}

fn check_title(document: &DocumentModel) -> RuleOutcome {
    let Some(title) = document.title() else {
        return RuleOutcome::miss()
            .with_issue("Missing title tag")
            .with_suggestion(
                "Add a descriptive title tag (30-60 characters) with primary keywords",
            );
    };

    let len = title.chars().count();
    if len > TITLE_MIN_LEN && len < TITLE_MAX_LEN {
        RuleOutcome::award(TITLE_POINTS + TITLE_LENGTH_BONUS)
    } else if len >= TITLE_MAX_LEN {
        RuleOutcome::award(TITLE_POINTS).with_suggestion(
            "Title tag is too long. Keep it under 60 characters for optimal display in search results.",
        )
    } else {
        RuleOutcome::award(TITLE_POINTS)
            .with_suggestion("Title tag is too short. Aim for 30-60 characters to provide context.")
    }
}

fn check_meta_description(document: &DocumentModel) -> RuleOutcome {
    match document.meta_description() {
        Some(content) => {
            let len = content.chars().count();
            let outcome = RuleOutcome::award(META_DESCRIPTION_POINTS);
            if !(META_DESCRIPTION_MIN_LEN..=META_DESCRIPTION_MAX_LEN).contains(&len) {
                outcome.with_suggestion(
                    "Meta description should be 150-160 characters for optimal display",
                )
            } else {
                outcome
            }
        }
        None => RuleOutcome::miss()
            .with_issue("Missing meta description")
            .with_suggestion("Add compelling meta description (150-160 characters) to improve CTR"),
    }
}

fn check_h1(document: &DocumentModel) -> RuleOutcome {
    match document.heading_count(1) {
        0 => RuleOutcome::miss()
            .with_issue("Missing H1 heading")
            .with_suggestion(
                "Add a single, descriptive H1 heading that includes your primary keyword",
            ),
        1 => RuleOutcome::award(H1_POINTS),
        n => RuleOutcome::award(H1_POINTS).with_issue(format!(
            "Multiple H1 tags found ({}). Use only one H1 per page",
            n
        )),
    }
}

fn check_structured_data(document: &DocumentModel) -> RuleOutcome {
    if document.raw().contains(JSON_LD_MARKER) {
        RuleOutcome::award(STRUCTURED_DATA_POINTS)
    } else {
        RuleOutcome::miss()
            .with_suggestion("Add structured data (JSON-LD) to enhance search result appearance")
    }
}

fn check_content_length(document: &DocumentModel) -> RuleOutcome {
    let len = document.body_text_len();
    if len > CONTENT_MIN_LEN {
        let outcome = RuleOutcome::award(CONTENT_POINTS);
        if len < CONTENT_TARGET_LEN {
            outcome.with_suggestion("Consider adding more content (600+ words) for better depth")
        } else {
            outcome
        }
    } else {
        RuleOutcome::miss()
            .with_issue(format!(
                "Insufficient text content ({} characters, more than {} needed)",
                len, CONTENT_MIN_LEN
            ))
            .with_suggestion("Add substantial text content (300+ words minimum, 600+ recommended)")
    }
}

fn check_image_alt(document: &DocumentModel) -> RuleOutcome {
    match document.images_without_alt_text() {
        0 => RuleOutcome::neutral(),
        n => RuleOutcome::neutral().with_suggestion(format!(
            "{} images are missing alt text for accessibility and SEO",
            n
        )),
    }
}
