//! Eco efficiency track: page weight, asset counts and an estimated
//! per-view carbon footprint.

use super::{RuleCheck, RuleOutcome, TrackScorer};
use crate::analyzer::scoring::{ScoreCalculator, SuggestionPolicy};
use crate::parser::{count_occurrences, DocumentModel};
use crate::{DetailsBase, EcoDetails, Track, TrackDetails, TrackScore};

const BASE_SCORE: u32 = 50;

const SMALL_PAGE_KB: f64 = 500.0;
const MODERATE_PAGE_KB: f64 = 1000.0;
const FEW_IMAGES: usize = 10;
const MODERATE_IMAGES: usize = 20;
const FEW_SCRIPTS: usize = 5;
const MODERATE_SCRIPTS: usize = 10;

/// Grams of CO2 per KB transferred
pub const CO2_GRAMS_PER_KB: f64 = 0.0002;

const GOOD_ECO_SCORE: u8 = 70;

/// Infrastructure suggestions appended after detection-driven ones
pub const FIXED_SUGGESTIONS: [&str; 3] = [
    "Enable gzip/brotli compression on server",
    "Use a CDN to reduce transfer distance",
    "Implement efficient caching strategies",
];

const CHECKS: &[RuleCheck] = &[
    RuleCheck {
        id: "page-size",
        eval: check_page_size,
    },
    RuleCheck {
        id: "image-count",
        eval: check_image_count,
    },
    RuleCheck {
        id: "script-count",
        eval: check_script_count,
    },
    RuleCheck {
        id: "webp",
        eval: check_webp,
    },
];

/// Page weight in KB: UTF-8 byte length / 1024
pub fn page_size_kb(document: &DocumentModel) -> f64 {
    document.byte_len() as f64 / 1024.0
}

/// Estimated grams of CO2 per view, formatted to 4 decimal places
pub fn co2_estimate(page_size_kb: f64) -> String {
    format!("{:.4}", page_size_kb * CO2_GRAMS_PER_KB)
}

/// Scorer for the eco track
pub struct EcoScorer;

impl EcoScorer {
    pub fn new() -> Self {
        Self
    }
}

impl Default for EcoScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl TrackScorer for EcoScorer {
    fn track(&self) -> Track {
        Track::Eco
    }

    fn name(&self) -> &'static str {
        "eco"
    }

    fn score(&self, document: &DocumentModel) -> TrackScore {
        let tally = ScoreCalculator::fold(BASE_SCORE, CHECKS.iter().map(|c| c.run(document)));

        let kb = page_size_kb(document);
        let co2 = co2_estimate(kb);
        let verdict = if tally.score >= GOOD_ECO_SCORE {
            "Eco-friendly page"
        } else {
            "Page needs optimization"
        };

        let details = EcoDetails {
            base: DetailsBase {
                summary: format!("{}: {:.2} KB, {}g CO₂", verdict, kb, co2),
                issues: tally.issues,
                suggestions: SuggestionPolicy::default()
                    .apply(tally.suggestions, &FIXED_SUGGESTIONS),
            },
            page_size: kb,
            co2_estimate: co2,
        };

        TrackScore::new(tally.score, TrackDetails::Eco(details))
    }
}

fn check_page_size(document: &DocumentModel) -> RuleOutcome {
    let kb = page_size_kb(document);
    if kb < SMALL_PAGE_KB {
        RuleOutcome::award(30)
    } else if kb < MODERATE_PAGE_KB {
        RuleOutcome::award(15).with_suggestion(
            "Page size is moderate. Consider further optimization for better eco-friendliness",
        )
    } else {
        RuleOutcome::miss()
            .with_issue(format!("Large page size: {:.2} KB", kb))
            .with_suggestion("Reduce page size by optimizing assets and removing unnecessary code")
    }
}

fn check_image_count(document: &DocumentModel) -> RuleOutcome {
    let count = count_occurrences(document.raw(), "<img");
    if count < FEW_IMAGES {
        RuleOutcome::award(10)
    } else if count < MODERATE_IMAGES {
        RuleOutcome::award(5)
            .with_suggestion("Moderate image count. Implement lazy loading for better performance")
    } else {
        RuleOutcome::miss()
            .with_issue(format!("High image count: {}", count))
            .with_suggestion("Use lazy loading, WebP format, and consider image sprites")
    }
}

fn check_script_count(document: &DocumentModel) -> RuleOutcome {
    let count = count_occurrences(document.raw(), "<script");
    if count < FEW_SCRIPTS {
        RuleOutcome::award(10)
    } else if count < MODERATE_SCRIPTS {
        RuleOutcome::award(5)
    } else {
        RuleOutcome::miss()
            .with_issue(format!("High script count: {}", count))
            .with_suggestion("Bundle and minify JavaScript, defer non-critical scripts")
    }
}

fn check_webp(document: &DocumentModel) -> RuleOutcome {
    if document.raw().contains(".webp") {
        RuleOutcome::award(5)
    } else {
        RuleOutcome::miss()
            .with_suggestion("Use WebP format for images to reduce file size by 25-35%")
    }
}
