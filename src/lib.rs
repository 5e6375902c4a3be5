//! Pagelens: multi-track web page quality analyzer
//!
//! This library scores a fetched page's markup across five independent
//! tracks (search-engine optimization, AI discoverability, browser
//! compatibility, eco efficiency and UX structure) and reports issues and
//! actionable suggestions for each.

pub mod analyzer;
pub mod config;
pub mod error;
pub mod fetch;
pub mod mcp;
pub mod parser;
pub mod reporter;

pub use error::DocumentUnavailable;

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// One of the five scoring tracks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Track {
    Seo,
    Geo,
    Compatibility,
    Eco,
    Ux,
}

impl Track {
    /// Every track, in report order
    pub const ALL: [Track; 5] = [
        Track::Seo,
        Track::Geo,
        Track::Compatibility,
        Track::Eco,
        Track::Ux,
    ];

    /// Wire identifier (matches the request selector)
    pub fn id(&self) -> &'static str {
        match self {
            Track::Seo => "seo",
            Track::Geo => "geo",
            Track::Compatibility => "compatibility",
            Track::Eco => "eco",
            Track::Ux => "ux",
        }
    }

    /// Human-readable label for reports
    pub fn label(&self) -> &'static str {
        match self {
            Track::Seo => "SEO",
            Track::Geo => "GEO (AI Discoverability)",
            Track::Compatibility => "Browser Compatibility",
            Track::Eco => "Eco Efficiency",
            Track::Ux => "UX Structure",
        }
    }
}

impl std::fmt::Display for Track {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id())
    }
}

/// Which tracks a request asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackSelector {
    #[default]
    All,
    Seo,
    Geo,
    Compatibility,
    Eco,
    Ux,
}

impl TrackSelector {
    /// Whether the given track should be scored under this selector
    pub fn includes(self, track: Track) -> bool {
        match self {
            TrackSelector::All => true,
            TrackSelector::Seo => track == Track::Seo,
            TrackSelector::Geo => track == Track::Geo,
            TrackSelector::Compatibility => track == Track::Compatibility,
            TrackSelector::Eco => track == Track::Eco,
            TrackSelector::Ux => track == Track::Ux,
        }
    }

    /// Tracks selected, in report order
    pub fn tracks(self) -> Vec<Track> {
        Track::ALL
            .into_iter()
            .filter(|t| self.includes(*t))
            .collect()
    }
}

impl FromStr for TrackSelector {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(TrackSelector::All),
            "seo" => Ok(TrackSelector::Seo),
            "geo" => Ok(TrackSelector::Geo),
            "compatibility" => Ok(TrackSelector::Compatibility),
            "eco" => Ok(TrackSelector::Eco),
            "ux" => Ok(TrackSelector::Ux),
            other => Err(format!(
                "unknown track '{}' (expected all, seo, geo, compatibility, eco, ux)",
                other
            )),
        }
    }
}

impl std::fmt::Display for TrackSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            TrackSelector::All => "all",
            TrackSelector::Seo => "seo",
            TrackSelector::Geo => "geo",
            TrackSelector::Compatibility => "compatibility",
            TrackSelector::Eco => "eco",
            TrackSelector::Ux => "ux",
        };
        write!(f, "{}", s)
    }
}

/// A single analysis request (the JSON body callers send)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    /// Page to analyze: an http(s) URL or a local HTML file
    pub url: String,
    /// Display name for the page (defaults to the url when empty)
    #[serde(default)]
    pub name: String,
    /// Tracks to score
    #[serde(default)]
    pub track: TrackSelector,
}

impl AnalysisRequest {
    pub fn new(url: impl Into<String>, name: impl Into<String>, track: TrackSelector) -> Self {
        Self {
            url: url.into(),
            name: name.into(),
            track,
        }
    }

    /// Name shown in results: the given name, or the url when none was set
    pub fn display_name(&self) -> &str {
        if self.name.trim().is_empty() {
            &self.url
        } else {
            &self.name
        }
    }
}

/// Letter grade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Grade {
    A,
    B,
    C,
    D,
    F,
}

impl Grade {
    pub fn from_score(score: u8) -> Self {
        match score {
            90..=100 => Grade::A,
            80..=89 => Grade::B,
            70..=79 => Grade::C,
            60..=69 => Grade::D,
            _ => Grade::F,
        }
    }
}

impl std::fmt::Display for Grade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Grade::A => write!(f, "A"),
            Grade::B => write!(f, "B"),
            Grade::C => write!(f, "C"),
            Grade::D => write!(f, "D"),
            Grade::F => write!(f, "F"),
        }
    }
}

/// Diagnostics shared by every populated track
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DetailsBase {
    /// One-line verdict for the track
    pub summary: String,
    /// Problems found, in detection order
    pub issues: Vec<String>,
    /// Improvement suggestions, in detection order
    pub suggestions: Vec<String>,
}

/// SEO track details
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeoDetails {
    #[serde(flatten)]
    pub base: DetailsBase,
    /// Title text, or "Not found"
    pub title: String,
    /// Whether a `<meta name="description">` tag exists (even if empty)
    pub has_meta_desc: bool,
    pub has_h1: bool,
}

/// Named AI answer surfaces reported by the GEO track
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AiSurface {
    ChatGpt,
    Gemini,
    Copilot,
    Perplexity,
}

/// Heuristic visibility verdict for one AI surface.
///
/// No model is ever queried: `LikelyVisible` only means the page carries the
/// structural signals that surface is assumed to favour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum VisibilitySignal {
    #[serde(rename = "Likely Visible")]
    LikelyVisible,
    #[default]
    Unknown,
}

/// Fixed-shape map of AI surfaces to visibility verdicts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct AiVisibility {
    pub chatgpt: VisibilitySignal,
    pub gemini: VisibilitySignal,
    pub copilot: VisibilitySignal,
    pub perplexity: VisibilitySignal,
}

impl AiVisibility {
    pub fn set(&mut self, surface: AiSurface, signal: VisibilitySignal) {
        match surface {
            AiSurface::ChatGpt => self.chatgpt = signal,
            AiSurface::Gemini => self.gemini = signal,
            AiSurface::Copilot => self.copilot = signal,
            AiSurface::Perplexity => self.perplexity = signal,
        }
    }

    pub fn get(&self, surface: AiSurface) -> VisibilitySignal {
        match surface {
            AiSurface::ChatGpt => self.chatgpt,
            AiSurface::Gemini => self.gemini,
            AiSurface::Copilot => self.copilot,
            AiSurface::Perplexity => self.perplexity,
        }
    }
}

/// Marker reported alongside GEO visibility so consumers know it is inferred
pub const VISIBILITY_BASIS: &str = "structural-heuristic";

/// GEO (AI discoverability) track details
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeoDetails {
    #[serde(flatten)]
    pub base: DetailsBase,
    pub visibility: AiVisibility,
    pub visibility_basis: &'static str,
}

/// Browser compatibility track details
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompatibilityDetails {
    #[serde(flatten)]
    pub base: DetailsBase,
}

/// Eco efficiency track details
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EcoDetails {
    #[serde(flatten)]
    pub base: DetailsBase,
    /// Page weight in KB (UTF-8 bytes / 1024)
    pub page_size: f64,
    /// Estimated grams of CO2 per view, 4 decimal places
    pub co2_estimate: String,
}

/// Heading counts by level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct HeadingCounts {
    pub h1: usize,
    pub h2: usize,
    pub h3: usize,
}

/// UX structure track details
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UxDetails {
    #[serde(flatten)]
    pub base: DetailsBase,
    pub headings: HeadingCounts,
}

/// Placeholder details for a track that was not requested; serializes as `{}`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct EmptyDetails {}

/// Per-track details payload
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TrackDetails {
    Seo(SeoDetails),
    Geo(GeoDetails),
    Compatibility(CompatibilityDetails),
    Eco(EcoDetails),
    Ux(UxDetails),
    Empty(EmptyDetails),
}

impl TrackDetails {
    /// Shared diagnostics, or None for the placeholder
    pub fn base(&self) -> Option<&DetailsBase> {
        match self {
            TrackDetails::Seo(d) => Some(&d.base),
            TrackDetails::Geo(d) => Some(&d.base),
            TrackDetails::Compatibility(d) => Some(&d.base),
            TrackDetails::Eco(d) => Some(&d.base),
            TrackDetails::Ux(d) => Some(&d.base),
            TrackDetails::Empty(_) => None,
        }
    }

    pub fn summary(&self) -> &str {
        self.base().map(|b| b.summary.as_str()).unwrap_or("")
    }

    pub fn issues(&self) -> &[String] {
        self.base().map(|b| b.issues.as_slice()).unwrap_or(&[])
    }

    pub fn suggestions(&self) -> &[String] {
        self.base().map(|b| b.suggestions.as_slice()).unwrap_or(&[])
    }
}

/// Score and diagnostics for one track
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackScore {
    /// Normalized score (0-100)
    pub score: u8,
    pub details: TrackDetails,
}

impl TrackScore {
    pub fn new(score: u8, details: TrackDetails) -> Self {
        Self {
            score: score.min(100),
            details,
        }
    }

    /// Zero-value placeholder for a track that was not requested
    pub fn zero() -> Self {
        Self {
            score: 0,
            details: TrackDetails::Empty(EmptyDetails {}),
        }
    }

    /// True when a scorer produced this value (not the placeholder)
    pub fn is_populated(&self) -> bool {
        !matches!(self.details, TrackDetails::Empty(_))
    }

    pub fn grade(&self) -> Grade {
        Grade::from_score(self.score)
    }
}

impl Default for TrackScore {
    fn default() -> Self {
        Self::zero()
    }
}

/// The result of analyzing one page
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisResult {
    pub name: String,
    pub url: String,
    pub seo: TrackScore,
    pub geo: TrackScore,
    pub compatibility: TrackScore,
    pub eco: TrackScore,
    pub ux: TrackScore,
    /// Selector the result was produced under (not part of the wire shape)
    #[serde(skip)]
    pub track: TrackSelector,
}

impl AnalysisResult {
    /// A result with every track set to the zero-value placeholder
    pub fn empty(name: impl Into<String>, url: impl Into<String>, track: TrackSelector) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            seo: TrackScore::zero(),
            geo: TrackScore::zero(),
            compatibility: TrackScore::zero(),
            eco: TrackScore::zero(),
            ux: TrackScore::zero(),
            track,
        }
    }

    pub fn track_score(&self, track: Track) -> &TrackScore {
        match track {
            Track::Seo => &self.seo,
            Track::Geo => &self.geo,
            Track::Compatibility => &self.compatibility,
            Track::Eco => &self.eco,
            Track::Ux => &self.ux,
        }
    }

    pub fn set_track_score(&mut self, track: Track, score: TrackScore) {
        match track {
            Track::Seo => self.seo = score,
            Track::Geo => self.geo = score,
            Track::Compatibility => self.compatibility = score,
            Track::Eco => self.eco = score,
            Track::Ux => self.ux = score,
        }
    }

    /// Requested tracks with their scores, in report order
    pub fn requested(&self) -> impl Iterator<Item = (Track, &TrackScore)> + '_ {
        self.track
            .tracks()
            .into_iter()
            .map(move |t| (t, self.track_score(t)))
    }

    /// Mean of the requested tracks' scores
    pub fn overall_score(&self) -> u8 {
        let scores: Vec<u32> = self.requested().map(|(_, s)| s.score as u32).collect();
        if scores.is_empty() {
            return 0;
        }
        (scores.iter().sum::<u32>() / scores.len() as u32).min(100) as u8
    }

    pub fn overall_grade(&self) -> Grade {
        Grade::from_score(self.overall_score())
    }

    /// Issues across all requested tracks
    pub fn total_issues(&self) -> usize {
        self.requested().map(|(_, s)| s.details.issues().len()).sum()
    }
}

/// Public API: score markup already held in memory.
///
/// Used by the tool server and other programmatic consumers that fetch pages
/// themselves.
pub fn analyze_markup(
    markup: &str,
    request: &AnalysisRequest,
) -> Result<AnalysisResult, DocumentUnavailable> {
    let document = parser::HtmlParser::new().parse(markup)?;
    Ok(analyzer::AnalysisEngine::new().analyze(request, &document))
}
