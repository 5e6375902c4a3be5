//! Analysis engine - orchestrates the track scorers

use crate::fetch::MarkupSource;
use crate::parser::{DocumentModel, HtmlParser};
use crate::{AnalysisRequest, AnalysisResult, DocumentUnavailable, Track, TrackScore};
use rayon::prelude::*;
use tracing::{debug, debug_span, info, info_span, warn, Span};

use super::rules::scorer_for;

/// Main analysis engine that dispatches a document to the track scorers
pub struct AnalysisEngine {
    /// Score the requested tracks on the rayon pool
    parallel: bool,
    parser: HtmlParser,
}

impl AnalysisEngine {
    /// Create a new analysis engine
    pub fn new() -> Self {
        Self {
            parallel: true,
            parser: HtmlParser::new(),
        }
    }

    /// Score tracks one after another on the calling thread
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Score one track, or the zero-value placeholder when not selected
    pub fn score_track(
        request: &AnalysisRequest,
        track: Track,
        document: &DocumentModel,
    ) -> TrackScore {
        if request.track.includes(track) {
            let scorer = scorer_for(track);
            debug_span!("score", scorer = scorer.name()).in_scope(|| scorer.score(document))
        } else {
            TrackScore::zero()
        }
    }

    /// Score an already-parsed document.
    ///
    /// The result always carries all five tracks; unselected ones hold the
    /// zero-value placeholder.
    pub fn analyze(&self, request: &AnalysisRequest, document: &DocumentModel) -> AnalysisResult {
        let scores: Vec<(Track, TrackScore)> = if self.parallel {
            // rayon workers do not inherit the caller's span
            let parent = Span::current();
            Track::ALL
                .par_iter()
                .map(|&track| {
                    let score = parent.in_scope(|| Self::score_track(request, track, document));
                    (track, score)
                })
                .collect()
        } else {
            Track::ALL
                .iter()
                .map(|&track| (track, Self::score_track(request, track, document)))
                .collect()
        };

        let mut result = AnalysisResult::empty(request.display_name(), &request.url, request.track);
        for (track, score) in scores {
            debug!(track = %track, score = score.score, "scored track");
            result.set_track_score(track, score);
        }
        result
    }

    /// Fetch, parse and score one request
    pub fn run(
        &self,
        request: &AnalysisRequest,
        source: &dyn MarkupSource,
    ) -> Result<AnalysisResult, DocumentUnavailable> {
        let span = info_span!("analyze", url = %request.url, track = %request.track);
        span.in_scope(|| -> Result<AnalysisResult, DocumentUnavailable> {
            let markup = source.fetch(&request.url).inspect_err(|e| {
                warn!(error = %e, "document unavailable");
            })?;
            let document = self.parser.parse(&markup).inspect_err(|e| {
                warn!(error = %e, "document unavailable");
            })?;
            let result = self.analyze(request, &document);
            info!(overall = result.overall_score(), "analyzed page");
            Ok(result)
        })
    }

    /// Analyze multiple requests sequentially
    pub fn analyze_many(
        &self,
        requests: &[AnalysisRequest],
        source: &dyn MarkupSource,
    ) -> Vec<Result<AnalysisResult, DocumentUnavailable>> {
        requests.iter().map(|r| self.run(r, source)).collect()
    }

    /// Analyze multiple requests in parallel using rayon
    pub fn analyze_parallel(
        &self,
        requests: &[AnalysisRequest],
        source: &dyn MarkupSource,
    ) -> Vec<Result<AnalysisResult, DocumentUnavailable>> {
        requests.par_iter().map(|r| self.run(r, source)).collect()
    }

    /// Get aggregate stats from multiple results
    pub fn aggregate_stats(results: &[AnalysisResult]) -> AggregateStats {
        if results.is_empty() {
            return AggregateStats::default();
        }

        let total_score: u32 = results.iter().map(|r| r.overall_score() as u32).sum();
        let average_score = (total_score / results.len() as u32) as u8;
        let total_issues: usize = results.iter().map(|r| r.total_issues()).sum();

        AggregateStats {
            pages_analyzed: results.len(),
            average_score,
            total_issues,
        }
    }
}

impl Default for AnalysisEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Aggregate statistics from multiple page analyses
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateStats {
    /// Number of pages analyzed
    pub pages_analyzed: usize,
    /// Average overall score across all pages
    pub average_score: u8,
    /// Total number of issues found
    pub total_issues: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::StaticSource;
    use crate::TrackSelector;

    const PAGE: &str = r#"<!DOCTYPE html><html><head>
        <title>Acme Widgets - Handmade widgets since 1999</title>
        <meta name="viewport" content="width=device-width">
        </head><body><header></header><main><h1>Widgets</h1><h2>Range</h2>
        <img src="w.webp" alt="Widget"></main></body></html>"#;

    fn document(markup: &str) -> DocumentModel {
        HtmlParser::new().parse(markup).unwrap()
    }

    #[test]
    fn test_all_tracks_populated() {
        let request = AnalysisRequest::new("https://acme.test", "Acme", TrackSelector::All);
        let result = AnalysisEngine::new().analyze(&request, &document(PAGE));
        for track in Track::ALL {
            assert!(result.track_score(track).is_populated(), "{} not populated", track);
        }
        assert_eq!(result.name, "Acme");
        assert_eq!(result.url, "https://acme.test");
    }

    #[test]
    fn test_track_isolation() {
        let request = AnalysisRequest::new("https://acme.test", "", TrackSelector::Seo);
        let result = AnalysisEngine::new().analyze(&request, &document(PAGE));
        assert!(result.seo.is_populated());
        for track in [Track::Geo, Track::Compatibility, Track::Eco, Track::Ux] {
            assert_eq!(result.track_score(track), &TrackScore::zero());
        }
        // name defaults to the url
        assert_eq!(result.name, "https://acme.test");
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let request = AnalysisRequest::new("u", "n", TrackSelector::All);
        let doc = document(PAGE);
        let parallel = AnalysisEngine::new().analyze(&request, &doc);
        let sequential = AnalysisEngine::new().sequential().analyze(&request, &doc);
        assert_eq!(parallel, sequential);
    }

    #[test]
    fn test_run_fetches_through_source() {
        let source = StaticSource::new(PAGE);
        let request = AnalysisRequest::new("https://acme.test", "Acme", TrackSelector::Ux);
        let result = AnalysisEngine::new().run(&request, &source).unwrap();
        assert!(result.ux.is_populated());
        assert!(!result.seo.is_populated());
    }

    #[test]
    fn test_run_surfaces_parse_failure() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("latin1.html");
        std::fs::write(&path, b"<p>caf\xe9</p>").unwrap();

        let request = AnalysisRequest::new(path.display().to_string(), "", TrackSelector::All);
        let err = AnalysisEngine::new()
            .run(&request, &crate::fetch::FileSource::new())
            .unwrap_err();
        assert_eq!(err.kind(), "parse");
    }

    #[test]
    fn test_run_scores_page_with_stray_nul() {
        let source = StaticSource::new(format!("{}\0", PAGE));
        let request = AnalysisRequest::new("https://acme.test", "", TrackSelector::All);
        let result = AnalysisEngine::new().run(&request, &source).unwrap();
        assert!(result.seo.is_populated());
    }

    #[test]
    fn test_run_under_subscriber_leaves_no_span_entered() {
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_test_writer()
            .finish();
        tracing::subscriber::with_default(subscriber, || {
            let source = StaticSource::new(PAGE);
            let request = AnalysisRequest::new("https://acme.test", "", TrackSelector::All);
            let parallel = AnalysisEngine::new().run(&request, &source).unwrap();
            assert!(Span::current().is_none());

            let sequential = AnalysisEngine::new()
                .sequential()
                .run(&request, &source)
                .unwrap();
            assert_eq!(parallel, sequential);
        });
    }

    #[test]
    fn test_analyze_many_and_parallel_agree() {
        let source = StaticSource::new(PAGE);
        let requests: Vec<AnalysisRequest> = (0..4)
            .map(|i| {
                AnalysisRequest::new(format!("https://acme.test/{}", i), "", TrackSelector::All)
            })
            .collect();
        let engine = AnalysisEngine::new();
        let many: Vec<_> = engine
            .analyze_many(&requests, &source)
            .into_iter()
            .map(|r| r.unwrap())
            .collect();
        let parallel: Vec<_> = engine
            .analyze_parallel(&requests, &source)
            .into_iter()
            .map(|r| r.unwrap())
            .collect();
        assert_eq!(many, parallel);
    }

    #[test]
    fn test_aggregate_stats() {
        let source = StaticSource::new(PAGE);
        let engine = AnalysisEngine::new();
        let results: Vec<AnalysisResult> = ["a", "b"]
            .iter()
            .map(|u| {
                engine
                    .run(&AnalysisRequest::new(*u, "", TrackSelector::All), &source)
                    .unwrap()
            })
            .collect();
        let stats = AnalysisEngine::aggregate_stats(&results);
        assert_eq!(stats.pages_analyzed, 2);
        assert_eq!(stats.average_score, results[0].overall_score());
        assert_eq!(stats.total_issues, results[0].total_issues() * 2);

        assert_eq!(AnalysisEngine::aggregate_stats(&[]), AggregateStats::default());
    }
}
