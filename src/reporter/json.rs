//! JSON reporter for machine-readable output

use crate::analyzer::engine::AggregateStats;
use crate::{AnalysisResult, Grade};
use serde::Serialize;

/// Reporter for JSON output
pub struct JsonReporter {
    /// Whether to pretty-print JSON
    pretty: bool,
}

impl JsonReporter {
    /// Create a new JSON reporter
    pub fn new() -> Self {
        Self { pretty: false }
    }

    /// Enable pretty-printing
    pub fn pretty(mut self) -> Self {
        self.pretty = true;
        self
    }

    fn render<T: Serialize + ?Sized>(&self, value: &T, fallback: &str) -> String {
        let rendered = if self.pretty {
            serde_json::to_string_pretty(value)
        } else {
            serde_json::to_string(value)
        };
        rendered.unwrap_or_else(|_| fallback.to_string())
    }

    /// Report a single analysis result as JSON (the wire shape callers consume)
    pub fn report(&self, result: &AnalysisResult) -> String {
        self.render(result, "{}")
    }

    /// Report multiple results as JSON array
    pub fn report_many(&self, results: &[AnalysisResult]) -> String {
        self.render(results, "[]")
    }

    /// Report with summary
    pub fn report_with_summary(
        &self,
        results: &[AnalysisResult],
        stats: &AggregateStats,
    ) -> String {
        let output = JsonOutput {
            results,
            summary: JsonSummary {
                pages_analyzed: stats.pages_analyzed,
                average_score: stats.average_score,
                average_grade: Grade::from_score(stats.average_score).to_string(),
                total_issues: stats.total_issues,
            },
        };
        self.render(&output, "{}")
    }

    /// Report a failure as `{"error": "..."}`
    pub fn report_error(&self, message: &str) -> String {
        self.render(&JsonError { error: message }, r#"{"error":"unknown error"}"#)
    }
}

impl Default for JsonReporter {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonOutput<'a> {
    results: &'a [AnalysisResult],
    summary: JsonSummary,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonSummary {
    pages_analyzed: usize,
    average_score: u8,
    average_grade: String,
    total_issues: usize,
}

#[derive(Serialize)]
struct JsonError<'a> {
    error: &'a str,
}
