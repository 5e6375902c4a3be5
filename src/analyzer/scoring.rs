//! Score accumulation for track scorers

use super::rules::RuleOutcome;
use crate::Grade;

/// Maximum suggestions reported by tracks that append fixed suggestions
pub const MAX_SUGGESTIONS: usize = 5;

/// Accumulated result of folding a track's rule outcomes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tally {
    pub score: u8,
    pub issues: Vec<String>,
    pub suggestions: Vec<String>,
}

/// Calculator for track scores
pub struct ScoreCalculator;

impl ScoreCalculator {
    /// Fold rule outcomes in order over a base score.
    ///
    /// Points may push the running total past 100; only the final value is
    /// clamped. Issues and suggestions keep check order.
    pub fn fold<I>(base: u32, outcomes: I) -> Tally
    where
        I: IntoIterator<Item = RuleOutcome>,
    {
        let mut total = base;
        let mut issues = Vec::new();
        let mut suggestions = Vec::new();

        for outcome in outcomes {
            total = total.saturating_add(outcome.points);
            issues.extend(outcome.issues);
            suggestions.extend(outcome.suggestions);
        }

        Tally {
            score: Self::clamp(total),
            issues,
            suggestions,
        }
    }

    pub fn clamp(raw: u32) -> u8 {
        raw.min(100) as u8
    }

    /// Get a description of the grade
    pub fn grade_description(grade: Grade) -> &'static str {
        match grade {
            Grade::A => "Excellent - Page is well-structured and optimized",
            Grade::B => "Good - Page is solid but has room for improvement",
            Grade::C => "Fair - Page covers the basics but needs strengthening",
            Grade::D => "Poor - Page has significant quality issues",
            Grade::F => "Failing - Page needs major improvements",
        }
    }
}

/// How detection-driven and fixed suggestions are combined.
///
/// Detection-driven suggestions come first; fixed suggestions are appended
/// after them and are the first to be dropped when the cap is reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SuggestionPolicy {
    pub max: usize,
}

impl SuggestionPolicy {
    pub const fn new(max: usize) -> Self {
        Self { max }
    }

    pub fn apply(&self, detected: Vec<String>, fixed: &[&str]) -> Vec<String> {
        detected
            .into_iter()
            .chain(fixed.iter().map(|s| s.to_string()))
            .take(self.max)
            .collect()
    }
}

impl Default for SuggestionPolicy {
    fn default() -> Self {
        Self::new(MAX_SUGGESTIONS)
    }
}

/// Join up to `limit` issues with `sep`, or return `fallback` when none
pub fn summarize(issues: &[String], sep: &str, limit: Option<usize>, fallback: &str) -> String {
    if issues.is_empty() {
        return fallback.to_string();
    }
    let take = limit.unwrap_or(issues.len());
    issues
        .iter()
        .take(take)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(sep)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fold_accumulates_in_order() {
        let tally = ScoreCalculator::fold(
            50,
            vec![
                RuleOutcome::award(15).with_suggestion("first"),
                RuleOutcome::miss().with_issue("broken").with_suggestion("second"),
                RuleOutcome::award(10),
            ],
        );
        assert_eq!(tally.score, 75);
        assert_eq!(tally.issues, vec!["broken".to_string()]);
        assert_eq!(tally.suggestions, vec!["first".to_string(), "second".to_string()]);
    }

    #[test]
    fn fold_clamps_final_total() {
        let tally = ScoreCalculator::fold(
            60,
            vec![RuleOutcome::award(30), RuleOutcome::award(30)],
        );
        assert_eq!(tally.score, 100);
    }

    #[test]
    fn fold_with_no_outcomes_is_base() {
        let tally = ScoreCalculator::fold(50, Vec::new());
        assert_eq!(tally.score, 50);
        assert!(tally.issues.is_empty());
    }

    #[test]
    fn policy_drops_fixed_suggestions_first() {
        let policy = SuggestionPolicy::default();
        let detected: Vec<String> = (1..=4).map(|i| format!("d{}", i)).collect();
        let out = policy.apply(detected, &["f1", "f2", "f3"]);
        assert_eq!(out, vec!["d1", "d2", "d3", "d4", "f1"]);
    }

    #[test]
    fn policy_keeps_only_first_detected_on_overflow() {
        let policy = SuggestionPolicy::new(2);
        let detected = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        assert_eq!(policy.apply(detected, &["f"]), vec!["a", "b"]);
    }

    #[test]
    fn policy_with_no_detected_uses_fixed() {
        let out = SuggestionPolicy::default().apply(Vec::new(), &["f1", "f2", "f3"]);
        assert_eq!(out, vec!["f1", "f2", "f3"]);
    }

    #[test]
    fn summarize_joins_or_falls_back() {
        let issues = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        assert_eq!(summarize(&issues, ", ", None, "ok"), "a, b, c");
        assert_eq!(summarize(&issues, "; ", Some(2), "ok"), "a; b");
        assert_eq!(summarize(&[], ", ", None, "ok"), "ok");
    }

    #[test]
    fn grade_descriptions() {
        assert!(ScoreCalculator::grade_description(Grade::A).starts_with("Excellent"));
        assert!(ScoreCalculator::grade_description(Grade::F).starts_with("Failing"));
    }
}
