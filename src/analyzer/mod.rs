//! Analyzer module - multi-track page scoring engine

pub mod engine;
pub mod rules;
pub mod scoring;

pub use engine::{AggregateStats, AnalysisEngine};
pub use rules::{RuleCheck, RuleOutcome, TrackScorer};
pub use scoring::{ScoreCalculator, SuggestionPolicy, MAX_SUGGESTIONS};
