//! Config schema and deserialization

use crate::fetch::DEFAULT_USER_AGENT;
use crate::TrackSelector;
use serde::Deserialize;
use std::time::Duration;

/// Per-target override configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigOverride {
    /// Glob patterns this override applies to (matched against the file path or URL)
    pub files: Vec<String>,

    /// Optional threshold override for matched targets
    #[serde(default)]
    pub threshold: Option<u8>,

    /// Optional track selector for matched targets
    #[serde(default)]
    pub track: Option<TrackSelector>,
}

/// Root config structure for .pagelensrc.json
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Extend another config file (path relative to this config)
    #[serde(default)]
    pub extends: Option<String>,

    /// Minimum overall score (exit 1 if below). Default: none
    #[serde(default)]
    pub threshold: Option<u8>,

    /// Default track selector. Default: all
    #[serde(default)]
    pub track: Option<TrackSelector>,

    /// Glob patterns for files/directories to exclude when scanning
    #[serde(default)]
    pub ignore: Vec<String>,

    /// File suffixes treated as HTML pages (default: .html, .htm, .xhtml)
    #[serde(default)]
    pub html_patterns: Vec<String>,

    /// User-Agent header for page requests
    #[serde(default)]
    pub user_agent: Option<String>,

    /// Per-request timeout in seconds. Default: no timeout
    #[serde(default)]
    pub timeout_secs: Option<u64>,

    /// Per-target configuration overrides
    #[serde(default)]
    pub overrides: Vec<ConfigOverride>,
}

impl Config {
    /// Merge CLI overrides into config. CLI values take precedence.
    pub fn merge_with_cli(
        mut self,
        cli_threshold: Option<u8>,
        cli_track: Option<TrackSelector>,
    ) -> Self {
        if cli_threshold.is_some() {
            self.threshold = cli_threshold;
        }
        if cli_track.is_some() {
            self.track = cli_track;
        }
        self
    }

    /// Get effective config for a target (file path or URL), applying overrides
    pub fn effective_for_target(&self, target: &str) -> EffectiveConfig {
        let mut effective = EffectiveConfig {
            threshold: self.threshold,
            track: self.track.unwrap_or_default(),
        };

        // Apply matching overrides in order
        for override_cfg in &self.overrides {
            if Self::matches_override(target, &override_cfg.files) {
                if let Some(threshold) = override_cfg.threshold {
                    effective.threshold = Some(threshold);
                }
                if let Some(track) = override_cfg.track {
                    effective.track = track;
                }
            }
        }

        effective
    }

    /// Check if a target matches any of the override patterns
    fn matches_override(target: &str, patterns: &[String]) -> bool {
        patterns.iter().any(|pattern| match globset::Glob::new(pattern) {
            Ok(glob) => {
                glob.compile_matcher().is_match(target)
                    || target.contains(pattern.trim_start_matches("**/").trim_end_matches("/**"))
            }
            Err(_) => false,
        })
    }

    /// Merge another config into this one (for extends)
    pub fn merge_from(&mut self, base: Config) {
        // Base values are overridden by this config's values
        if self.threshold.is_none() {
            self.threshold = base.threshold;
        }
        if self.extends.is_none() {
            self.extends = base.extends;
        }
        if self.track.is_none() {
            self.track = base.track;
        }
        if self.user_agent.is_none() {
            self.user_agent = base.user_agent;
        }
        if self.timeout_secs.is_none() {
            self.timeout_secs = base.timeout_secs;
        }

        // Merge ignore patterns
        let mut all_ignores = base.ignore;
        all_ignores.append(&mut self.ignore);
        self.ignore = all_ignores;

        if self.html_patterns.is_empty() {
            self.html_patterns = base.html_patterns;
        }

        // Prepend base overrides
        let mut all_overrides = base.overrides;
        all_overrides.append(&mut self.overrides);
        self.overrides = all_overrides;
    }

    /// File suffixes that mark HTML pages
    pub fn get_html_patterns(&self) -> Vec<&str> {
        if self.html_patterns.is_empty() {
            vec![".html", ".htm", ".xhtml"]
        } else {
            self.html_patterns.iter().map(|s| s.as_str()).collect()
        }
    }

    pub fn user_agent(&self) -> &str {
        self.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT)
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

/// Effective configuration for a specific target (after applying overrides)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EffectiveConfig {
    pub threshold: Option<u8>,
    pub track: TrackSelector,
}
