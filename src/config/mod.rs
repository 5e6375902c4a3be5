//! Configuration loading for pagelens

mod schema;

pub use schema::{Config, ConfigOverride, EffectiveConfig};

use anyhow::{Context, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

pub const CONFIG_FILENAME: &str = ".pagelensrc.json";

/// Find and load config file with extends resolution. Searches current directory then parents.
pub fn load_config(work_dir: &Path, custom_path: Option<&Path>) -> Result<Config> {
    let path = if let Some(p) = custom_path {
        let path = if p.is_absolute() {
            p.to_path_buf()
        } else {
            work_dir.join(p)
        };
        if path.exists() {
            Some(path)
        } else {
            anyhow::bail!("Config file not found: {}", path.display());
        }
    } else {
        find_config_in_parents(work_dir)
    };

    match path {
        Some(path) => {
            tracing::debug!(path = %path.display(), "loading config");
            load_config_with_extends(&path, &mut HashSet::new())
        }
        None => Ok(Config::default()),
    }
}

/// Load a config file and resolve extends chain
fn load_config_with_extends(config_path: &Path, visited: &mut HashSet<PathBuf>) -> Result<Config> {
    let canonical = config_path
        .canonicalize()
        .unwrap_or_else(|_| config_path.to_path_buf());
    if !visited.insert(canonical) {
        anyhow::bail!(
            "Circular extends detected in config: {}",
            config_path.display()
        );
    }

    let content = fs::read_to_string(config_path)
        .with_context(|| format!("Failed to read config: {}", config_path.display()))?;
    let mut config: Config = serde_json::from_str(&content)
        .with_context(|| format!("Invalid JSON in config: {}", config_path.display()))?;

    if let Some(extends) = config.extends.take() {
        let base_config = resolve_extends(config_path, &extends, visited)?;
        config.merge_from(base_config);
    }

    Ok(config)
}

/// Resolve an extends reference (relative to the referencing config, or absolute)
fn resolve_extends(
    config_path: &Path,
    extends: &str,
    visited: &mut HashSet<PathBuf>,
) -> Result<Config> {
    let config_dir = config_path.parent().unwrap_or(Path::new("."));

    let extends_path = if Path::new(extends).is_absolute() {
        PathBuf::from(extends)
    } else {
        config_dir.join(extends)
    };

    let extends_path = if extends_path.extension().is_none() {
        extends_path.with_extension("json")
    } else {
        extends_path
    };

    if !extends_path.exists() {
        anyhow::bail!(
            "Extended config not found: {} (referenced from {})",
            extends_path.display(),
            config_path.display()
        );
    }

    load_config_with_extends(&extends_path, visited)
}

/// Search for .pagelensrc.json in directory and its parents
fn find_config_in_parents(start: &Path) -> Option<PathBuf> {
    let mut dir = start;
    loop {
        let candidate = dir.join(CONFIG_FILENAME);
        if candidate.exists() {
            return Some(candidate);
        }
        dir = dir.parent()?;
    }
}

/// Build a GlobSet from ignore patterns for path matching
pub fn build_ignore_set(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob =
            Glob::new(pattern).with_context(|| format!("Invalid ignore pattern: {}", pattern))?;
        builder.add(glob);
    }
    builder.build().map_err(|e| anyhow::anyhow!("{}", e))
}

/// Check if a path should be ignored based on config glob patterns
pub fn is_ignored(path: &Path, ignore_set: &GlobSet) -> bool {
    ignore_set.is_match(path)
}

/// Whether a file name ends with one of the HTML suffixes
pub fn is_html_file(path: &Path, html_patterns: &[&str]) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    if path
        .components()
        .any(|c| c.as_os_str() == "node_modules" || c.as_os_str() == ".git")
    {
        return false;
    }
    let lower = name.to_ascii_lowercase();
    html_patterns
        .iter()
        .any(|p| lower.ends_with(&p.to_ascii_lowercase()))
}

/// Collect HTML pages under a file or directory, sorted, minus ignored paths
pub fn collect_html_files(
    path: &Path,
    ignore_set: Option<&GlobSet>,
    html_patterns: &[&str],
) -> Result<Vec<PathBuf>> {
    if path.is_file() {
        if ignore_set.is_some_and(|set| is_ignored(path, set)) {
            return Ok(vec![]);
        }
        return Ok(vec![path.to_path_buf()]);
    }

    if !path.is_dir() {
        anyhow::bail!("Path does not exist: {}", path.display());
    }

    let mut files: Vec<PathBuf> = WalkDir::new(path)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| is_html_file(p, html_patterns))
        .filter(|p| !ignore_set.is_some_and(|set| is_ignored(p, set)))
        .collect();

    files.sort();
    Ok(files)
}
