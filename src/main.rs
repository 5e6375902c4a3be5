//! Pagelens: web page quality analyzer CLI

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use pagelens::analyzer::AnalysisEngine;
use pagelens::config::{build_ignore_set, collect_html_files, load_config, Config, CONFIG_FILENAME};
use pagelens::fetch::{is_url, TargetSource};
use pagelens::reporter::{ConsoleReporter, JsonReporter};
use pagelens::{AnalysisRequest, AnalysisResult, TrackSelector};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Pagelens: score web pages for SEO, GEO, compatibility, eco and UX
#[derive(Parser, Debug)]
#[command(name = "pagelens")]
#[command(author, version, about, long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
#[command(subcommand_negates_reqs = true)]
struct Args {
    #[command(subcommand)]
    command: Option<Commands>,

    /// URLs, HTML files or directories to analyze (omit when using a subcommand)
    #[arg(required = true)]
    targets: Vec<String>,

    /// Track to score: all, seo, geo, compatibility, eco, ux
    #[arg(long)]
    track: Option<TrackSelector>,

    /// Display name for the page (single target only)
    #[arg(long)]
    name: Option<String>,

    /// Output format as JSON
    #[arg(long, short)]
    json: bool,

    /// Minimum overall score threshold (exit 1 if below)
    #[arg(long, short)]
    threshold: Option<u8>,

    /// Quiet mode (one line per page)
    #[arg(long, short)]
    quiet: bool,

    /// Verbose output (show every suggestion)
    #[arg(long, short)]
    verbose: bool,

    /// Path to config file (default: search .pagelensrc.json in current dir and parents)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Analyze pages in parallel (default for more than 10 pages)
    #[arg(long)]
    parallel: bool,

    /// Number of parallel threads (default: number of CPU cores)
    #[arg(long, value_name = "N")]
    jobs: Option<usize>,

    /// Log filter when RUST_LOG is unset (e.g. info, debug, pagelens=trace)
    #[arg(long, value_name = "LEVEL")]
    log_level: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run MCP server for editors and assistants (stdio JSON-RPC)
    Mcp,

    /// Analyze one JSON request ({url, track, name}) and print the result JSON
    Request {
        /// Read the request from this file instead of stdin
        #[arg(long)]
        input: Option<PathBuf>,
    },

    /// Create .pagelensrc.json with sensible defaults
    Init {
        /// Minimum score threshold (e.g. 70)
        #[arg(long)]
        threshold: Option<u8>,

        /// Default track selector
        #[arg(long)]
        track: Option<TrackSelector>,

        /// Directory in which to create config (default: current)
        #[arg(long)]
        dir: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", "Error".red().bold(), e);
            ExitCode::from(2)
        }
    }
}

fn init_tracing(level: Option<&str>) {
    let filter = match level {
        Some(level) => EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("warn")),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn run() -> Result<ExitCode> {
    let args = Args::parse();
    init_tracing(args.log_level.as_deref());

    let cwd = std::env::current_dir().context("Failed to get current directory")?;

    if let Some(cmd) = &args.command {
        return match cmd {
            Commands::Mcp => {
                let config = load_config(&cwd, args.config.as_deref())?;
                let source = TargetSource::from_config(&config)?;
                pagelens::mcp::run_mcp_server(&source)?;
                Ok(ExitCode::SUCCESS)
            }
            Commands::Request { input } => {
                run_request(&cwd, args.config.as_deref(), input.as_deref())
            }
            Commands::Init {
                threshold,
                track,
                dir,
            } => run_init(*threshold, *track, dir.as_deref(), &cwd),
        };
    }

    let work_dir = config_search_dir(&args.targets, &cwd);
    let config = load_config(&work_dir, args.config.as_deref())?
        .merge_with_cli(args.threshold, args.track);

    let requests = collect_requests(&args, &config)?;
    if requests.is_empty() {
        eprintln!("{}: No HTML pages found", "Warning".yellow());
        return Ok(ExitCode::from(2));
    }

    if let Some(jobs) = args.jobs {
        rayon::ThreadPoolBuilder::new()
            .num_threads(jobs)
            .build_global()
            .ok();
    }

    let source = TargetSource::from_config(&config)?;
    let engine = AnalysisEngine::new();
    let use_parallel = args.parallel || requests.len() > 10;
    let outcomes = if use_parallel {
        engine.analyze_parallel(&requests, &source)
    } else {
        engine.analyze_many(&requests, &source)
    };

    let mut results = Vec::with_capacity(outcomes.len());
    let mut failures = Vec::new();
    for (request, outcome) in requests.iter().zip(outcomes) {
        match outcome {
            Ok(result) => results.push(result),
            Err(e) => failures.push((request.url.clone(), e)),
        }
    }

    for (url, e) in &failures {
        if !args.quiet {
            eprintln!("{}: Failed to analyze {}: {}", "Error".red(), url, e);
        }
    }

    if results.is_empty() {
        if args.json {
            let message = failures
                .first()
                .map(|(_, e)| e.to_string())
                .unwrap_or_else(|| "All pages failed to analyze".to_string());
            println!("{}", JsonReporter::new().report_error(&message));
        } else if requests.len() > 1 {
            eprintln!("{}: All pages failed to analyze", "Error".red());
        }
        return Ok(ExitCode::from(2));
    }

    let stats = AnalysisEngine::aggregate_stats(&results);
    print_results(&args, &results, &stats);

    if let Some((score, threshold)) = threshold_check(&config, &results, stats.average_score) {
        if score < threshold {
            if !args.quiet && !args.json {
                eprintln!(
                    "\n{}: Score {} is below threshold {}",
                    "Failed".red().bold(),
                    score,
                    threshold
                );
            }
            return Ok(ExitCode::from(1));
        }
    }

    if failures.is_empty() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::from(2))
    }
}

/// Directory to start the config search from: the first local target, else cwd
fn config_search_dir(targets: &[String], cwd: &Path) -> PathBuf {
    targets
        .iter()
        .find(|t| !is_url(t))
        .map(|t| {
            let path = Path::new(t);
            let dir = if path.is_file() {
                path.parent().unwrap_or(Path::new("."))
            } else {
                path
            };
            if dir.as_os_str().is_empty() {
                cwd.to_path_buf()
            } else {
                cwd.join(dir)
            }
        })
        .unwrap_or_else(|| cwd.to_path_buf())
}

/// Expand targets into analysis requests, applying per-target overrides
fn collect_requests(args: &Args, config: &Config) -> Result<Vec<AnalysisRequest>> {
    let ignore_set = if config.ignore.is_empty() {
        None
    } else {
        Some(build_ignore_set(&config.ignore)?)
    };
    let html_patterns = config.get_html_patterns();

    let mut targets = Vec::new();
    for target in &args.targets {
        if is_url(target) {
            targets.push(target.clone());
            continue;
        }
        let files = collect_html_files(Path::new(target), ignore_set.as_ref(), &html_patterns)?;
        targets.extend(files.into_iter().map(|p| p.display().to_string()));
    }

    let name = match (&args.name, targets.len()) {
        (Some(name), 1) => name.clone(),
        (Some(_), _) => {
            if !args.quiet {
                eprintln!("{}: --name ignored for multiple pages", "Warning".yellow());
            }
            String::new()
        }
        (None, _) => String::new(),
    };

    Ok(targets
        .into_iter()
        .map(|target| {
            let effective = config.effective_for_target(&target);
            let track = args.track.unwrap_or(effective.track);
            AnalysisRequest::new(target, name.clone(), track)
        })
        .collect())
}

/// The score compared against the threshold, with the threshold that applies
fn threshold_check(config: &Config, results: &[AnalysisResult], average: u8) -> Option<(u8, u8)> {
    if let [single] = results {
        let threshold = config.effective_for_target(&single.url).threshold?;
        Some((single.overall_score(), threshold))
    } else {
        config.threshold.map(|t| (average, t))
    }
}

fn print_results(
    args: &Args,
    results: &[AnalysisResult],
    stats: &pagelens::analyzer::AggregateStats,
) {
    if args.json {
        let reporter = JsonReporter::new().pretty();
        if results.len() == 1 {
            println!("{}", reporter.report(&results[0]));
        } else {
            println!("{}", reporter.report_with_summary(results, stats));
        }
    } else if args.quiet {
        let reporter = ConsoleReporter::new();
        for result in results {
            reporter.report_quiet(result);
        }
    } else {
        let mut reporter = ConsoleReporter::new();
        if args.verbose {
            reporter = reporter.verbose();
        }
        if results.len() == 1 {
            reporter.report(&results[0]);
        } else {
            reporter.report_many(results, stats);
        }
    }
}

fn run_request(cwd: &Path, config_path: Option<&Path>, input: Option<&Path>) -> Result<ExitCode> {
    let raw = match input {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read request: {}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read request from stdin")?;
            buf
        }
    };

    let reporter = JsonReporter::new();
    let request: AnalysisRequest = match serde_json::from_str(&raw) {
        Ok(request) => request,
        Err(e) => {
            println!("{}", reporter.report_error(&format!("Invalid request: {}", e)));
            return Ok(ExitCode::from(2));
        }
    };

    let config = load_config(cwd, config_path)?;
    let source = TargetSource::from_config(&config)?;
    match AnalysisEngine::new().run(&request, &source) {
        Ok(result) => {
            println!("{}", reporter.report(&result));
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            println!("{}", reporter.report_error(&e.to_string()));
            Ok(ExitCode::from(2))
        }
    }
}

fn run_init(
    threshold: Option<u8>,
    track: Option<TrackSelector>,
    dir: Option<&Path>,
    cwd: &Path,
) -> Result<ExitCode> {
    let dir = dir.unwrap_or(cwd);
    let config_path = dir.join(CONFIG_FILENAME);

    if config_path.exists() {
        eprintln!(
            "{}: {} already exists; use --dir to write elsewhere or remove it first",
            "Warning".yellow(),
            config_path.display()
        );
        return Ok(ExitCode::SUCCESS);
    }

    let threshold_value = threshold.unwrap_or(70);
    let track_value = track.unwrap_or_default();

    let starter = serde_json::json!({
        "threshold": threshold_value,
        "track": track_value,
        "ignore": ["**/node_modules/**", "**/dist/**", "**/drafts/**"],
        "htmlPatterns": [".html", ".htm", ".xhtml"],
        "userAgent": pagelens::fetch::DEFAULT_USER_AGENT,
        "timeoutSecs": 30,
        "overrides": [
            { "files": ["**/legacy/**"], "threshold": 50 }
        ]
    });
    let json = serde_json::to_string_pretty(&starter)?;

    std::fs::write(&config_path, json + "\n")
        .with_context(|| format!("Failed to write config to {}", config_path.display()))?;

    println!(
        "{}: Created {} with threshold={}, track={}",
        "Done".green().bold(),
        config_path.display(),
        threshold_value,
        track_value
    );
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_search_dir_prefers_local_target() {
        let cwd = Path::new("/work");
        let targets = vec!["https://example.com".to_string(), "site".to_string()];
        assert_eq!(config_search_dir(&targets, cwd), PathBuf::from("/work/site"));
    }

    #[test]
    fn test_config_search_dir_urls_only() {
        let cwd = Path::new("/work");
        let targets = vec!["https://example.com".to_string()];
        assert_eq!(config_search_dir(&targets, cwd), PathBuf::from("/work"));
    }

    #[test]
    fn test_args_parse_track() {
        let args = Args::try_parse_from(["pagelens", "--track", "seo", "index.html"]).unwrap();
        assert_eq!(args.track, Some(TrackSelector::Seo));
        assert_eq!(args.targets, vec!["index.html"]);

        assert!(Args::try_parse_from(["pagelens", "--track", "speed", "index.html"]).is_err());
    }

    #[test]
    fn test_threshold_check_single_uses_override() {
        let config: Config = serde_json::from_str(
            r#"{ "threshold": 90, "overrides": [{ "files": ["**/legacy/**"], "threshold": 10 }] }"#,
        )
        .unwrap();
        let result = pagelens::analyze_markup(
            "<p>x</p>",
            &AnalysisRequest::new("site/legacy/a.html", "", TrackSelector::All),
        )
        .unwrap();
        let (score, threshold) =
            threshold_check(&config, std::slice::from_ref(&result), 0).unwrap();
        assert_eq!(threshold, 10);
        assert_eq!(score, result.overall_score());
    }
}
