//! Console reporter with colored output

use crate::analyzer::engine::AggregateStats;
use crate::analyzer::scoring::ScoreCalculator;
use crate::{AnalysisResult, Grade, Track, TrackScore};
use colored::Colorize;

/// Reporter for terminal output
pub struct ConsoleReporter {
    /// Whether to use colors
    use_colors: bool,
    /// Whether to show verbose output
    verbose: bool,
}

impl ConsoleReporter {
    /// Create a new console reporter
    pub fn new() -> Self {
        Self {
            use_colors: true,
            verbose: false,
        }
    }

    /// Disable colors
    pub fn without_colors(mut self) -> Self {
        self.use_colors = false;
        self
    }

    /// Enable verbose output
    pub fn verbose(mut self) -> Self {
        self.verbose = true;
        self
    }

    /// Report a single analysis result
    pub fn report(&self, result: &AnalysisResult) {
        self.print_header(result);
        self.print_score(result);
        self.print_breakdown(result);

        for (track, score) in result.requested() {
            self.print_track(track, score);
        }
        println!();
    }

    /// Report multiple results with summary
    pub fn report_many(&self, results: &[AnalysisResult], stats: &AggregateStats) {
        for result in results {
            self.report(result);
            println!("{}", "─".repeat(60));
        }

        self.print_summary(stats);
    }

    /// Report in quiet mode (just score)
    pub fn report_quiet(&self, result: &AnalysisResult) {
        println!("{}", self.quiet_line(result));
    }

    fn quiet_line(&self, result: &AnalysisResult) -> String {
        let tracks: Vec<String> = result
            .requested()
            .map(|(track, score)| format!("{}={}", track.id(), score.score))
            .collect();
        format!(
            "{}: {} ({}) [{}]",
            result.url,
            result.overall_score(),
            self.colorize_grade(&result.overall_grade()),
            tracks.join(" ")
        )
    }

    fn print_header(&self, result: &AnalysisResult) {
        println!();
        println!("{}", format!("🔎 Page Quality Analysis: {}", result.name).bold());
        if result.name != result.url {
            println!("   URL: {}", result.url);
        }
        println!("   Tracks: {}", result.track);
        println!();
    }

    fn print_score(&self, result: &AnalysisResult) {
        let grade = result.overall_grade();
        let grade_str = self.colorize_grade(&grade);
        let score_bar = self.create_score_bar(result.overall_score());

        println!("   Overall: {} {}", score_bar, grade_str.bold());
        println!("   {}", ScoreCalculator::grade_description(grade).dimmed());
        println!();
    }

    fn print_breakdown(&self, result: &AnalysisResult) {
        println!("   {}", "Track Scores:".bold());
        for (track, score) in result.requested() {
            let bar = self.create_mini_bar(score.score, 100);
            let score_str = format!("{:>3}/100", score.score);
            let colored_score = if score.score >= 80 {
                score_str.green()
            } else if score.score >= 60 {
                score_str.yellow()
            } else {
                score_str.red()
            };
            println!(
                "   {} {} {} ({})",
                bar,
                colored_score,
                track.label(),
                self.colorize_grade(&score.grade())
            );
        }
        println!();
    }

    fn print_track(&self, track: Track, score: &TrackScore) {
        let details = &score.details;
        println!("   {} {}", track.label().bold(), details.summary().dimmed());

        for issue in details.issues() {
            println!("     {} {}", "✗".red(), issue);
        }

        // Fixed suggestions are noise once the track is healthy
        let shown = if self.verbose || score.score < 90 {
            details.suggestions().len()
        } else {
            0
        };
        for suggestion in details.suggestions().iter().take(shown) {
            println!("     {} {}", "→".cyan(), suggestion.italic());
        }
        if shown == 0 && !details.suggestions().is_empty() {
            println!(
                "     {} {} suggestions (use --verbose to show)",
                "ℹ".blue(),
                details.suggestions().len()
            );
        }
    }

    fn print_summary(&self, stats: &AggregateStats) {
        println!();
        println!("{}", "═".repeat(60));
        println!("{}", "Summary".bold());
        println!("{}", "═".repeat(60));
        println!(
            "   Pages analyzed: {}",
            stats.pages_analyzed.to_string().bold()
        );
        println!(
            "   Average score:  {} ({})",
            stats.average_score.to_string().bold(),
            self.colorize_grade(&Grade::from_score(stats.average_score))
        );
        println!("   Total issues:   {}", stats.total_issues);
        println!();
    }

    fn colorize_grade(&self, grade: &Grade) -> colored::ColoredString {
        let s = grade.to_string();
        if !self.use_colors {
            return s.normal();
        }
        match grade {
            Grade::A => s.green().bold(),
            Grade::B => s.green(),
            Grade::C => s.yellow(),
            Grade::D => s.red(),
            Grade::F => s.red().bold(),
        }
    }

    fn create_score_bar(&self, score: u8) -> String {
        let filled = (score as usize * 20) / 100;
        let empty = 20 - filled;

        let bar = format!("[{}{}] {:>3}%", "█".repeat(filled), "░".repeat(empty), score);

        if self.use_colors {
            if score >= 80 {
                bar.green().to_string()
            } else if score >= 60 {
                bar.yellow().to_string()
            } else {
                bar.red().to_string()
            }
        } else {
            bar
        }
    }

    fn create_mini_bar(&self, score: u8, max: u8) -> String {
        let filled = ((score as usize * 10) / max.max(1) as usize).min(10);
        let empty = 10 - filled;
        format!("[{}{}]", "▓".repeat(filled), "░".repeat(empty))
    }
}

impl Default for ConsoleReporter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AnalysisRequest, TrackSelector};

    #[test]
    fn score_bar_width() {
        let reporter = ConsoleReporter::new().without_colors();
        assert_eq!(
            reporter.create_score_bar(50),
            format!("[{}{}]  50%", "█".repeat(10), "░".repeat(10))
        );
        assert_eq!(reporter.create_score_bar(100).chars().filter(|c| *c == '█').count(), 20);
        assert_eq!(reporter.create_score_bar(0).chars().filter(|c| *c == '░').count(), 20);
    }

    #[test]
    fn mini_bar_never_overflows() {
        let reporter = ConsoleReporter::new().without_colors();
        assert_eq!(reporter.create_mini_bar(100, 100).chars().count(), 12);
        assert_eq!(reporter.create_mini_bar(0, 0).chars().count(), 12);
    }

    #[test]
    fn quiet_line_lists_requested_tracks() {
        let result = crate::analyze_markup(
            "<h1>Hello</h1>",
            &AnalysisRequest::new("page.html", "", TrackSelector::Ux),
        )
        .unwrap();
        let line = ConsoleReporter::new().without_colors().quiet_line(&result);
        assert!(line.starts_with("page.html: "));
        assert!(line.ends_with(&format!("[ux={}]", result.ux.score)));
    }
}
