//! Output formatting for analysis results.
//!
//! Supports two output formats:
//! - Pretty: colored terminal output for human readability
//! - JSON: `{"suggestion", "rating"}`, plus the full list with `--all`

use colored::*;
use serde::{Deserialize, Serialize};

use crate::analyze::{AnalysisReport, AnalysisResult};
use crate::detect::Advisory;
use crate::scorer::Rating;

// =============================================================================
// JSON Format
// =============================================================================

/// JSON document written by `pyreview analyze --format json`.
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonReport {
    #[serde(flatten)]
    pub result: AnalysisResult,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestions: Option<Vec<String>>,
}

impl JsonReport {
    pub fn new(report: &AnalysisReport, all: bool) -> Self {
        Self {
            result: report.result.clone(),
            suggestions: all.then(|| {
                report
                    .suggestions
                    .iter()
                    .map(|a| a.as_str().to_string())
                    .collect()
            }),
        }
    }
}

/// Render a report as pretty-printed JSON.
pub fn render_json(report: &AnalysisReport, all: bool) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(&JsonReport::new(report, all))?)
}

/// Write a report in JSON format.
pub fn write_json(report: &AnalysisReport, all: bool) -> anyhow::Result<()> {
    println!("{}", render_json(report, all)?);
    Ok(())
}

// =============================================================================
// Pretty Format
// =============================================================================

/// Write a report for a terminal.
pub fn write_pretty(source: &str, report: &AnalysisReport, all: bool, verbose: bool) {
    // Header
    println!();
    print!("  ");
    print!("{}", "pyreview".cyan().bold());
    println!(" v{}", env!("CARGO_PKG_VERSION"));
    println!();

    print!("  {}", "Snippet: ".dimmed());
    println!("{}", source);
    println!();

    print!("  {}", "Rating:     ".bold());
    write_colored_rating(&report.result.rating);
    println!();
    print!("  {}", "Suggestion: ".bold());
    println!("{}", report.result.suggestion);
    println!();

    if all && !report.suggestions.is_empty() {
        write_suggestions(&report.suggestions);
        println!();
    }

    if verbose && !report.linter_report.trim().is_empty() {
        println!("  {}", "Linter report:".bold());
        for line in report.linter_report.lines() {
            println!("    {}", line.dimmed());
        }
        println!();
    }
}

fn write_colored_rating(rating: &Rating) {
    let text = rating.as_str();
    match rating.value() {
        Some(v) if v >= 9.0 => print!("{}", text.green().bold()),
        Some(v) if v >= 7.0 => print!("{}", text.green()),
        Some(v) if v >= 5.0 => print!("{}", text.yellow()),
        Some(_) => print!("{}", text.red()),
        None => print!("{}", text.dimmed()),
    }
}

fn write_suggestions(suggestions: &[Advisory]) {
    println!("  {} ({}):", "Suggestions".bold(), suggestions.len());
    println!();

    for (i, advisory) in suggestions.iter().enumerate() {
        println!("    {} {}", format!("{:>2}.", i + 1).dimmed(), advisory);
    }
}
