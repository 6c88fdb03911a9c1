//! One-shot analysis of a Python snippet.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::Config;
use crate::detect::{Advisory, RuleEngine, Suggestions};
use crate::error::AnalyzeError;
use crate::parser::parse;
use crate::scorer::{self, Linter, PylintLinter, Rating};

/// The answer for one snippet: the top suggestion and the linter rating.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub suggestion: String,
    pub rating: Rating,
}

/// Everything gathered for one snippet.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    /// Deduplicated advisories in discovery order, linter failure last.
    pub suggestions: Vec<Advisory>,
    /// Raw linter output; empty when the linter was skipped or failed.
    pub linter_report: String,
    pub result: AnalysisResult,
}

/// Runs the detectors and the external linter over snippets.
pub struct Analyzer {
    engine: RuleEngine,
    linter: Option<Box<dyn Linter>>,
}

impl Analyzer {
    pub fn new(engine: RuleEngine, linter: Option<Box<dyn Linter>>) -> Self {
        Self { engine, linter }
    }

    pub fn from_config(config: &Config) -> Self {
        let linter: Option<Box<dyn Linter>> = if config.linter.enabled {
            Some(Box::new(PylintLinter::from_config(&config.linter)))
        } else {
            None
        };
        Self::new(RuleEngine::from_config(config), linter)
    }

    /// Replace the linter.
    pub fn with_linter(mut self, linter: impl Linter + 'static) -> Self {
        self.linter = Some(Box::new(linter));
        self
    }

    /// Skip the linter; ratings are always missing.
    pub fn without_linter(mut self) -> Self {
        self.linter = None;
        self
    }

    pub fn engine(&self) -> &RuleEngine {
        &self.engine
    }

    /// Analyze `source` and return the top suggestion and rating.
    pub fn analyze(&self, source: &str) -> Result<AnalysisResult, AnalyzeError> {
        self.analyze_report(source).map(|report| report.result)
    }

    /// Analyze `source` and keep every suggestion and the raw linter report.
    pub fn analyze_report(&self, source: &str) -> Result<AnalysisReport, AnalyzeError> {
        let tree = parse(source)?;
        let mut suggestions: Suggestions = self.engine.run(&tree).into_iter().collect();

        let (linter_report, rating) = match &self.linter {
            Some(linter) => {
                let score = scorer::score(linter.as_ref(), source);
                if let Some(failure) = score.failure {
                    suggestions.push(failure);
                }
                (score.report, score.rating)
            }
            None => (String::new(), Rating::Missing),
        };

        let result = AnalysisResult {
            suggestion: suggestions.top().to_string(),
            rating,
        };
        debug!(
            suggestions = suggestions.len(),
            rating = %result.rating,
            "analysis complete"
        );

        Ok(AnalysisReport {
            suggestions: suggestions.into_vec(),
            linter_report,
            result,
        })
    }
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}
