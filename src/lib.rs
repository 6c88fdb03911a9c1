//! pyreview - single-snippet Python code review.
//!
//! pyreview parses one Python snippet, walks its syntax tree with a fixed
//! battery of style and structure detectors, and asks an external linter
//! for a holistic rating. The first suggestion found and the rating form
//! the answer.
//!
//! # Architecture
//!
//! - `parser`: tree-sitter parse and lowering into an arena `SyntaxTree`
//! - `detect`: detectors, the breadth-first rule engine and deduplication
//! - `scorer`: temporary-file materialization, the `Linter` trait, ratings
//! - `analyze`: the `Analyzer` pipeline and its result types
//! - `config`: YAML configuration schema
//! - `report`: Output formatting (pretty, JSON)
//!
//! ```no_run
//! use pyreview::Analyzer;
//!
//! let result = Analyzer::default().analyze("print('hi')\n")?;
//! println!("{} ({})", result.suggestion, result.rating);
//! # Ok::<(), pyreview::AnalyzeError>(())
//! ```

pub mod analyze;
pub mod cli;
pub mod config;
pub mod detect;
pub mod error;
pub mod parser;
pub mod report;
pub mod scorer;

pub use analyze::{AnalysisReport, AnalysisResult, Analyzer};
pub use config::Config;
pub use detect::{Advisory, Detector, Rule, RuleEngine};
pub use error::AnalyzeError;
pub use parser::{parse, SyntaxTree};
pub use scorer::{Linter, PylintLinter, Rating, ScorerError};
