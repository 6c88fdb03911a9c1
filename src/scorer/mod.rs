//! External linter scoring.
//!
//! The snippet is written to a uniquely named temporary `.py` file, the
//! linter is pointed at it and its textual report is returned. The file is
//! removed on every exit path. A failed run is turned into a single
//! advisory by the caller, never into an analysis failure.

mod pylint;
mod rating;

pub use pylint::PylintLinter;
pub use rating::{extract_rating, Rating, NO_RATING};

use std::io::{self, Write};
use std::path::Path;
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, warn};

use crate::detect::Advisory;

/// Errors that can occur while obtaining a linter report.
#[derive(Error, Debug)]
pub enum ScorerError {
    #[error("could not write snippet file: {0}")]
    Materialize(#[source] io::Error),
    #[error("could not run '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },
    #[error("'{command}' failed with {status}: {detail}")]
    Failed {
        command: String,
        status: String,
        detail: String,
    },
    #[error("'{command}' timed out after {}s", .timeout.as_secs_f64())]
    TimedOut { command: String, timeout: Duration },
    #[error("could not start process runtime: {0}")]
    Runtime(#[source] io::Error),
}

/// Something that can produce a textual report for a Python file.
pub trait Linter: Send + Sync {
    /// Name used to prefix failure advisories.
    fn label(&self) -> &str;

    fn analyze(&self, path: &Path) -> Result<String, ScorerError>;
}

/// Write `source` to a temporary file, run `linter` on it and return the
/// report.
pub fn lint_source(linter: &dyn Linter, source: &str) -> Result<String, ScorerError> {
    let mut file = tempfile::Builder::new()
        .prefix("pyreview-")
        .suffix(".py")
        .tempfile()
        .map_err(ScorerError::Materialize)?;
    file.write_all(source.as_bytes())
        .and_then(|_| file.flush())
        .map_err(ScorerError::Materialize)?;

    // Close our handle; the path is still deleted when `path` drops.
    let path = file.into_temp_path();
    debug!(path = %path.display(), linter = linter.label(), "running linter");
    linter.analyze(&path)
}

/// The advisory reported in place of a failed linter run.
pub fn failure_advisory(label: &str, err: &ScorerError) -> Advisory {
    Advisory::new(format!("{} error: {}", label, err))
}

/// Outcome of scoring one snippet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Score {
    pub report: String,
    pub rating: Rating,
    pub failure: Option<Advisory>,
}

/// Run the linter and fold failures into an advisory with an empty report.
pub fn score(linter: &dyn Linter, source: &str) -> Score {
    match lint_source(linter, source) {
        Ok(report) => Score {
            rating: extract_rating(&report),
            report,
            failure: None,
        },
        Err(e) => {
            warn!(linter = linter.label(), error = %e, "linter run failed");
            Score {
                report: String::new(),
                rating: Rating::Missing,
                failure: Some(failure_advisory(linter.label(), &e)),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::sync::Mutex;

    /// Records the path it was given and whether the file existed then.
    struct Probe {
        seen: Mutex<Option<(PathBuf, String)>>,
        fail: bool,
    }

    impl Probe {
        fn new(fail: bool) -> Self {
            Self {
                seen: Mutex::new(None),
                fail,
            }
        }
    }

    impl Linter for Probe {
        fn label(&self) -> &str {
            "Probe"
        }

        fn analyze(&self, path: &Path) -> Result<String, ScorerError> {
            let content = std::fs::read_to_string(path).map_err(ScorerError::Materialize)?;
            *self.seen.lock().unwrap() = Some((path.to_path_buf(), content));
            if self.fail {
                return Err(ScorerError::Failed {
                    command: "probe".to_string(),
                    status: "exit status 1".to_string(),
                    detail: "boom".to_string(),
                });
            }
            Ok("Your code has been rated at 8.00/10".to_string())
        }
    }

    #[test]
    fn test_file_exists_only_during_the_call() {
        let probe = Probe::new(false);
        let report = lint_source(&probe, "x = 1\n").unwrap();
        assert_eq!(report, "Your code has been rated at 8.00/10");

        let (path, content) = probe.seen.lock().unwrap().clone().unwrap();
        assert_eq!(content, "x = 1\n");
        assert_eq!(path.extension().and_then(|e| e.to_str()), Some("py"));
        assert!(!path.exists());
    }

    #[test]
    fn test_file_removed_after_failure() {
        let probe = Probe::new(true);
        assert!(lint_source(&probe, "y = 2\n").is_err());
        let (path, _) = probe.seen.lock().unwrap().clone().unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn test_unique_paths() {
        let first = Probe::new(false);
        let second = Probe::new(false);
        lint_source(&first, "a = 1\n").unwrap();
        lint_source(&second, "a = 1\n").unwrap();
        let a = first.seen.lock().unwrap().clone().unwrap().0;
        let b = second.seen.lock().unwrap().clone().unwrap().0;
        assert_ne!(a, b);
    }

    #[test]
    fn test_score_success() {
        let score = score(&Probe::new(false), "x = 1\n");
        assert_eq!(score.rating.as_str(), "8.00/10");
        assert!(score.failure.is_none());
    }

    #[test]
    fn test_score_failure_becomes_advisory() {
        let score = score(&Probe::new(true), "x = 1\n");
        assert!(score.report.is_empty());
        assert_eq!(score.rating, Rating::Missing);
        assert_eq!(
            score.failure.unwrap().as_str(),
            "Probe error: 'probe' failed with exit status 1: boom"
        );
    }
}
