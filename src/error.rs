//! Errors surfaced by an analysis call.

use thiserror::Error;

/// Message shown to the submitter when the snippet does not parse.
pub const INVALID_SOURCE_MESSAGE: &str = "Invalid Python code. Please enter valid code.";

/// Terminal failures of [`crate::Analyzer::analyze`].
///
/// Linter failures are not listed here: they are recovered into an
/// advisory and never abort a call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalyzeError {
    /// The snippet is not valid Python source.
    #[error("Invalid Python code. Please enter valid code.")]
    SyntaxInvalid,
    /// The embedded grammar could not be loaded.
    #[error("python parser unavailable: {0}")]
    ParserUnavailable(String),
}

impl AnalyzeError {
    /// Whether the caller is at fault (a client error rather than ours).
    pub fn is_client_error(&self) -> bool {
        matches!(self, AnalyzeError::SyntaxInvalid)
    }
}
