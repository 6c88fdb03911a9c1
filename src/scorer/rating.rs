//! Rating extraction from linter reports.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Reported when the linter output carries no rating line.
pub const NO_RATING: &str = "No rating found.";

static RATING_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Your code has been rated at (-?[0-9.]+/10)").unwrap());

/// A `"N.NN/10"` rating, or the absence of one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Rating {
    Score(String),
    Missing,
}

impl Rating {
    /// The rating text, or `NO_RATING`.
    pub fn as_str(&self) -> &str {
        match self {
            Rating::Score(s) => s,
            Rating::Missing => NO_RATING,
        }
    }

    /// The numeric score out of ten, when there is one.
    pub fn value(&self) -> Option<f64> {
        match self {
            Rating::Score(s) => s.strip_suffix("/10")?.parse().ok(),
            Rating::Missing => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Rating::Missing)
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Rating> for String {
    fn from(rating: Rating) -> Self {
        match rating {
            Rating::Score(s) => s,
            Rating::Missing => NO_RATING.to_string(),
        }
    }
}

impl From<String> for Rating {
    fn from(s: String) -> Self {
        if s == NO_RATING {
            Rating::Missing
        } else {
            Rating::Score(s)
        }
    }
}

/// Pull the first rating out of a linter report.
pub fn extract_rating(report: &str) -> Rating {
    RATING_PATTERN
        .captures(report)
        .and_then(|caps| caps.get(1))
        .map(|m| Rating::Score(m.as_str().to_string()))
        .unwrap_or(Rating::Missing)
}
