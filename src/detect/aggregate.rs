//! Ordered, deduplicated suggestion pool.

use indexmap::IndexSet;

use super::Advisory;

/// Surfaced when no detector fired.
pub const NO_SUGGESTION: &str = "No suggestion found.";

/// Advisories with exact-text duplicates removed, first occurrence kept.
#[derive(Debug, Clone, Default)]
pub struct Suggestions {
    items: IndexSet<Advisory>,
}

impl Suggestions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an advisory; a repeat of an existing one is dropped.
    pub fn push(&mut self, advisory: Advisory) -> bool {
        self.items.insert(advisory)
    }

    /// The first-found suggestion, or `NO_SUGGESTION`.
    pub fn top(&self) -> &str {
        self.items
            .first()
            .map(Advisory::as_str)
            .unwrap_or(NO_SUGGESTION)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Advisory> {
        self.items.iter()
    }

    pub fn into_vec(self) -> Vec<Advisory> {
        self.items.into_iter().collect()
    }
}

impl FromIterator<Advisory> for Suggestions {
    fn from_iter<I: IntoIterator<Item = Advisory>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

impl Extend<Advisory> for Suggestions {
    fn extend<I: IntoIterator<Item = Advisory>>(&mut self, iter: I) {
        self.items.extend(iter);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool(items: &[&str]) -> Suggestions {
        items.iter().copied().map(Advisory::from).collect()
    }

    #[test]
    fn test_empty_pool_has_fallback() {
        let suggestions = Suggestions::new();
        assert!(suggestions.is_empty());
        assert_eq!(suggestions.top(), NO_SUGGESTION);
    }

    #[test]
    fn test_dedup_keeps_first_position() {
        let suggestions = pool(&["b", "a", "b", "c", "a"]);
        let order: Vec<&str> = suggestions.iter().map(Advisory::as_str).collect();
        assert_eq!(order, vec!["b", "a", "c"]);
        assert_eq!(suggestions.top(), "b");
    }

    #[test]
    fn test_push_reports_novelty() {
        let mut suggestions = pool(&["a"]);
        assert!(!suggestions.push(Advisory::from("a")));
        assert!(suggestions.push(Advisory::from("Pylint error: boom")));
        assert_eq!(suggestions.len(), 2);
        assert_eq!(
            suggestions.into_vec().last().map(Advisory::as_str),
            Some("Pylint error: boom")
        );
    }

    #[test]
    fn test_dedup_is_exact_text() {
        let suggestions = pool(&["Trailing.", "Trailing. ", "trailing."]);
        assert_eq!(suggestions.len(), 3);
    }
}
