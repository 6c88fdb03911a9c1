//! Rule engine: one traversal, every detector, fixed order.

use tracing::debug;

use crate::config::Config;
use crate::parser::SyntaxTree;

use super::rules::{detectors, Detector};
use super::{Advisory, Rule};

/// Applies an ordered detector battery to a syntax tree.
pub struct RuleEngine {
    detectors: Vec<Box<dyn Detector>>,
}

impl RuleEngine {
    /// Create an engine from an explicit detector list. Registration order
    /// is the order advisories are emitted for a node.
    pub fn new(detectors: Vec<Box<dyn Detector>>) -> Self {
        Self { detectors }
    }

    /// The built-in battery configured from `config`.
    pub fn from_config(config: &Config) -> Self {
        Self::new(detectors(config))
    }

    /// Rules that will run, in order.
    pub fn rules(&self) -> Vec<Rule> {
        self.detectors.iter().map(|d| d.rule()).collect()
    }

    /// Walk the tree breadth-first and collect every advisory, duplicates
    /// included.
    pub fn run(&self, tree: &SyntaxTree) -> Vec<Advisory> {
        let mut advisories = Vec::new();
        for id in tree.breadth_first() {
            for detector in &self.detectors {
                detector.check(tree, id, &mut advisories);
            }
        }
        debug!(
            nodes = tree.len(),
            advisories = advisories.len(),
            "rule engine finished"
        );
        advisories
    }
}

impl Default for RuleEngine {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}
