//! Configuration schema for pyreview.
//!
//! A configuration file tunes detector thresholds, disables rules and
//! describes how to invoke the external linter. Every field is optional;
//! an absent file means the defaults below.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::detect::Rule;

/// File names searched for in the working directory.
pub const DEFAULT_CONFIG_NAMES: &[&str] = &["pyreview.yaml", ".pyreview.yaml"];

/// The template written by `pyreview init`.
pub const DEFAULT_TEMPLATE: &str = include_str!("templates/default.yaml");

/// Schema version written by `pyreview init`.
pub const CONFIG_VERSION: &str = "1";

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    /// Schema version; empty means the current one.
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub thresholds: Thresholds,
    /// Rules that should not run. Order of the remaining rules is unchanged.
    #[serde(default)]
    pub disabled_rules: Vec<Rule>,
    #[serde(default)]
    pub linter: LinterConfig,
}

impl Config {
    /// Parse a configuration from a YAML file.
    pub fn parse_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: Config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Load `explicit` if given, otherwise the first discovered file in
    /// `dir`, otherwise the defaults. Returns the path that was used.
    pub fn load(explicit: Option<&Path>, dir: &Path) -> anyhow::Result<(Self, Option<PathBuf>)> {
        let path = match explicit {
            Some(p) => Some(p.to_path_buf()),
            None => discover(dir),
        };

        let config = match &path {
            Some(p) => Self::parse_file(p)
                .map_err(|e| anyhow::anyhow!("error parsing config {}: {}", p.display(), e))?,
            None => Self::default(),
        };
        validate(&config)?;
        Ok((config, path))
    }

    pub fn is_rule_enabled(&self, rule: Rule) -> bool {
        !self.disabled_rules.contains(&rule)
    }
}

/// Detector limits. A value is the largest count that does not trigger.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Thresholds {
    #[serde(default = "default_max_body_statements")]
    pub max_body_statements: usize,
    #[serde(default = "default_max_parameters")]
    pub max_parameters: usize,
    #[serde(default = "default_max_nesting_depth")]
    pub max_nesting_depth: usize,
}

fn default_max_body_statements() -> usize {
    20
}

fn default_max_parameters() -> usize {
    5
}

fn default_max_nesting_depth() -> usize {
    3
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            max_body_statements: default_max_body_statements(),
            max_parameters: default_max_parameters(),
            max_nesting_depth: default_max_nesting_depth(),
        }
    }
}

/// How to run the external linter.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LinterConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_command")]
    pub command: String,
    /// Arguments placed before the snippet path.
    #[serde(default = "default_args")]
    pub args: Vec<String>,
    /// Name used in failure advisories ("Pylint error: ...").
    #[serde(default = "default_label")]
    pub label: String,
    /// Kill the linter after this many seconds. No limit when unset.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

fn default_true() -> bool {
    true
}

fn default_command() -> String {
    "pylint".to_string()
}

fn default_args() -> Vec<String> {
    // Stats files would leak state between calls.
    vec!["--persistent=n".to_string()]
}

fn default_label() -> String {
    "Pylint".to_string()
}

impl Default for LinterConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            command: default_command(),
            args: default_args(),
            label: default_label(),
            timeout_secs: None,
        }
    }
}

/// Find a configuration file in `dir`.
pub fn discover(dir: &Path) -> Option<PathBuf> {
    DEFAULT_CONFIG_NAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.is_file())
}

/// Validate a configuration.
pub fn validate(config: &Config) -> anyhow::Result<()> {
    if !config.version.is_empty() && config.version != CONFIG_VERSION {
        anyhow::bail!(
            "unsupported config version {:?} (expected {:?})",
            config.version,
            CONFIG_VERSION
        );
    }

    let t = &config.thresholds;
    if t.max_body_statements == 0 {
        anyhow::bail!("thresholds.max_body_statements must be at least 1");
    }
    if t.max_parameters == 0 {
        anyhow::bail!("thresholds.max_parameters must be at least 1");
    }
    if t.max_nesting_depth == 0 {
        anyhow::bail!("thresholds.max_nesting_depth must be at least 1");
    }

    if config.linter.enabled {
        if config.linter.command.trim().is_empty() {
            anyhow::bail!("linter.command must not be empty");
        }
        if config.linter.timeout_secs == Some(0) {
            anyhow::bail!("linter.timeout_secs must be positive; omit it to disable the timeout");
        }
    }

    Ok(())
}
