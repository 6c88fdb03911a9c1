//! Pylint (or any command speaking its exit-code protocol) as a `Linter`.

use std::path::Path;
use std::process::{Output, Stdio};
use std::time::Duration;

use tokio::process::Command;
use tracing::debug;

use crate::config::LinterConfig;

use super::{Linter, ScorerError};

/// Exit-status bits that mean the run itself failed. The remaining bits
/// (2, 4, 8, 16) only report message categories.
const FATAL: i32 = 1;
const USAGE_ERROR: i32 = 32;

/// Runs an external linter process against a file path.
#[derive(Debug, Clone)]
pub struct PylintLinter {
    command: String,
    args: Vec<String>,
    label: String,
    timeout: Option<Duration>,
}

impl PylintLinter {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            args: Vec::new(),
            label: "Pylint".to_string(),
            timeout: None,
        }
    }

    pub fn from_config(config: &LinterConfig) -> Self {
        Self {
            command: config.command.clone(),
            args: config.args.clone(),
            label: config.label.clone(),
            timeout: config.timeout_secs.map(Duration::from_secs),
        }
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    fn run(&self, path: &Path) -> Result<Output, ScorerError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(ScorerError::Runtime)?;

        runtime.block_on(async {
            let mut command = Command::new(&self.command);
            command
                .args(&self.args)
                .arg(path)
                .stdin(Stdio::null())
                .kill_on_drop(true);

            let output = command.output();
            let result = match self.timeout {
                Some(limit) => tokio::time::timeout(limit, output).await.map_err(|_| {
                    ScorerError::TimedOut {
                        command: self.command.clone(),
                        timeout: limit,
                    }
                })?,
                None => output.await,
            };
            result.map_err(|source| ScorerError::Spawn {
                command: self.command.clone(),
                source,
            })
        })
    }

    fn check_status(&self, output: &Output) -> Result<(), ScorerError> {
        let status = match output.status.code() {
            Some(code) if code & (FATAL | USAGE_ERROR) == 0 => return Ok(()),
            Some(code) => format!("exit status {}", code),
            None => "terminated by signal".to_string(),
        };
        Err(ScorerError::Failed {
            command: self.command.clone(),
            status,
            detail: stderr_summary(&output.stderr),
        })
    }
}

impl Default for PylintLinter {
    fn default() -> Self {
        Self::from_config(&LinterConfig::default())
    }
}

impl Linter for PylintLinter {
    fn label(&self) -> &str {
        &self.label
    }

    fn analyze(&self, path: &Path) -> Result<String, ScorerError> {
        let output = self.run(path)?;
        debug!(
            command = %self.command,
            status = ?output.status.code(),
            stdout_bytes = output.stdout.len(),
            "linter finished"
        );
        self.check_status(&output)?;
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Last non-empty stderr line, which is where Python puts the exception.
fn stderr_summary(stderr: &[u8]) -> String {
    String::from_utf8_lossy(stderr)
        .lines()
        .rev()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or("no error output")
        .to_string()
}
