//! Command-line interface for pyreview.

use clap::{Parser, Subcommand, ValueEnum};
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::analyze::Analyzer;
use crate::config::{Config, DEFAULT_TEMPLATE};
use crate::detect::{Rule, RuleEngine};
use crate::error::AnalyzeError;
use crate::report;

/// Exit codes.
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_INVALID: i32 = 1;
pub const EXIT_ERROR: i32 = 2;

/// Review a Python snippet: style suggestions plus a linter rating.
///
/// pyreview parses the snippet, runs a fixed battery of style and structure
/// detectors over it and asks an external linter (pylint by default) for a
/// holistic rating. The first suggestion found and the rating are reported.
#[derive(Parser)]
#[command(name = "pyreview")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze a Python file or stdin
    #[command(visible_alias = "check")]
    Analyze(AnalyzeArgs),
    /// Write the default configuration file
    Init(InitArgs),
    /// List the detectors in the order they run
    Rules(RulesArgs),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Pretty,
    Json,
}

/// Arguments for the analyze command.
#[derive(Parser)]
pub struct AnalyzeArgs {
    /// File to analyze; `-` or nothing reads stdin
    pub path: Option<PathBuf>,

    /// Path to config YAML file (default: auto-discover)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "pretty")]
    pub format: Format,

    /// Show every suggestion, not only the first
    #[arg(short, long)]
    pub all: bool,

    /// Skip the external linter
    #[arg(long)]
    pub no_linter: bool,

    /// Linter executable to run instead of the configured one
    #[arg(long, conflicts_with = "no_linter")]
    pub linter_command: Option<String>,
}

/// Arguments for the init command.
#[derive(Parser)]
pub struct InitArgs {
    /// Output file path
    #[arg(short, long, default_value = "pyreview.yaml")]
    pub output: PathBuf,

    /// Overwrite an existing file
    #[arg(long)]
    pub force: bool,
}

/// Arguments for the rules command.
#[derive(Parser)]
pub struct RulesArgs {
    /// Path to config YAML file (default: auto-discover)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

fn read_source(path: Option<&Path>) -> anyhow::Result<(String, String)> {
    match path {
        Some(p) if p != Path::new("-") => {
            let source = std::fs::read_to_string(p)
                .map_err(|e| anyhow::anyhow!("cannot read {}: {}", p.display(), e))?;
            Ok((source, p.display().to_string()))
        }
        _ => {
            let mut source = String::new();
            std::io::stdin().read_to_string(&mut source)?;
            Ok((source, "<stdin>".to_string()))
        }
    }
}

/// Merge command-line overrides into a loaded configuration.
pub fn apply_overrides(config: &mut Config, args: &AnalyzeArgs) {
    if args.no_linter {
        config.linter.enabled = false;
    }
    if let Some(command) = &args.linter_command {
        config.linter.enabled = true;
        config.linter.command = command.clone();
    }
}

fn load_config(explicit: Option<&Path>) -> anyhow::Result<Config> {
    let cwd = std::env::current_dir()?;
    let (config, path) = Config::load(explicit, &cwd)?;
    match path {
        Some(p) => tracing::debug!(path = %p.display(), "loaded config"),
        None => tracing::debug!("no config file found, using defaults"),
    }
    Ok(config)
}

/// Run the analyze command.
pub fn run_analyze(args: &AnalyzeArgs, verbose: bool) -> anyhow::Result<i32> {
    let mut config = load_config(args.config.as_deref())?;
    apply_overrides(&mut config, args);
    crate::config::validate(&config)?;

    let (source, label) = read_source(args.path.as_deref())?;
    let analyzer = Analyzer::from_config(&config);

    let report = match analyzer.analyze_report(&source) {
        Ok(report) => report,
        Err(AnalyzeError::SyntaxInvalid) => {
            eprintln!("{}", AnalyzeError::SyntaxInvalid);
            return Ok(EXIT_INVALID);
        }
        Err(e) => return Err(e.into()),
    };

    match args.format {
        Format::Json => report::write_json(&report, args.all)?,
        Format::Pretty => report::write_pretty(&label, &report, args.all, verbose),
    }

    Ok(EXIT_SUCCESS)
}

/// Run the init command.
pub fn run_init(args: &InitArgs) -> anyhow::Result<i32> {
    // Check if output already exists
    if args.output.exists() && !args.force {
        eprintln!("Error: file already exists: {}", args.output.display());
        eprintln!("Remove it, pass --force, or use --output to specify a different path");
        return Ok(EXIT_ERROR);
    }

    // Create output directory if needed
    if let Some(parent) = args.output.parent() {
        if !parent.as_os_str().is_empty() && parent != Path::new(".") {
            if let Err(e) = std::fs::create_dir_all(parent) {
                eprintln!("Error: failed to create directory: {}", e);
                return Ok(EXIT_ERROR);
            }
        }
    }

    if let Err(e) = std::fs::write(&args.output, DEFAULT_TEMPLATE) {
        eprintln!("Error: failed to write config: {}", e);
        return Ok(EXIT_ERROR);
    }

    println!("Created {}", args.output.display());
    println!();
    println!("Next steps:");
    println!("  1. Edit {} to tune thresholds and the linter", args.output.display());
    println!("  2. Run: pyreview analyze snippet.py");

    Ok(EXIT_SUCCESS)
}

/// Run the rules command.
pub fn run_rules(args: &RulesArgs) -> anyhow::Result<i32> {
    let config = load_config(args.config.as_deref())?;
    let enabled = RuleEngine::from_config(&config).rules();

    println!("Detectors (in order):");
    println!();
    for rule in Rule::ALL {
        let name = if enabled.contains(&rule) {
            rule.as_str().to_string()
        } else {
            format!("{} (disabled)", rule.as_str())
        };
        println!("  {:<38} {}", name, rule.description());
    }

    Ok(EXIT_SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("pyreview").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_analyze_defaults() {
        let cli = parse(&["analyze"]);
        assert!(!cli.verbose);
        let Commands::Analyze(args) = cli.command else {
            panic!("expected analyze");
        };
        assert!(args.path.is_none());
        assert_eq!(args.format, Format::Pretty);
        assert!(!args.all);
        assert!(!args.no_linter);
    }

    #[test]
    fn test_analyze_flags() {
        let cli = parse(&[
            "analyze",
            "snippet.py",
            "--format",
            "json",
            "--all",
            "--linter-command",
            "/usr/bin/pylint",
            "--verbose",
        ]);
        assert!(cli.verbose);
        let Commands::Analyze(args) = cli.command else {
            panic!("expected analyze");
        };
        assert_eq!(args.path, Some(PathBuf::from("snippet.py")));
        assert_eq!(args.format, Format::Json);
        assert!(args.all);

        let mut config = Config::default();
        config.linter.enabled = false;
        apply_overrides(&mut config, &args);
        assert!(config.linter.enabled);
        assert_eq!(config.linter.command, "/usr/bin/pylint");
    }

    #[test]
    fn test_no_linter_override() {
        let Commands::Analyze(args) = parse(&["check", "-", "--no-linter"]).command else {
            panic!("expected analyze");
        };
        let mut config = Config::default();
        apply_overrides(&mut config, &args);
        assert!(!config.linter.enabled);
    }

    #[test]
    fn test_conflicting_linter_flags() {
        let result = Cli::try_parse_from([
            "pyreview",
            "analyze",
            "--no-linter",
            "--linter-command",
            "pylint",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_bad_format_is_rejected() {
        assert!(Cli::try_parse_from(["pyreview", "analyze", "--format", "sarif"]).is_err());
    }

    #[test]
    fn test_read_source_from_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("snippet.py");
        std::fs::write(&path, "x = 1\n").unwrap();
        let (source, label) = read_source(Some(path.as_path())).unwrap();
        assert_eq!(source, "x = 1\n");
        assert!(label.ends_with("snippet.py"));

        assert!(read_source(Some(temp.path().join("missing.py").as_path())).is_err());
    }

    #[test]
    fn test_init_writes_template() {
        let temp = TempDir::new().unwrap();
        let output = temp.path().join("conf").join("pyreview.yaml");
        let args = InitArgs {
            output: output.clone(),
            force: false,
        };
        assert_eq!(run_init(&args).unwrap(), EXIT_SUCCESS);
        assert_eq!(std::fs::read_to_string(&output).unwrap(), DEFAULT_TEMPLATE);

        // A second run refuses to clobber the file.
        assert_eq!(run_init(&args).unwrap(), EXIT_ERROR);

        let forced = InitArgs {
            output,
            force: true,
        };
        assert_eq!(run_init(&forced).unwrap(), EXIT_SUCCESS);
    }
}
