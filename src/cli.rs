//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// inosync - stage Arduino example sketches as C++ test sources
///
/// Copies the `.ino` sketch inside each `examples/<name>/` directory to
/// `test/src/<name>/<name>.cpp`, clearing the destination first.
///
/// Examples:
///   inosync
///   inosync --root ./MyLibrary
///   inosync --examples demos --dest build/src --dry-run
///   inosync --format json --quiet
///   inosync --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Project root that relative paths are resolved against
    #[arg(long, default_value = ".", value_name = "DIR")]
    pub root: PathBuf,

    /// Directory holding one subdirectory per example sketch
    ///
    /// Defaults to `examples` (or the value in .inosync.toml).
    #[arg(long, value_name = "DIR", env = "INOSYNC_EXAMPLES_DIR")]
    pub examples: Option<PathBuf>,

    /// Destination directory, cleared before every run
    ///
    /// Defaults to `test/src` (or the value in .inosync.toml).
    #[arg(long, value_name = "DIR", env = "INOSYNC_DEST_DIR")]
    pub dest: Option<PathBuf>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .inosync.toml in the project root
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Sketch file extension to pick up (without the dot)
    #[arg(long, value_name = "EXT")]
    pub source_ext: Option<String>,

    /// Extension given to the copied files (without the dot)
    #[arg(long, value_name = "EXT")]
    pub target_ext: Option<String>,

    /// Example directory names to skip (comma-separated)
    ///
    /// Example: --exclude "wip,scratch"
    #[arg(long, value_name = "NAMES", value_delimiter = ',')]
    pub exclude: Option<Vec<String>>,

    /// Show what would be copied without touching the filesystem
    #[arg(long)]
    pub dry_run: bool,

    /// Do not clear the destination before copying
    #[arg(long)]
    pub keep_existing: bool,

    /// Format of the summary printed at the end (text, json)
    #[arg(long, default_value = "text", value_name = "FORMAT")]
    pub format: OutputFormat,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Generate a default .inosync.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for the run summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text (default)
    #[default]
    Text,
    /// JSON format
    Json,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        if self.init_config {
            return Ok(());
        }

        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        for ext in [&self.source_ext, &self.target_ext].into_iter().flatten() {
            validate_extension(ext)?;
        }

        if let (Some(src), Some(dst)) = (&self.source_ext, &self.target_ext) {
            if src == dst {
                return Err("Source and target extensions must differ".to_string());
            }
        }

        if !self.root.exists() {
            return Err(format!(
                "Root directory does not exist: {}",
                self.root.display()
            ));
        }
        if !self.root.is_dir() {
            return Err(format!(
                "Root path is not a directory: {}",
                self.root.display()
            ));
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }

    /// Log filter: `--verbose`/`--quiet` win, then `RUST_LOG`, then INFO.
    pub fn env_filter(&self) -> EnvFilter {
        let fallback = || EnvFilter::new(self.log_level().to_string().to_lowercase());
        if self.verbose || self.quiet {
            fallback()
        } else {
            EnvFilter::try_from_default_env().unwrap_or_else(|_| fallback())
        }
    }
}

/// Check that an extension is non-empty and given without its leading dot.
pub fn validate_extension(ext: &str) -> Result<(), String> {
    if ext.is_empty() {
        return Err("Extension must not be empty".to_string());
    }
    if ext.starts_with('.') {
        return Err(format!("Extension '{}' must be given without the dot", ext));
    }
    if ext.contains(['/', '\\']) {
        return Err(format!("Extension '{}' must not contain path separators", ext));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_args() -> Args {
        Args {
            root: PathBuf::from("."),
            examples: None,
            dest: None,
            config: None,
            source_ext: None,
            target_ext: None,
            exclude: None,
            dry_run: false,
            keep_existing: false,
            format: OutputFormat::Text,
            verbose: false,
            quiet: false,
            init_config: false,
        }
    }

    #[test]
    fn test_defaults_validate() {
        assert!(make_args().validate().is_ok());
    }

    #[test]
    fn test_parse_from_command_line() {
        let args = Args::parse_from([
            "inosync",
            "--examples",
            "demos",
            "--exclude",
            "wip,scratch",
            "--format",
            "json",
        ]);
        assert_eq!(args.examples, Some(PathBuf::from("demos")));
        assert_eq!(
            args.exclude,
            Some(vec!["wip".to_string(), "scratch".to_string()])
        );
        assert_eq!(args.format, OutputFormat::Json);
    }

    #[test]
    fn test_validation_conflicting_options() {
        let mut args = make_args();
        args.verbose = true;
        args.quiet = true;
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_extension_with_dot() {
        let mut args = make_args();
        args.source_ext = Some(".ino".to_string());
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_same_extensions() {
        let mut args = make_args();
        args.source_ext = Some("cpp".to_string());
        args.target_ext = Some("cpp".to_string());
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_missing_root() {
        let mut args = make_args();
        args.root = PathBuf::from("/definitely/not/a/real/root");
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_log_level() {
        let mut args = make_args();
        assert_eq!(args.log_level(), tracing::Level::INFO);

        args.verbose = true;
        assert_eq!(args.log_level(), tracing::Level::DEBUG);

        args.verbose = false;
        args.quiet = true;
        assert_eq!(args.log_level(), tracing::Level::ERROR);
    }

    #[test]
    fn test_env_filter_follows_flags() {
        let mut args = make_args();
        args.quiet = true;
        assert_eq!(args.env_filter().to_string(), "error");

        args.quiet = false;
        args.verbose = true;
        assert_eq!(args.env_filter().to_string(), "debug");
    }

    #[test]
    fn test_directory_env_bindings() {
        use clap::CommandFactory;

        let command = Args::command();
        let env_of = |id: &str| {
            command
                .get_arguments()
                .find(|arg| arg.get_id() == id)
                .and_then(|arg| arg.get_env())
                .map(|env| env.to_string_lossy().to_string())
        };

        assert_eq!(env_of("examples").as_deref(), Some("INOSYNC_EXAMPLES_DIR"));
        assert_eq!(env_of("dest").as_deref(), Some("INOSYNC_DEST_DIR"));
        assert_eq!(env_of("root"), None);
    }
}
