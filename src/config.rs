//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.inosync.toml` files.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// File name looked up in the project root.
pub const CONFIG_FILE_NAME: &str = ".inosync.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Directory layout.
    #[serde(default)]
    pub paths: PathsConfig,

    /// Sketch file naming.
    #[serde(default)]
    pub sketch: SketchConfig,

    /// Sync behavior.
    #[serde(default)]
    pub sync: SyncConfig,
}

/// Source and destination directories, relative to the project root.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Directory holding one subdirectory per example.
    #[serde(default = "default_examples_dir")]
    pub examples_dir: PathBuf,

    /// Directory the renamed sketches are written to.
    #[serde(default = "default_dest_dir")]
    pub dest_dir: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            examples_dir: default_examples_dir(),
            dest_dir: default_dest_dir(),
        }
    }
}

fn default_examples_dir() -> PathBuf {
    PathBuf::from("examples")
}

fn default_dest_dir() -> PathBuf {
    PathBuf::from("test/src")
}

/// Sketch extension settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SketchConfig {
    /// Extension of the sketch files to pick up.
    #[serde(default = "default_source_extension")]
    pub source_extension: String,

    /// Extension given to the copies.
    #[serde(default = "default_target_extension")]
    pub target_extension: String,
}

impl Default for SketchConfig {
    fn default() -> Self {
        Self {
            source_extension: default_source_extension(),
            target_extension: default_target_extension(),
        }
    }
}

fn default_source_extension() -> String {
    "ino".to_string()
}

fn default_target_extension() -> String {
    "cpp".to_string()
}

/// Sync settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Clear the destination before copying.
    #[serde(default = "default_true")]
    pub clean_destination: bool,

    /// Example directory names to skip.
    #[serde(default)]
    pub excludes: Vec<String>,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            clean_destination: true,
            excludes: Vec::new(),
        }
    }
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from a project root.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_from_root(root: &Path) -> Result<Option<Self>> {
        let config_path = root.join(CONFIG_FILE_NAME);

        if config_path.exists() {
            Ok(Some(Self::load(&config_path)?))
        } else {
            Ok(None)
        }
    }

    /// Pick the configuration for a run.
    ///
    /// An explicit `--config` (relative to `--root`) wins over
    /// `<root>/.inosync.toml`; with neither, the defaults apply. CLI values
    /// are merged on top and the result is validated.
    pub fn resolve(args: &crate::cli::Args) -> Result<Self> {
        let mut config = if let Some(ref config_path) = args.config {
            let path = args.root.join(config_path);
            info!("Loading config from: {}", path.display());
            Self::load(&path)?
        } else {
            match Self::load_from_root(&args.root)? {
                Some(config) => {
                    info!("Loaded config from {}", CONFIG_FILE_NAME);
                    config
                }
                None => {
                    debug!("No config file found, using defaults");
                    Config::default()
                }
            }
        };

        config.merge_with_args(args);
        config.validate()?;
        Ok(config)
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// Only values given on the command line (or via env) override the file.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref examples) = args.examples {
            self.paths.examples_dir = examples.clone();
        }
        if let Some(ref dest) = args.dest {
            self.paths.dest_dir = dest.clone();
        }

        if let Some(ref ext) = args.source_ext {
            self.sketch.source_extension = ext.clone();
        }
        if let Some(ref ext) = args.target_ext {
            self.sketch.target_extension = ext.clone();
        }

        if let Some(ref excludes) = args.exclude {
            self.sync.excludes = excludes.clone();
        }

        if args.keep_existing {
            self.sync.clean_destination = false;
        }
    }

    /// Check values that may have come from a hand-edited file.
    pub fn validate(&self) -> Result<(), crate::error::SyncError> {
        use crate::error::SyncError;

        crate::cli::validate_extension(&self.sketch.source_extension).map_err(SyncError::Config)?;
        crate::cli::validate_extension(&self.sketch.target_extension).map_err(SyncError::Config)?;
        if self.sketch.source_extension == self.sketch.target_extension {
            return Err(SyncError::Config(
                "source_extension and target_extension must differ".to_string(),
            ));
        }
        Ok(())
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}
