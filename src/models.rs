//! Data models for sketch syncing.
//!
//! This module contains the structures passed between the scanner,
//! the sync step and the report generator.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::path::PathBuf;

/// One example directory below the examples root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Example {
    /// Directory name, reused byte-for-byte as the output file stem.
    pub name: OsString,
    /// Full path of the example directory.
    pub path: PathBuf,
}

/// A sketch scheduled to be copied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SketchFile {
    /// Display name of the example the sketch belongs to.
    pub example: String,
    /// Source `.ino` path.
    pub source: PathBuf,
    /// Destination `<dest>/<example>/<example>.cpp` path.
    pub destination: PathBuf,
}

/// Ordered list of work for one run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SyncPlan {
    /// Destination subdirectories to create, one per example.
    pub directories: Vec<PathBuf>,
    /// Sketches to copy.
    pub sketches: Vec<SketchFile>,
    /// Examples without any sketch file.
    pub empty_examples: Vec<String>,
    /// Extra sketches that lost to the chosen one in their example.
    pub skipped_duplicates: Vec<PathBuf>,
}

impl SyncPlan {
    /// True when there is nothing to copy.
    pub fn is_empty(&self) -> bool {
        self.sketches.is_empty()
    }
}

/// A sketch that was (or in dry-run mode would be) copied.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CopiedSketch {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub bytes: u64,
}

/// Metadata about a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncMetadata {
    /// Project root.
    pub root: PathBuf,
    /// Examples directory scanned.
    pub examples_dir: PathBuf,
    /// Destination directory written.
    pub dest_dir: PathBuf,
    /// When the run started.
    pub started_at: DateTime<Utc>,
    /// Wall-clock duration.
    pub duration_seconds: f64,
    /// Whether the filesystem was left untouched.
    pub dry_run: bool,
}

/// Outcome of a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncReport {
    pub metadata: SyncMetadata,
    /// Top-level destination entries removed before copying.
    pub cleared_entries: usize,
    pub copied: Vec<CopiedSketch>,
    pub empty_examples: Vec<String>,
    pub skipped_duplicates: Vec<PathBuf>,
}

impl SyncReport {
    /// Total bytes copied.
    pub fn total_bytes(&self) -> u64 {
        self.copied.iter().map(|c| c.bytes).sum()
    }
}
