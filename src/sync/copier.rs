//! Planning and copying of sketch files.

use crate::error::{SyncError, SyncResult};
use crate::models::{CopiedSketch, Example, SketchFile, SyncMetadata, SyncPlan, SyncReport};
use crate::scanner::SketchScanner;
use crate::sync::cleaner::{clean_destination, ensure_destination_root};
use chrono::Utc;
use indicatif::{ProgressBar, ProgressStyle};
use std::ffi::{OsStr, OsString};
use std::fs;
use std::path::{Component, Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Options for one sync run. Paths are already resolved against the root.
#[derive(Debug, Clone)]
pub struct SyncOptions {
    pub root: PathBuf,
    pub examples_dir: PathBuf,
    pub dest_dir: PathBuf,
    /// Extension of written files, without the dot.
    pub target_extension: String,
    pub clean_destination: bool,
    pub dry_run: bool,
    pub show_progress: bool,
}

/// Build the copy plan for the given examples.
///
/// Each example gets a destination directory. When an example holds more
/// than one sketch, `<name>.<ext>` wins if present, otherwise the last one
/// in name order does.
pub fn plan(
    examples: &[Example],
    scanner: &SketchScanner,
    dest_dir: &Path,
    target_extension: &str,
) -> SyncResult<SyncPlan> {
    let mut plan = SyncPlan::default();

    for example in examples {
        let display_name = example.name.to_string_lossy().to_string();
        let dest_subdir = dest_dir.join(&example.name);
        plan.directories.push(dest_subdir.clone());

        let mut sketches = scanner.sketches_in(example)?;
        if sketches.is_empty() {
            debug!("No sketch in example {}", display_name);
            plan.empty_examples.push(display_name);
            continue;
        }

        let primary = file_name_with_extension(&example.name, scanner.source_extension());
        let chosen_idx = sketches
            .iter()
            .position(|p| p.file_name() == Some(primary.as_os_str()))
            .unwrap_or(sketches.len() - 1);
        let source = sketches.remove(chosen_idx);

        for skipped in &sketches {
            warn!(
                "Example {} has more than one sketch; skipping {}",
                display_name,
                skipped.display()
            );
        }
        plan.skipped_duplicates.extend(sketches);

        plan.sketches.push(SketchFile {
            example: display_name,
            source,
            destination: dest_subdir
                .join(file_name_with_extension(&example.name, target_extension)),
        });
    }

    Ok(plan)
}

/// `<stem>.<ext>` without any lossy conversion of the stem.
fn file_name_with_extension(stem: &OsStr, extension: &str) -> OsString {
    let mut name = stem.to_os_string();
    name.push(".");
    name.push(extension);
    name
}

/// Scan, clean and copy. Returns a report of what was done.
///
/// Nothing under the destination is touched until the examples directory
/// has been validated and checked for overlap with the destination.
pub fn execute(scanner: &SketchScanner, options: &SyncOptions) -> SyncResult<SyncReport> {
    let started_at = Utc::now();
    let start_time = Instant::now();

    check_overlap(&options.examples_dir, &options.dest_dir)?;

    let examples = scanner.scan(&options.examples_dir)?;
    let plan = plan(
        &examples,
        scanner,
        &options.dest_dir,
        &options.target_extension,
    )?;
    info!(
        "Planned {} sketch copies from {} examples",
        plan.sketches.len(),
        examples.len()
    );

    let (cleared_entries, copied) = if options.dry_run {
        (0, preview(&plan)?)
    } else {
        apply(&plan, options)?
    };

    Ok(SyncReport {
        metadata: SyncMetadata {
            root: options.root.clone(),
            examples_dir: options.examples_dir.clone(),
            dest_dir: options.dest_dir.clone(),
            started_at,
            duration_seconds: start_time.elapsed().as_secs_f64(),
            dry_run: options.dry_run,
        },
        cleared_entries,
        copied,
        empty_examples: plan.empty_examples,
        skipped_duplicates: plan.skipped_duplicates,
    })
}

fn preview(plan: &SyncPlan) -> SyncResult<Vec<CopiedSketch>> {
    plan.sketches
        .iter()
        .map(|sketch| -> SyncResult<CopiedSketch> {
            let bytes = fs::metadata(&sketch.source)
                .map_err(|e| SyncError::io(&sketch.source, e))?
                .len();
            info!(
                "Would copy {} -> {}",
                sketch.source.display(),
                sketch.destination.display()
            );
            Ok(CopiedSketch {
                source: sketch.source.clone(),
                destination: sketch.destination.clone(),
                bytes,
            })
        })
        .collect()
}

fn apply(plan: &SyncPlan, options: &SyncOptions) -> SyncResult<(usize, Vec<CopiedSketch>)> {
    let cleared = if options.clean_destination {
        let n = clean_destination(&options.dest_dir)?;
        info!("Cleared {} entries from {}", n, options.dest_dir.display());
        n
    } else {
        ensure_destination_root(&options.dest_dir)?;
        0
    };

    for dir in &plan.directories {
        fs::create_dir_all(dir).map_err(|e| SyncError::io(dir, e))?;
    }

    let progress_bar = if options.show_progress && !plan.is_empty() {
        let pb = ProgressBar::new(plan.sketches.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );
        Some(pb)
    } else {
        None
    };

    let mut copied = Vec::with_capacity(plan.sketches.len());
    for sketch in &plan.sketches {
        if let Some(ref pb) = progress_bar {
            pb.set_message(sketch.example.clone());
        }

        let bytes = fs::copy(&sketch.source, &sketch.destination)
            .map_err(|e| SyncError::io(&sketch.destination, e))?;

        let line = format!(
            "Copied {} -> {}",
            sketch.source.display(),
            sketch.destination.display()
        );
        match progress_bar {
            Some(ref pb) => pb.suspend(|| info!("{}", line)),
            None => info!("{}", line),
        }

        copied.push(CopiedSketch {
            source: sketch.source.clone(),
            destination: sketch.destination.clone(),
            bytes,
        });

        if let Some(ref pb) = progress_bar {
            pb.inc(1);
        }
    }

    if let Some(pb) = progress_bar {
        pb.finish_and_clear();
    }

    Ok((cleared, copied))
}

/// Refuse runs where clearing the destination could delete example sources.
pub fn check_overlap(examples_dir: &Path, dest_dir: &Path) -> SyncResult<()> {
    let examples = resolve(examples_dir);
    let dest = resolve(dest_dir);

    if examples.starts_with(&dest) || dest.starts_with(&examples) {
        return Err(SyncError::Overlap {
            examples: examples_dir.to_path_buf(),
            dest: dest_dir.to_path_buf(),
        });
    }
    Ok(())
}

/// Canonicalize the longest existing prefix and append the rest.
fn resolve(path: &Path) -> PathBuf {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .map(|cwd| cwd.join(path))
            .unwrap_or_else(|_| path.to_path_buf())
    };

    // Fold `..` first so the prefix walk below only sees plain names
    let mut normalized = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::ParentDir => {
                normalized.pop();
            }
            Component::CurDir => {}
            other => normalized.push(other),
        }
    }

    let mut existing = normalized.as_path();
    let mut rest = Vec::new();
    let mut resolved = loop {
        if let Ok(canonical) = fs::canonicalize(existing) {
            break canonical;
        }
        match (existing.parent(), existing.file_name()) {
            (Some(parent), Some(name)) => {
                rest.push(name.to_os_string());
                existing = parent;
            }
            _ => break existing.to_path_buf(),
        }
    };

    for name in rest.into_iter().rev() {
        resolved.push(name);
    }
    resolved
}
