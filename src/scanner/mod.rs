//! Example discovery.
//!
//! Finds the example directories directly below the examples root and the
//! sketch files directly inside each of them. Nothing deeper is visited.

use crate::error::{SyncError, SyncResult};
use crate::models::Example;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// Configuration for example scanning.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Sketch extension without the dot (e.g. "ino")
    pub source_extension: String,
    /// Example directory names to skip
    pub excludes: Vec<String>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            source_extension: "ino".to_string(),
            excludes: Vec::new(),
        }
    }
}

impl From<&crate::config::Config> for ScanConfig {
    fn from(config: &crate::config::Config) -> Self {
        Self {
            source_extension: config.sketch.source_extension.clone(),
            excludes: config.sync.excludes.clone(),
        }
    }
}

/// Scanner over an examples tree.
pub struct SketchScanner {
    config: ScanConfig,
}

impl SketchScanner {
    pub fn new(config: ScanConfig) -> Self {
        Self { config }
    }

    pub fn source_extension(&self) -> &str {
        &self.config.source_extension
    }

    /// List example directories, sorted by name.
    pub fn scan(&self, examples_dir: &Path) -> SyncResult<Vec<Example>> {
        check_examples_dir(examples_dir)?;

        let mut examples = Vec::new();
        for entry in immediate_children(examples_dir) {
            let entry = entry.map_err(|e| walk_error(examples_dir, e))?;

            // Follows symlinks, like a plain is_dir check would
            if !entry.path().is_dir() {
                continue;
            }

            // Kept as raw OsString so non-UTF-8 names survive into the destination
            let name = entry.file_name().to_os_string();
            if self.is_excluded(&name) {
                debug!("Skipping excluded example: {}", name.to_string_lossy());
                continue;
            }

            examples.push(Example {
                name,
                path: entry.path().to_path_buf(),
            });
        }

        debug!(
            "Found {} example directories in {}",
            examples.len(),
            examples_dir.display()
        );
        Ok(examples)
    }

    /// Sketch files directly inside an example, sorted by name.
    pub fn sketches_in(&self, example: &Example) -> SyncResult<Vec<PathBuf>> {
        let suffix = format!(".{}", self.config.source_extension);
        let mut sketches = Vec::new();

        for entry in immediate_children(&example.path) {
            let entry = entry.map_err(|e| walk_error(&example.path, e))?;

            if !entry.path().is_file() {
                continue;
            }

            if entry.file_name().to_string_lossy().ends_with(&suffix) {
                sketches.push(entry.path().to_path_buf());
            }
        }

        Ok(sketches)
    }

    fn is_excluded(&self, name: &OsStr) -> bool {
        self.config
            .excludes
            .iter()
            .any(|pattern| name == pattern.as_str())
    }
}

/// Fail unless `examples_dir` is an existing directory.
pub fn check_examples_dir(examples_dir: &Path) -> SyncResult<()> {
    if !examples_dir.exists() {
        return Err(SyncError::ExamplesDirMissing(examples_dir.to_path_buf()));
    }
    if !examples_dir.is_dir() {
        return Err(SyncError::NotADirectory(examples_dir.to_path_buf()));
    }
    Ok(())
}

fn immediate_children(dir: &Path) -> walkdir::IntoIter {
    WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
}

fn walk_error(dir: &Path, err: walkdir::Error) -> SyncError {
    let path = err.path().unwrap_or(dir).to_path_buf();
    let source = err
        .into_io_error()
        .unwrap_or_else(|| std::io::Error::other("filesystem loop"));
    SyncError::io(path, source)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn make_tree() -> TempDir {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::create_dir_all(root.join("blink")).unwrap();
        fs::write(root.join("blink/blink.ino"), "void setup() {}").unwrap();
        fs::write(root.join("blink/notes.txt"), "readme").unwrap();
        fs::create_dir_all(root.join("wifi")).unwrap();
        fs::write(root.join("wifi/wifi.ino"), "void loop() {}").unwrap();
        fs::create_dir_all(root.join("empty")).unwrap();
        fs::write(root.join("README.md"), "top-level file").unwrap();
        temp_dir
    }

    fn example(root: &Path, name: &str) -> Example {
        Example {
            name: name.into(),
            path: root.join(name),
        }
    }

    #[test]
    fn test_scan_lists_directories_sorted() {
        let temp_dir = make_tree();
        let scanner = SketchScanner::new(ScanConfig::default());

        let examples = scanner.scan(temp_dir.path()).unwrap();
        let names: Vec<_> = examples.iter().map(|e| e.name.to_str().unwrap()).collect();

        assert_eq!(names, vec!["blink", "empty", "wifi"]);
    }

    #[test]
    fn test_scan_respects_excludes() {
        let temp_dir = make_tree();
        let scanner = SketchScanner::new(ScanConfig {
            excludes: vec!["wifi".to_string()],
            ..ScanConfig::default()
        });

        let examples = scanner.scan(temp_dir.path()).unwrap();
        assert!(examples.iter().all(|e| e.name.to_str() != Some("wifi")));
        assert_eq!(examples.len(), 2);
    }

    #[test]
    fn test_scan_missing_dir() {
        let temp_dir = TempDir::new().unwrap();
        let scanner = SketchScanner::new(ScanConfig::default());

        let err = scanner.scan(&temp_dir.path().join("nope")).unwrap_err();
        assert!(matches!(err, SyncError::ExamplesDirMissing(_)));
    }

    #[test]
    fn test_scan_file_instead_of_dir() {
        let temp_dir = make_tree();
        let scanner = SketchScanner::new(ScanConfig::default());

        let err = scanner.scan(&temp_dir.path().join("README.md")).unwrap_err();
        assert!(matches!(err, SyncError::NotADirectory(_)));
    }

    #[test]
    fn test_sketches_in_filters_by_extension() {
        let temp_dir = make_tree();
        let scanner = SketchScanner::new(ScanConfig::default());

        let sketches = scanner
            .sketches_in(&example(temp_dir.path(), "blink"))
            .unwrap();
        assert_eq!(sketches, vec![temp_dir.path().join("blink/blink.ino")]);

        let none = scanner
            .sketches_in(&example(temp_dir.path(), "empty"))
            .unwrap();
        assert!(none.is_empty());
    }

    #[test]
    fn test_sketches_in_is_case_sensitive_and_shallow() {
        let temp_dir = make_tree();
        let root = temp_dir.path();
        fs::write(root.join("blink/OTHER.INO"), "upper").unwrap();
        fs::create_dir_all(root.join("blink/nested")).unwrap();
        fs::write(root.join("blink/nested/deep.ino"), "deep").unwrap();
        let scanner = SketchScanner::new(ScanConfig::default());

        let sketches = scanner.sketches_in(&example(root, "blink")).unwrap();
        assert_eq!(sketches, vec![root.join("blink/blink.ino")]);
    }

    #[test]
    fn test_sketches_in_unlistable_example_is_error() {
        let temp_dir = make_tree();
        let scanner = SketchScanner::new(ScanConfig::default());

        let err = scanner
            .sketches_in(&example(temp_dir.path(), "gone"))
            .unwrap_err();
        assert!(matches!(err, SyncError::Io { .. }));
        assert!(err.to_string().contains("gone"));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_scan_keeps_non_utf8_names() {
        use std::os::unix::ffi::OsStrExt;

        let temp_dir = TempDir::new().unwrap();
        let raw = OsStr::from_bytes(b"caf\xe9");
        fs::create_dir_all(temp_dir.path().join(raw)).unwrap();
        let scanner = SketchScanner::new(ScanConfig::default());

        let examples = scanner.scan(temp_dir.path()).unwrap();
        assert_eq!(examples.len(), 1);
        assert_eq!(examples[0].name.as_os_str(), raw);
    }
}
