//! Run summary generation.
//!
//! Renders a [`SyncReport`] either as plain text for the terminal or as
//! pretty-printed JSON for scripts.

use crate::models::{SyncMetadata, SyncReport};
use anyhow::Result;

/// Generate the human-readable summary.
pub fn generate_text_summary(report: &SyncReport) -> String {
    let mut output = String::new();

    output.push_str(&generate_header(&report.metadata));
    output.push_str(&generate_copied_section(report));

    if !report.empty_examples.is_empty() {
        output.push_str(&format!(
            "\n⚠️  Examples without a sketch ({}):\n",
            report.empty_examples.len()
        ));
        for name in &report.empty_examples {
            output.push_str(&format!("   - {}\n", name));
        }
    }

    if !report.skipped_duplicates.is_empty() {
        output.push_str(&format!(
            "\n⚠️  Extra sketches skipped ({}):\n",
            report.skipped_duplicates.len()
        ));
        for path in &report.skipped_duplicates {
            output.push_str(&format!("   - {}\n", path.display()));
        }
    }

    output.push_str(&generate_footer(report));
    output
}

fn generate_header(metadata: &SyncMetadata) -> String {
    let mut section = String::new();

    if metadata.dry_run {
        section.push_str("🔍 Dry run: no files were changed\n");
    }
    section.push_str(&format!(
        "📂 {} -> {}\n",
        metadata.examples_dir.display(),
        metadata.dest_dir.display()
    ));
    section.push_str(&format!(
        "   Started: {}\n",
        metadata.started_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));

    section
}

fn generate_copied_section(report: &SyncReport) -> String {
    let mut section = String::new();

    if report.copied.is_empty() {
        section.push_str("\n   No sketches found.\n");
        return section;
    }

    let verb = if report.metadata.dry_run {
        "Would copy"
    } else {
        "Copied"
    };
    section.push_str(&format!("\n   {} {} sketches:\n", verb, report.copied.len()));
    for sketch in &report.copied {
        section.push_str(&format!(
            "     📄 {} -> {} ({} bytes)\n",
            sketch.source.display(),
            sketch.destination.display(),
            sketch.bytes
        ));
    }

    section
}

fn generate_footer(report: &SyncReport) -> String {
    let mut section = String::new();

    section.push_str("\n📊 Summary:\n");
    if !report.metadata.dry_run {
        section.push_str(&format!(
            "   Cleared entries: {}\n",
            report.cleared_entries
        ));
    }
    section.push_str(&format!(
        "   Sketches: {} ({} bytes)\n",
        report.copied.len(),
        report.total_bytes()
    ));
    section.push_str(&format!(
        "   Duration: {:.2}s\n",
        report.metadata.duration_seconds
    ));

    section
}

/// Generate a JSON report.
pub fn generate_json_report(report: &SyncReport) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(Into::into)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CopiedSketch;
    use chrono::Utc;
    use std::path::PathBuf;

    fn create_test_report(dry_run: bool) -> SyncReport {
        SyncReport {
            metadata: SyncMetadata {
                root: PathBuf::from("."),
                examples_dir: PathBuf::from("examples"),
                dest_dir: PathBuf::from("test/src"),
                started_at: Utc::now(),
                duration_seconds: 0.25,
                dry_run,
            },
            cleared_entries: 3,
            copied: vec![CopiedSketch {
                source: PathBuf::from("examples/blink/blink.ino"),
                destination: PathBuf::from("test/src/blink/blink.cpp"),
                bytes: 120,
            }],
            empty_examples: vec!["docs".to_string()],
            skipped_duplicates: vec![PathBuf::from("examples/wifi/old.ino")],
        }
    }

    #[test]
    fn test_generate_text_summary() {
        let text = generate_text_summary(&create_test_report(false));

        assert!(text.contains("Copied 1 sketches"));
        assert!(text.contains("test/src/blink/blink.cpp"));
        assert!(text.contains("120 bytes"));
        assert!(text.contains("Cleared entries: 3"));
        assert!(text.contains("docs"));
        assert!(text.contains("examples/wifi/old.ino"));
        assert!(!text.contains("Dry run"));
    }

    #[test]
    fn test_generate_text_summary_dry_run() {
        let text = generate_text_summary(&create_test_report(true));

        assert!(text.contains("Dry run"));
        assert!(text.contains("Would copy 1 sketches"));
        assert!(!text.contains("Cleared entries"));
    }

    #[test]
    fn test_generate_text_summary_nothing_copied() {
        let mut report = create_test_report(false);
        report.copied.clear();

        let text = generate_text_summary(&report);
        assert!(text.contains("No sketches found."));
    }

    #[test]
    fn test_generate_json_report() {
        let json = generate_json_report(&create_test_report(false)).unwrap();

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["metadata"]["dry_run"], false);
        assert_eq!(value["cleared_entries"], 3);
        assert_eq!(value["copied"][0]["bytes"], 120);
        assert_eq!(value["empty_examples"][0], "docs");
    }
}
