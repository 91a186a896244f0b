//! Run summaries.

pub mod generator;

pub use generator::{generate_json_report, generate_text_summary};
