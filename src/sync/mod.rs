//! Clearing the destination and copying sketches into it.

pub mod cleaner;
pub mod copier;

pub use copier::{execute, SyncOptions};
