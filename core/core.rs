pub mod classify;
pub mod config;
pub mod content;
pub mod context;
pub mod error;
pub mod gather;
pub mod matcher;
pub mod output_formats;
pub mod stats;

pub use classify::{EligibleFile, FileClassifier, NO_EXTENSION, extension_of};
pub use config::Config;
pub use content::ContentSerializer;
pub use context::{ScanResult, Snapshot, SnapshotFile, scan_project};
pub use error::{AccessOp, AppError, Result};
pub use gather::{Subtree, gather_tree_and_candidates};
pub use matcher::{IgnoreMatcher, IgnoreRule, load_ignore_file};
pub use output_formats::{format_statistics, persist_document, render_document};
pub use stats::{FileRecord, LargestFile, Statistics, collect_statistics, count_lines};
