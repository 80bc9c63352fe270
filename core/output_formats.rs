use crate::context::Snapshot;
use crate::error::{AppError, Result};
use crate::stats::Statistics;
use log;
use serde::Serialize;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

const INSTRUCTIONS: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/../data/instructions.txt"
));
const RULE_WIDTH: usize = 80;

pub fn format_statistics(stats: &Statistics) -> String {
    let mut out = String::new();
    out.push_str("Code Statistics:\n");
    let _ = writeln!(out, "1. Total number of files: {}", stats.total_files);
    let _ = writeln!(out, "2. Total lines of code: {}", stats.total_lines);
    out.push_str("3. Lines of code per file type:\n");
    for (ext, lines) in &stats.lines_per_extension {
        let _ = writeln!(out, "   - {}: {}", ext, lines);
    }
    out.push_str("4. Number of files per file type:\n");
    for (ext, count) in &stats.files_per_extension {
        let _ = writeln!(out, "   - {}: {}", ext, count);
    }
    let _ = writeln!(out, "5. Average file size: {:.2} bytes", stats.average_size);
    out.push_str("6. Largest file:\n");
    let _ = writeln!(out, "   - Name: {}", stats.largest_file.name);
    let _ = writeln!(out, "   - Size: {} bytes", stats.largest_file.size);
    let _ = writeln!(out, "   - Lines: {}", stats.largest_file.lines);
    out
}

pub fn file_header(index: usize, relative_path: &str) -> String {
    format!("FILE_{:04}: {}", index, relative_path)
}

/// Composes the document: instructions, statistics, folder map, file index, file blocks.
pub fn render_document(snapshot: &Snapshot) -> String {
    let rule = format!("{}\n", "=".repeat(RULE_WIDTH));
    let mut out = String::new();

    out.push_str(INSTRUCTIONS);
    out.push('\n');
    out.push_str(&format_statistics(&snapshot.statistics));
    out.push_str("\n\nFolder Structure:\n");
    out.push_str(&snapshot.tree.join("\n"));
    out.push_str("\n\nFile Index:\n");
    for file in &snapshot.files {
        let _ = writeln!(out, "{}. {}", file.index, file.relative_path);
    }
    out.push_str("\n\n");

    for file in &snapshot.files {
        out.push('\n');
        out.push_str(&rule);
        out.push_str(&file_header(file.index, &file.relative_path));
        out.push('\n');
        out.push_str(&rule);
        out.push('\n');
        out.push_str(&file.content);
        out.push('\n');
        out.push_str(&rule);
        let _ = writeln!(out, "END OF {}", file_header(file.index, &file.relative_path));
        out.push_str(&rule);
        out.push('\n');
    }
    out
}

/// Writes the rendered document in one go, creating parent directories.
pub fn persist_document(path: &Path, document: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| AppError::DirCreation {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }
    fs::write(path, document).map_err(|e| AppError::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })?;
    log::info!("Snapshot written to {}", path.display());
    Ok(())
}

pub fn serialize_to_json<T: Serialize>(value: &T, pretty: bool) -> Result<String, AppError> {
    if pretty {
        serde_json::to_string_pretty(value).map_err(AppError::JsonSerialize)
    } else {
        serde_json::to_string(value).map_err(AppError::JsonSerialize)
    }
}

pub fn serialize_to_yaml<T: Serialize>(value: &T) -> Result<String, AppError> {
    serde_yml::to_string(value).map_err(AppError::YamlError)
}
