use crate::classify::EligibleFile;
use crate::error::{AccessOp, AppError};
use indexmap::IndexMap;
use log;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// An eligible file together with its line count.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileRecord {
    #[serde(skip)]
    pub path: PathBuf,
    pub relative_path: String,
    pub extension: String,
    pub size: u64,
    /// `None` when the file could not be read for counting.
    pub lines: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct LargestFile {
    pub name: String,
    pub size: u64,
    pub lines: usize,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    pub total_files: usize,
    pub total_lines: usize,
    pub lines_per_extension: IndexMap<String, usize>,
    pub files_per_extension: IndexMap<String, usize>,
    pub average_size: f64,
    pub largest_file: LargestFile,
    pub files: Vec<FileRecord>,
}

/// Counts newline-delimited lines; a final unterminated line counts as one.
pub fn count_lines(bytes: &[u8]) -> usize {
    let newlines = bytes.iter().filter(|&&b| b == b'\n').count();
    if bytes.last().is_some_and(|&b| b != b'\n') {
        newlines + 1
    } else {
        newlines
    }
}

fn count_file_lines(path: &Path) -> Result<usize, AppError> {
    let bytes = fs::read(path).map_err(|e| AppError::access(path, AccessOp::CountLines, e))?;
    Ok(count_lines(&bytes))
}

/// Aggregates counts, sizes and line totals over `files` in order.
///
/// Files that cannot be read still count toward file totals and the
/// average size but contribute no lines and are never the largest file.
pub fn collect_statistics(files: &[EligibleFile]) -> (Statistics, Vec<AppError>) {
    log::info!("Collecting statistics for {} files...", files.len());
    let mut stats = Statistics {
        total_files: files.len(),
        ..Statistics::default()
    };
    let mut errors = Vec::new();
    let mut total_size: u64 = 0;

    for file in files {
        total_size = total_size.saturating_add(file.size);
        *stats
            .files_per_extension
            .entry(file.extension.clone())
            .or_insert(0) += 1;

        let lines = match count_file_lines(&file.path) {
            Ok(n) => Some(n),
            Err(e) => {
                log::warn!("Skipping line count: {}", e);
                errors.push(e);
                None
            }
        };

        if let Some(n) = lines {
            stats.total_lines += n;
            *stats
                .lines_per_extension
                .entry(file.extension.clone())
                .or_insert(0) += n;

            // Strictly greater keeps the earliest file on ties.
            if file.size > stats.largest_file.size {
                stats.largest_file = LargestFile {
                    name: file
                        .path
                        .file_name()
                        .map(|n| n.to_string_lossy().into_owned())
                        .unwrap_or_else(|| file.relative_path.clone()),
                    size: file.size,
                    lines: n,
                };
            }
        }

        stats.files.push(FileRecord {
            path: file.path.clone(),
            relative_path: file.relative_path.clone(),
            extension: file.extension.clone(),
            size: file.size,
            lines,
        });
    }

    stats.average_size = if stats.total_files == 0 {
        0.0
    } else {
        total_size as f64 / stats.total_files as f64
    };
    log::debug!(
        "Statistics: {} files, {} lines, largest '{}'",
        stats.total_files,
        stats.total_lines,
        stats.largest_file.name
    );
    (stats, errors)
}
