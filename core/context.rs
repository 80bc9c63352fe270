use crate::classify::{EligibleFile, FileClassifier};
use crate::config::Config;
use crate::content::ContentSerializer;
use crate::error::{AppError, Result};
use crate::gather;
use crate::matcher::{self, IgnoreMatcher};
use crate::stats::{self, Statistics};
use log;
use serde::Serialize;
use std::path::Path;

/// One serialized file block of the snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotFile {
    /// 1-based position in the file index.
    pub index: usize,
    pub relative_path: String,
    pub content: String,
}

/// Everything the snapshot document is rendered from.
#[derive(Debug, Default)]
pub struct Snapshot {
    pub project_name: String,
    pub tree: Vec<String>,
    pub statistics: Statistics,
    pub files: Vec<SnapshotFile>,
    /// Entries that were skipped or degraded while scanning.
    pub diagnostics: Vec<AppError>,
}

/// The parts of a scan that do not require reading file contents.
#[derive(Debug, Default)]
pub struct ScanResult {
    pub project_name: String,
    pub tree: Vec<String>,
    pub files: Vec<EligibleFile>,
    pub diagnostics: Vec<AppError>,
}

/// Loads the configured ignore file, turning read failures into a diagnostic.
fn load_matcher(
    project_root: &Path,
    config: &Config,
    diagnostics: &mut Vec<AppError>,
) -> Option<IgnoreMatcher> {
    if !config.ignore.use_ignore_file {
        log::debug!("Ignore file disabled in configuration.");
        return None;
    }
    let ignore_path = project_root.join(&config.ignore.ignore_filename);
    match matcher::load_ignore_file(&ignore_path) {
        Ok(Some(m)) => Some(m),
        Ok(None) => {
            log::info!(
                "No {} file found. Proceeding without ignoring any files.",
                config.ignore.ignore_filename
            );
            None
        }
        Err(e) => {
            log::warn!("Proceeding without ignore rules: {}", e);
            diagnostics.push(e);
            None
        }
    }
}

/// Walks the tree and runs the single classification pass.
pub fn scan_project(project_root: &Path, config: &Config) -> Result<ScanResult> {
    let mut diagnostics = Vec::new();
    let matcher = load_matcher(project_root, config, &mut diagnostics);
    let classifier = FileClassifier::new(project_root, config, matcher.as_ref())?;
    let project_name = config.get_effective_project_name(project_root);

    let walked = gather::gather_tree_and_candidates(&classifier, &project_name);
    diagnostics.extend(walked.errors);

    let (files, classify_errors) = classifier.classify_all(&walked.candidates);
    diagnostics.extend(classify_errors);

    Ok(ScanResult {
        project_name,
        tree: walked.lines,
        files,
        diagnostics,
    })
}

impl Snapshot {
    /// Runs the full scan, statistics and content pipeline over `project_root`.
    ///
    /// Only configuration problems (such as an invalid exclude glob) are
    /// returned as errors; unreadable entries end up in `diagnostics`.
    pub fn build(project_root: &Path, config: &Config) -> Result<Self> {
        log::debug!("Building snapshot for {}", project_root.display());
        let scan = scan_project(project_root, config)?;
        let mut diagnostics = scan.diagnostics;

        let (statistics, stat_errors) = stats::collect_statistics(&scan.files);
        diagnostics.extend(stat_errors);

        log::info!("Reading content for {} files...", scan.files.len());
        let serializer = ContentSerializer::new(&config.truncate);
        let mut files = Vec::with_capacity(scan.files.len());
        for (i, file) in scan.files.iter().enumerate() {
            let (content, error) = serializer.render_or_placeholder(file);
            diagnostics.extend(error);
            files.push(SnapshotFile {
                index: i + 1,
                relative_path: file.relative_path.clone(),
                content,
            });
        }

        log::debug!(
            "Snapshot built with {} files and {} diagnostics.",
            files.len(),
            diagnostics.len()
        );
        Ok(Snapshot {
            project_name: scan.project_name,
            tree: scan.tree,
            statistics,
            files,
            diagnostics,
        })
    }

    /// Renders the complete snapshot document.
    pub fn render(&self) -> String {
        crate::output_formats::render_document(self)
    }
}
