use crate::config::Config;
use crate::error::{AccessOp, AppError, Result};
use crate::matcher::IgnoreMatcher;
use globset::{Glob, GlobSet, GlobSetBuilder};
use log;
use serde::Serialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

pub const NO_EXTENSION: &str = "No extension";

/// A file that survived every inclusion check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EligibleFile {
    #[serde(skip)]
    pub path: PathBuf,
    pub relative_path: String,
    pub extension: String,
    pub size: u64,
}

/// Lowercased suffix of `name` from its last `.`, or the "no extension" sentinel.
pub fn extension_of(name: &str) -> String {
    match name.rfind('.') {
        Some(idx) => name[idx..].to_lowercase(),
        None => NO_EXTENSION.to_string(),
    }
}

fn lowercase_set(items: &[String]) -> HashSet<String> {
    items.iter().map(|s| s.to_lowercase()).collect()
}

/// Decides which files appear in the folder map and which are snapshotted.
#[derive(Debug)]
pub struct FileClassifier<'a> {
    project_root: PathBuf,
    matcher: Option<&'a IgnoreMatcher>,
    reserved_names: HashSet<String>,
    ignored_dirs: HashSet<String>,
    ignored_files: HashSet<String>,
    binary_extensions: HashSet<String>,
    exclude_set: GlobSet,
}

impl<'a> FileClassifier<'a> {
    pub fn new(
        project_root: &Path,
        config: &Config,
        matcher: Option<&'a IgnoreMatcher>,
    ) -> Result<Self> {
        let mut reserved_names = HashSet::new();
        reserved_names.insert(config.output_filename(project_root));
        reserved_names.insert(config.ignore.ignore_filename.clone());
        if let Some(program) = &config.general.program_name {
            reserved_names.insert(program.clone());
        }
        log::trace!("Reserved file names: {:?}", reserved_names);

        Ok(Self {
            project_root: project_root.to_path_buf(),
            matcher,
            reserved_names,
            ignored_dirs: config.ignore.ignored_dirs.iter().cloned().collect(),
            ignored_files: config.ignore.ignored_files.iter().cloned().collect(),
            binary_extensions: lowercase_set(&config.ignore.binary_extensions),
            exclude_set: build_glob_set(&config.ignore.exclude)?,
        })
    }

    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    fn ignored_by_rules(&self, path: &Path) -> bool {
        if self.matcher.is_some_and(|m| m.matches(path)) {
            return true;
        }
        if self.exclude_set.is_empty() {
            return false;
        }
        path.strip_prefix(&self.project_root)
            .is_ok_and(|rel| self.exclude_set.is_match(rel))
    }

    fn is_reserved_file(&self, name: &str) -> bool {
        self.reserved_names.contains(name) || self.ignored_files.contains(name)
    }

    /// Whether an entry is left out of the folder map (directories are pruned).
    ///
    /// Always-ignored names hide files as well as directories, but only a
    /// directory is pruned; a file hidden that way can still be a candidate.
    pub fn hidden_in_tree(&self, name: &str, path: &Path, is_dir: bool) -> bool {
        if self.ignored_dirs.contains(name) {
            if is_dir {
                log::trace!("Pruning always-ignored directory: {}", path.display());
            }
            return true;
        }
        if !is_dir && self.is_reserved_file(name) {
            return true;
        }
        self.ignored_by_rules(path)
    }

    /// Cheap, metadata-free filters applied while walking.
    pub fn is_candidate(&self, name: &str) -> bool {
        !self.is_reserved_file(name) && !self.binary_extensions.contains(&extension_of(name))
    }

    /// Whether a walked file goes on the candidate list, independent of tree visibility.
    pub fn collects_file(&self, name: &str, path: &Path) -> bool {
        self.is_candidate(name) && !self.ignored_by_rules(path)
    }

    /// Full inclusion check for one file path, including the emptiness test.
    pub fn eligible(&self, path: &Path) -> bool {
        matches!(self.classify(path), Ok(Some(_)))
    }

    /// Like [`eligible`](Self::eligible) but returns the file's record, or the
    /// stat failure that excluded it.
    pub fn classify(&self, path: &Path) -> Result<Option<EligibleFile>> {
        let name = match path.file_name() {
            Some(n) => n.to_string_lossy().into_owned(),
            None => return Ok(None),
        };
        if !self.is_candidate(&name) || self.ignored_by_rules(path) {
            log::trace!("Excluding file: {}", path.display());
            return Ok(None);
        }
        let metadata =
            fs::metadata(path).map_err(|e| AppError::access(path, AccessOp::Stat, e))?;
        if metadata.len() == 0 {
            log::trace!("Excluding empty file: {}", path.display());
            return Ok(None);
        }
        let relative_path = pathdiff::diff_paths(path, &self.project_root)
            .unwrap_or_else(|| path.to_path_buf())
            .to_string_lossy()
            .to_string();
        Ok(Some(EligibleFile {
            path: path.to_path_buf(),
            relative_path,
            extension: extension_of(&name),
            size: metadata.len(),
        }))
    }

    /// Classifies candidates in order, returning eligible files and stat failures.
    pub fn classify_all(&self, candidates: &[PathBuf]) -> (Vec<EligibleFile>, Vec<AppError>) {
        let mut files = Vec::with_capacity(candidates.len());
        let mut errors = Vec::new();
        for path in candidates {
            match self.classify(path) {
                Ok(Some(file)) => files.push(file),
                Ok(None) => {}
                Err(e) => {
                    log::warn!("Skipping file: {}", e);
                    errors.push(e);
                }
            }
        }
        log::debug!(
            "{} of {} candidate files are eligible.",
            files.len(),
            candidates.len()
        );
        (files, errors)
    }
}

fn build_glob_set(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern_str in patterns {
        let trimmed = pattern_str.trim();
        // `dir/` excludes the directory itself as well as everything below it.
        let processed: Vec<String> = match trimmed.strip_suffix('/') {
            Some(base) if !base.is_empty() => vec![base.to_string(), format!("{base}/**")],
            _ => vec![trimmed.to_string()],
        };
        for processed_pattern in processed {
            let glob = Glob::new(&processed_pattern).map_err(|e| {
                log::error!("Invalid glob pattern \"{}\": {}", pattern_str, e);
                AppError::Glob(format!(
                    "Invalid glob pattern \"{}\" (processed as \"{}\"): {}",
                    pattern_str, processed_pattern, e
                ))
            })?;
            log::trace!("Adding exclude glob: {}", processed_pattern);
            builder.add(glob);
        }
    }
    Ok(builder.build()?)
}
