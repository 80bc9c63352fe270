//! Ignore-file pattern matching.
//!
//! Patterns are glob-like: `*` matches any run of characters (path
//! separators included), `?` matches exactly one character, and every
//! other character is literal. A pattern must match the whole candidate
//! path string, which is the absolute path as produced by the walker.

use crate::error::{AppError, Result};
use log;
use regex::Regex;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// One ignore-file line and its compiled full-path matcher.
#[derive(Debug, Clone)]
pub struct IgnoreRule {
    pattern: String,
    compiled: Option<Regex>,
}

impl IgnoreRule {
    /// Compiles a pattern. A pattern that fails to compile is kept but never matches.
    pub fn compile(pattern: &str) -> Self {
        let expression = format!("^{}$", glob_to_regex(pattern));
        let compiled = match Regex::new(&expression) {
            Ok(re) => Some(re),
            Err(e) => {
                log::warn!("Ignore pattern \"{}\" will never match: {}", pattern, e);
                None
            }
        };
        Self {
            pattern: pattern.to_string(),
            compiled,
        }
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn is_match(&self, candidate: &str) -> bool {
        self.compiled
            .as_ref()
            .is_some_and(|re| re.is_match(candidate))
    }
}

fn glob_to_regex(pattern: &str) -> String {
    regex::escape(pattern)
        .replace(r"\*", ".*")
        .replace(r"\?", ".")
}

/// The compiled rule set of one ignore file.
#[derive(Debug, Clone, Default)]
pub struct IgnoreMatcher {
    rules: Vec<IgnoreRule>,
}

impl IgnoreMatcher {
    /// Builds a matcher from ignore-file text, skipping blank and `#` lines.
    pub fn parse(contents: &str) -> Self {
        let rules: Vec<IgnoreRule> = contents
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(IgnoreRule::compile)
            .collect();
        log::debug!("Compiled {} ignore patterns.", rules.len());
        Self { rules }
    }

    pub fn rules(&self) -> &[IgnoreRule] {
        &self.rules
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn matches(&self, path: &Path) -> bool {
        let candidate = path.to_string_lossy();
        match self.rules.iter().find(|rule| rule.is_match(&candidate)) {
            Some(rule) => {
                log::trace!("'{}' matched ignore pattern '{}'", candidate, rule.pattern());
                true
            }
            None => false,
        }
    }
}

/// Loads the ignore file at `path`.
///
/// `Ok(None)` means the file does not exist, which is not an error.
/// An existing but unreadable file yields `AppError::IgnoreFile`.
pub fn load_ignore_file(path: &Path) -> Result<Option<IgnoreMatcher>> {
    match fs::read(path) {
        Ok(bytes) => {
            log::info!("Loaded ignore rules from {}", path.display());
            Ok(Some(IgnoreMatcher::parse(&String::from_utf8_lossy(&bytes))))
        }
        Err(e) if e.kind() == ErrorKind::NotFound => {
            log::debug!("No ignore file at {}", path.display());
            Ok(None)
        }
        Err(e) => Err(AppError::IgnoreFile {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}
