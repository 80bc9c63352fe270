use crate::classify::EligibleFile;
use crate::config::TruncateConfig;
use crate::error::{AccessOp, AppError, Result};
use log;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Decides which files are capped and renders their content line by line.
#[derive(Debug, Clone)]
pub struct ContentSerializer {
    truncate_extensions: HashSet<String>,
    max_lines: usize,
}

impl ContentSerializer {
    pub fn new(config: &TruncateConfig) -> Self {
        Self {
            truncate_extensions: config.extensions.iter().map(|e| e.to_lowercase()).collect(),
            max_lines: config.max_lines,
        }
    }

    pub fn truncates(&self, extension: &str) -> bool {
        self.truncate_extensions.contains(extension)
    }

    /// Renders `lines`, capping them at the threshold when `truncate` is set.
    pub fn truncate_lines(&self, lines: &[&str], truncate: bool) -> String {
        let mut content = String::new();
        let visible = if truncate && lines.len() > self.max_lines {
            &lines[..self.max_lines]
        } else {
            lines
        };
        for line in visible {
            content.push_str(line);
            content.push('\n');
        }
        if visible.len() < lines.len() {
            content.push_str(&format!(
                "\n\n(truncated to {} lines for brevity, total file length: {} lines)",
                self.max_lines,
                lines.len()
            ));
        }
        content
    }

    /// Reads one file and renders its (possibly truncated) content.
    pub fn render_file_content(&self, path: &Path, extension: &str) -> Result<String> {
        let bytes = fs::read(path).map_err(|e| AppError::access(path, AccessOp::ReadContent, e))?;
        let text = String::from_utf8_lossy(&bytes);
        let lines: Vec<&str> = text.lines().collect();
        let truncate = self.truncates(extension);
        if truncate && lines.len() > self.max_lines {
            log::debug!(
                "Truncating {} from {} to {} lines",
                path.display(),
                lines.len(),
                self.max_lines
            );
        }
        Ok(self.truncate_lines(&lines, truncate))
    }

    /// Renders a file, substituting a placeholder when it cannot be read.
    pub fn render_or_placeholder(&self, file: &EligibleFile) -> (String, Option<AppError>) {
        match self.render_file_content(&file.path, &file.extension) {
            Ok(content) => (content, None),
            Err(e) => {
                log::warn!("Using placeholder content: {}", e);
                (
                    format!(
                        "Error: Unable to process file content for {}",
                        file.path.display()
                    ),
                    Some(e),
                )
            }
        }
    }
}
