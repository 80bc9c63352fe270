use crate::error::{AppError, Result};
use log;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_DIR: &str = ".xtools/codesnap";
pub const DEFAULT_CONFIG_FILENAME: &str = "codesnap.toml";
pub const DEFAULT_IGNORE_FILENAME: &str = ".gitignore";
pub const DEFAULT_OUTPUT_SUFFIX: &str = "_output.txt";
pub const DEFAULT_MAX_LINES: usize = 300;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub ignore: IgnoreConfig,
    #[serde(default)]
    pub truncate: TruncateConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct GeneralConfig {
    #[serde(default)]
    pub project_name: Option<String>,
    /// Name of the running binary; files with this name are never snapshotted.
    #[serde(default)]
    pub program_name: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct IgnoreConfig {
    #[serde(default = "default_true")]
    pub use_ignore_file: bool,
    #[serde(default = "default_ignore_filename")]
    pub ignore_filename: String,
    #[serde(default = "default_ignored_dirs")]
    pub ignored_dirs: Vec<String>,
    #[serde(default = "default_ignored_files")]
    pub ignored_files: Vec<String>,
    #[serde(default = "default_binary_extensions")]
    pub binary_extensions: Vec<String>,
    /// Extra globs matched against root-relative paths.
    #[serde(default)]
    pub exclude: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct TruncateConfig {
    #[serde(default = "default_truncate_extensions")]
    pub extensions: Vec<String>,
    #[serde(default = "default_max_lines")]
    pub max_lines: usize,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    #[serde(default = "default_output_suffix")]
    pub filename_suffix: String,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
}

fn default_true() -> bool {
    true
}
fn default_ignore_filename() -> String {
    DEFAULT_IGNORE_FILENAME.to_string()
}
fn default_output_suffix() -> String {
    DEFAULT_OUTPUT_SUFFIX.to_string()
}
fn default_max_lines() -> usize {
    DEFAULT_MAX_LINES
}
fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
fn default_ignored_dirs() -> Vec<String> {
    to_strings(&["__pycache__", ".git"])
}
fn default_ignored_files() -> Vec<String> {
    to_strings(&[
        "package-lock.json",
        "yarn.lock",
        ".DS_Store",
        "Thumbs.db",
        ".gitattributes",
        ".eslintcache",
        ".npmrc",
        ".yarnrc",
    ])
}
fn default_binary_extensions() -> Vec<String> {
    to_strings(&[
        ".webp", ".jpg", ".jpeg", ".png", ".gif", ".pdf", ".zip", ".exe", ".ico", ".svg", ".pyc",
    ])
}
fn default_truncate_extensions() -> Vec<String> {
    to_strings(&[".json", ".geojson"])
}

impl Default for IgnoreConfig {
    fn default() -> Self {
        Self {
            use_ignore_file: default_true(),
            ignore_filename: default_ignore_filename(),
            ignored_dirs: default_ignored_dirs(),
            ignored_files: default_ignored_files(),
            binary_extensions: default_binary_extensions(),
            exclude: Vec::new(),
        }
    }
}
impl Default for TruncateConfig {
    fn default() -> Self {
        Self {
            extensions: default_truncate_extensions(),
            max_lines: default_max_lines(),
        }
    }
}
impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            filename_suffix: default_output_suffix(),
            filename: None,
            output_dir: None,
        }
    }
}

impl Config {
    pub fn determine_project_root(cli_project_root: Option<&PathBuf>) -> Result<PathBuf> {
        let path_str_opt = cli_project_root
            .map(|p| p.to_string_lossy().to_string())
            .or_else(|| env::var("PROJECT_ROOT").ok().filter(|s| !s.is_empty()));

        let path_to_resolve = match path_str_opt {
            Some(p_str) => PathBuf::from(shellexpand::tilde(&p_str).as_ref()),
            None => env::current_dir().map_err(AppError::Io)?,
        };

        path_to_resolve.canonicalize().map_err(|e| {
            AppError::Io(std::io::Error::new(
                e.kind(),
                format!(
                    "Failed to canonicalize project root '{}': {}",
                    path_to_resolve.display(),
                    e
                ),
            ))
        })
    }

    pub fn resolve_config_path(
        project_root: &Path,
        cli_config_file: Option<&String>,
        cli_disable_config: bool,
    ) -> Result<Option<PathBuf>> {
        if cli_disable_config {
            log::debug!("Config file loading disabled via CLI flag.");
            return Ok(None);
        }

        match cli_config_file {
            Some(p_str) => {
                let mut path = PathBuf::from(shellexpand::tilde(p_str).as_ref());
                let looks_like_path = path.is_absolute()
                    || path.components().count() > 1
                    || p_str.contains(['/', '\\']);

                if looks_like_path {
                    if !path.exists() && path.extension().is_none() {
                        path.set_extension("toml");
                    }
                    if !path.exists() {
                        return Err(AppError::Config(format!(
                            "Specified config file not found at path: {}",
                            path.display()
                        )));
                    }
                    log::debug!("Using specified config file path: {}", path.display());
                    return Ok(Some(path));
                }

                let filename = if path.extension().is_none_or(|e| e != "toml") {
                    format!("{}.toml", path.to_string_lossy())
                } else {
                    path.to_string_lossy().to_string()
                };
                let full_path = project_root.join(DEFAULT_CONFIG_DIR).join(filename);
                if !full_path.exists() {
                    return Err(AppError::Config(format!(
                        "Specified config file '{}' not found in default directory: {}",
                        path.display(),
                        project_root.join(DEFAULT_CONFIG_DIR).display()
                    )));
                }
                log::debug!(
                    "Using specified config filename in default directory: {}",
                    full_path.display()
                );
                Ok(Some(full_path))
            }
            None => {
                let default_path = Self::default_config_path(project_root);
                if default_path.exists() {
                    log::debug!("Using default config file path: {}", default_path.display());
                    Ok(Some(default_path))
                } else {
                    log::debug!(
                        "No config file specified and default not found at: {}",
                        default_path.display()
                    );
                    Ok(None)
                }
            }
        }
    }

    pub fn default_config_path(project_root: &Path) -> PathBuf {
        project_root
            .join(DEFAULT_CONFIG_DIR)
            .join(DEFAULT_CONFIG_FILENAME)
    }

    pub fn load_from_path(config_path: &Path) -> Result<Self> {
        log::info!("Loading configuration from: {}", config_path.display());
        let toml_content = fs::read_to_string(config_path).map_err(|e| AppError::FileRead {
            path: config_path.to_path_buf(),
            source: e,
        })?;
        Self::from_toml_str(&toml_content).map_err(|e| match e {
            AppError::TomlParse(msg) => AppError::TomlParse(format!(
                "Error parsing config file '{}': {}. Check TOML syntax and structure.",
                config_path.display(),
                msg
            )),
            other => other,
        })
    }

    pub fn from_toml_str(toml_content: &str) -> Result<Self> {
        let config = toml::from_str::<Config>(toml_content)
            .map_err(|e| AppError::TomlParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.ignore.ignore_filename.trim().is_empty() {
            return Err(AppError::Config(
                "ignore.ignore_filename must not be empty".to_string(),
            ));
        }
        if self.output.filename.as_deref().is_some_and(|f| f.trim().is_empty()) {
            return Err(AppError::Config(
                "output.filename must not be empty when set".to_string(),
            ));
        }
        Ok(())
    }

    pub fn get_effective_project_name(&self, project_root: &Path) -> String {
        self.general.project_name.clone().unwrap_or_else(|| {
            project_root
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| "UnknownProject".to_string())
        })
    }

    /// File name of the generated document: explicit override, else `<project><suffix>`.
    pub fn output_filename(&self, project_root: &Path) -> String {
        self.output.filename.clone().unwrap_or_else(|| {
            format!(
                "{}{}",
                self.get_effective_project_name(project_root),
                self.output.filename_suffix
            )
        })
    }

    pub fn output_path(&self, project_root: &Path) -> PathBuf {
        let filename = self.output_filename(project_root);
        match &self.output.output_dir {
            Some(dir) => dir.join(filename),
            None => PathBuf::from(filename),
        }
    }

    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}
