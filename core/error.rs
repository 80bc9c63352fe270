use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T, E = AppError> = std::result::Result<T, E>;

/// The filesystem operation that failed while scanning a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessOp {
    ListDir,
    Stat,
    CountLines,
    ReadContent,
}

impl fmt::Display for AccessOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            AccessOp::ListDir => "listing directory",
            AccessOp::Stat => "reading metadata",
            AccessOp::CountLines => "counting lines",
            AccessOp::ReadContent => "reading content",
        };
        f.write_str(label)
    }
}

#[derive(Error, Debug)]
#[non_exhaustive]
pub enum AppError {
    #[error("Configuration Error: {0}")]
    Config(String),

    #[error("TOML Parsing Error: {0}")]
    TomlParse(String),

    #[error("TOML Serialization Error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("JSON Serialization Error: {0}")]
    JsonSerialize(#[from] serde_json::Error),

    #[error("YAML Serialization Error: {0}")]
    YamlError(#[from] serde_yml::Error),

    #[error("Filesystem Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File Read Error: Path '{path}', Error: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("File Write Error: Path '{path}', Error: {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Directory Creation Error: Path '{path}', Error: {source}")]
    DirCreation {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A path could not be stat'ed, listed or read; the entry was skipped.
    #[error("Access Error ({operation}): Path '{path}', Error: {source}")]
    Access {
        path: PathBuf,
        operation: AccessOp,
        #[source]
        source: std::io::Error,
    },

    /// The ignore file exists but could not be read; scanning continues without rules.
    #[error("Ignore File Error: Path '{path}', Error: {source}")]
    IgnoreFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Glob Pattern Error: {0}")]
    Glob(String),

    #[error("Invalid Argument: {0}")]
    InvalidArgument(String),
}

impl AppError {
    pub(crate) fn access(
        path: impl Into<PathBuf>,
        operation: AccessOp,
        source: std::io::Error,
    ) -> Self {
        AppError::Access {
            path: path.into(),
            operation,
            source,
        }
    }

    /// True for errors that only cause an entry to be skipped.
    pub fn is_skip(&self) -> bool {
        matches!(self, AppError::Access { .. } | AppError::IgnoreFile { .. })
    }
}

impl From<globset::Error> for AppError {
    fn from(err: globset::Error) -> Self {
        AppError::Glob(format!("Globset error: {}", err))
    }
}

impl From<walkdir::Error> for AppError {
    fn from(err: walkdir::Error) -> Self {
        let path = err.path().map(PathBuf::from).unwrap_or_default();
        AppError::access(path, AccessOp::ListDir, std::io::Error::from(err))
    }
}
