use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FsError {
    // I/O
    #[error("cannot read directory {}", path.display())]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot stat {}", path.display())]
    Stat {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot read file {}", path.display())]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot write file {}", path.display())]
    WriteFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // Config
    #[error("invalid pattern")]
    InvalidPattern(#[from] regex::Error),

    #[error("invalid concurrency")]
    InvalidConcurrency(usize),

    // Programming errors: a stage needed stat but the entry has none
    #[error("no stat for {}", .0.display())]
    MissingStat(PathBuf),
}

impl FsError {
    /// The path this error occurred at, if applicable.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::ReadDir { path, .. }
            | Self::Stat { path, .. }
            | Self::ReadFile { path, .. }
            | Self::WriteFile { path, .. }
            | Self::MissingStat(path) => Some(path),
            _ => None,
        }
    }

    /// Whether the underlying I/O error is "not found".
    ///
    /// Lets callers tell a vanished entry (deleted between listing and
    /// stat) apart from a real failure without matching on variants.
    pub fn is_not_found(&self) -> bool {
        self.io_source()
            .is_some_and(|e| e.kind() == std::io::ErrorKind::NotFound)
    }

    fn io_source(&self) -> Option<&std::io::Error> {
        match self {
            Self::ReadDir { source, .. }
            | Self::Stat { source, .. }
            | Self::ReadFile { source, .. }
            | Self::WriteFile { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Failures of the locale checker that stop it before a report exists.
#[derive(Error, Debug)]
pub enum LocaleError {
    #[error("error while reading localization files")]
    Io(#[from] FsError),

    #[error("invalid JSON in {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("reference file {0} not found")]
    MissingReference(String),

    #[error("cannot read config {}", path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {}", path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{0}")]
    Encoding(String),
}
