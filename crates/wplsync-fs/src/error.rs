//! Error types for wplsync-fs

use std::path::PathBuf;

/// Result type for wplsync-fs operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in wplsync-fs operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path} is not located below {root}")]
    OutsideRoot { path: PathBuf, root: PathBuf },

    #[error("Source file is not a regular file: {path}")]
    NotAFile { path: PathBuf },
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
