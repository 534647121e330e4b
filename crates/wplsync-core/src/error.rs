//! Error types for wplsync-core

use std::path::PathBuf;

/// Result type for wplsync-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in wplsync-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A source or target argument is not an existing folder
    #[error("Not a folder: {path}")]
    NotADirectory { path: PathBuf },

    /// Source and target folders contain one another
    #[error("Source folder {source_folder} and target folder {target_folder} must not overlap")]
    OverlappingFolders {
        source_folder: PathBuf,
        target_folder: PathBuf,
    },

    /// A playlist given on the command line does not exist
    #[error("Playlist not found: {path}")]
    PlaylistNotFound { path: PathBuf },

    /// Playlist extension has no reader
    #[error("Unsupported playlist extension {extension:?}: {path}")]
    UnsupportedPlaylist { path: PathBuf, extension: String },

    /// Playlist document could not be read as WPL
    #[error("Failed to parse playlist {path}: {message}")]
    PlaylistParse { path: PathBuf, message: String },

    /// A mutation would have touched the source tree
    #[error("Refusing to modify {path}: it is inside the source folder")]
    WouldModifySource { path: PathBuf },

    /// The run was interrupted from outside
    #[error("Interrupted")]
    Interrupted,

    /// A file pattern failed to compile
    #[error("Invalid file pattern {pattern:?}: {message}")]
    Pattern { pattern: String, message: String },

    /// Pattern configuration file could not be parsed
    #[error("Failed to parse pattern config at {path}: {message}")]
    ConfigParse { path: PathBuf, message: String },

    /// Filesystem error from wplsync-fs
    #[error(transparent)]
    Fs(#[from] wplsync_fs::Error),
}
