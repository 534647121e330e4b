//! Error types for wplsync-cli

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Errors that can occur in CLI operations
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Error from wplsync-core
    #[error(transparent)]
    Core(#[from] wplsync_core::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Report could not be rendered as JSON
    #[error("Failed to render report: {0}")]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// True if the run stopped because the user asked it to.
    pub fn is_interrupt(&self) -> bool {
        matches!(self, Self::Core(wplsync_core::Error::Interrupted))
    }
}
