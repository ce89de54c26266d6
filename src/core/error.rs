//! Failure taxonomy of a rename command.
//!
//! Everything except `MissingSourceRoot` aborts only the current command;
//! the session reports it and reads the next one.

use std::path::PathBuf;

/// Domain-specific rename failures
#[derive(Debug, thiserror::Error)]
pub enum RenameError {
    /// Configured source tree does not exist; fatal at startup
    #[error("Source folder not found: {}. Exiting", .0.display())]
    MissingSourceRoot(PathBuf),

    /// Live dir or mapping log could not be prepared
    #[error("cannot prepare {}: {cause:#}", .path.display())]
    Setup { path: PathBuf, cause: anyhow::Error },

    /// Mapping log append failed; nothing was searched or edited
    #[error("cannot write mapping log {}: {cause:#}", .path.display())]
    Log { path: PathBuf, cause: anyhow::Error },

    /// Locator could not enumerate matches; nothing was backed up or edited
    #[error("search for `{needle}` failed: {cause:#}")]
    Search { needle: String, cause: anyhow::Error },

    /// Backup of a matched file failed; that file was not edited
    #[error("backup of {} failed: {cause:#}", .path.display())]
    Backup { path: PathBuf, cause: anyhow::Error },

    /// Line review failed (read error or input closed); file left untouched
    #[error("review of {} aborted: {cause:#}", .path.display())]
    Review { path: PathBuf, cause: anyhow::Error },

    /// Writing the edited file failed; earlier files of this command stay edited
    #[error("writing {} failed: {cause:#}", .path.display())]
    Flush { path: PathBuf, cause: anyhow::Error },
}

impl RenameError {
    /// Whether the whole process should stop rather than just this command.
    pub fn is_fatal(&self) -> bool {
        matches!(self, RenameError::MissingSourceRoot(_) | RenameError::Setup { .. })
    }
}
