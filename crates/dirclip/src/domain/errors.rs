//! Domain-specific errors.

use std::path::PathBuf;

use thiserror::Error;

/// Failure reported by a filesystem adapter, carrying the offending path.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{}: {message}", .path.display())]
pub struct FsError {
    pub path: PathBuf,
    pub message: String,
}

impl FsError {
    pub fn new(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn from_io(path: impl Into<PathBuf>, err: &std::io::Error) -> Self {
        Self::new(path, err.to_string())
    }
}

/// Non-fatal per-path failure collected while building a clipboard payload.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AccessError {
    /// A selected path could not be stat-ed or a walk entry could not be visited.
    #[error("Error accessing {}: {cause}", .path.display())]
    Access { path: PathBuf, cause: String },
    /// A file was found but its contents could not be read.
    #[error("Error reading file {}: {cause}", .path.display())]
    Read { path: PathBuf, cause: String },
}

impl AccessError {
    pub fn path(&self) -> &std::path::Path {
        match self {
            AccessError::Access { path, .. } | AccessError::Read { path, .. } => path,
        }
    }
}

/// Errors surfaced by navigator and aggregator operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BrowseError {
    #[error("Error reading directory: {0}")]
    DirectoryRead(FsError),
    #[error(transparent)]
    FileAccess(AccessError),
    /// Nothing was appended to the payload. Any per-path errors seen on the way are kept.
    #[error("No files selected")]
    NoSelection { errors: Vec<AccessError> },
    #[error("Failed to copy to clipboard: {0}")]
    ClipboardWrite(String),
}
