//! Error types for TransferPool
//!
//! One taxonomy covers the three error families the scheduler deals with:
//! path errors raised by the file-system primitives, the cooperative
//! cancellation signal, and protocol errors returned synchronously from the
//! service API.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for TransferPool operations
#[derive(Error, Debug)]
pub enum TransferError {
    /// I/O error during file operations
    #[error("I/O error at '{path}': {source}")]
    Io {
        /// Path the operation was acting on
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// File or directory not found
    #[error("Path not found: {0}")]
    NotFound(PathBuf),

    /// File or directory already exists
    #[error("Path already exists: {0}")]
    AlreadyExists(PathBuf),

    /// Permission denied
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// File or directory is in use by another process
    #[error("Path is busy: {0}")]
    Busy(PathBuf),

    /// Directory is not empty
    #[error("Directory not empty: {0}")]
    NotEmpty(PathBuf),

    /// Invalid path format
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// Operation cancelled through a cancellation token
    #[error("Operation cancelled")]
    Cancelled,

    /// Job enqueued after `complete_adding()` was called
    #[error("Cannot enqueue: adding has been completed")]
    AddingCompleted,

    /// `start()` called on a service that is already running
    #[error("Service has already been started")]
    AlreadyStarted,
}

impl TransferError {
    /// Create an I/O error with path context
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Check if this error is recoverable (a retry might succeed)
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Io { .. } | Self::Busy(_))
    }

    /// Check if this error is a protocol error (caller misuse of the service)
    pub fn is_protocol_error(&self) -> bool {
        matches!(self, Self::AddingCompleted | Self::AlreadyStarted)
    }

    /// Get the path associated with this error, if any
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            Self::Io { path, .. }
            | Self::NotFound(path)
            | Self::AlreadyExists(path)
            | Self::PermissionDenied(path)
            | Self::Busy(path)
            | Self::NotEmpty(path) => Some(path),
            _ => None,
        }
    }
}

/// Result type alias for TransferPool operations
pub type Result<T> = std::result::Result<T, TransferError>;

/// Extension trait for adding path context to std::io::Result
pub trait IoResultExt<T> {
    /// Add path context to an I/O error
    fn with_path(self, path: impl Into<PathBuf>) -> Result<T>;
}

impl<T> IoResultExt<T> for std::io::Result<T> {
    fn with_path(self, path: impl Into<PathBuf>) -> Result<T> {
        self.map_err(|e| TransferError::io(path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_with_path() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = TransferError::io("/test/path", io_err);
        assert_eq!(err.path().unwrap(), &PathBuf::from("/test/path"));
    }

    #[test]
    fn test_error_recoverability() {
        let busy = TransferError::Busy(PathBuf::from("/test"));
        assert!(busy.is_recoverable());

        let cancelled = TransferError::Cancelled;
        assert!(!cancelled.is_recoverable());

        let missing = TransferError::NotFound(PathBuf::from("/test"));
        assert!(!missing.is_recoverable());
    }

    #[test]
    fn test_protocol_errors() {
        assert!(TransferError::AddingCompleted.is_protocol_error());
        assert!(TransferError::AlreadyStarted.is_protocol_error());
        assert!(!TransferError::Cancelled.is_protocol_error());
    }

    #[test]
    fn test_with_path_extension() {
        let result: std::io::Result<()> = Err(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "denied",
        ));
        let err = result.with_path("/secret").unwrap_err();
        assert!(matches!(err, TransferError::Io { .. }));
    }
}
