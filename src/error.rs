//! Error types for Lookout
//!
//! Uses `thiserror` for library errors. Detection failures never surface here:
//! they are folded into "unmodified" by the detector.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for Lookout operations
pub type LookoutResult<T> = Result<T, LookoutError>;

/// Main error type for Lookout operations
#[derive(Error, Debug)]
pub enum LookoutError {
    /// A backend operation that the concrete backend never implemented
    #[error("{operation} is not implemented by this backend")]
    NotImplemented { operation: &'static str },

    /// `start` called on a listener that is already watching
    #[error("listener is already watching {directory}")]
    AlreadyWatching { directory: PathBuf },

    /// Native backend failed to register or run
    #[error("{backend} backend error: {message}")]
    Backend {
        backend: &'static str,
        message: String,
    },

    /// Watch directory does not exist
    #[error("directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    /// Config file could not be parsed
    #[error("invalid config in {file}: {message}")]
    InvalidConfig { file: PathBuf, message: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl LookoutError {
    /// Wrap a `notify` error raised by the named backend
    pub fn backend(backend: &'static str, err: impl std::fmt::Display) -> Self {
        LookoutError::Backend {
            backend,
            message: err.to_string(),
        }
    }
}
