//! Error types for scaffold export.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for scaffold export.
pub type IoResult<T> = Result<T, IoError>;

/// Errors that can occur while writing or reading scaffold files.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IoError {
    /// File not found.
    #[error("file not found: {path}")]
    FileNotFound {
        /// Path that was not found.
        path: PathBuf,
    },

    /// Invalid file content.
    #[error("invalid STL content: {message}")]
    InvalidContent {
        /// Description of what was invalid.
        message: String,
    },

    /// Binary STL shorter than its declared facet count.
    #[error("truncated binary STL: header declares {expected} facets, file holds {got}")]
    InvalidFaceCount {
        /// Declared facet count.
        expected: u32,
        /// Complete facets present.
        got: u32,
    },

    /// Binary STL cannot hold more than `u32::MAX` facets.
    #[error("mesh has {count} facets, more than binary STL can hold")]
    TooManyFacets {
        /// Facet count of the mesh.
        count: usize,
    },

    /// I/O error from the standard library.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Float parsing error.
    #[error("float parsing error: {0}")]
    ParseFloat(#[from] std::num::ParseFloatError),

    /// Metadata sidecar serialization error.
    #[error("metadata JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl IoError {
    /// Create an `InvalidContent` error with the given message.
    #[must_use]
    pub fn invalid_content(message: impl Into<String>) -> Self {
        Self::InvalidContent {
            message: message.into(),
        }
    }

    /// Map a failed open to [`IoError::FileNotFound`] when the file is missing.
    pub(crate) fn from_open(err: std::io::Error, path: &std::path::Path) -> Self {
        if err.kind() == std::io::ErrorKind::NotFound {
            Self::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            Self::Io(err)
        }
    }
}
