//! Custom error types for chatsite.
//!
//! The transformation pipeline itself is total and never returns these;
//! errors arise at the edges: locating the backup source, reading JSON
//! documents, and writing the generated site.

use std::path::PathBuf;
use thiserror::Error;

/// Archive extensions the tool can extract a backup source from.
pub const SUPPORTED_ARCHIVE_EXTENSIONS: [&str; 1] = [".zip"];

/// Primary error type for chatsite operations.
#[derive(Error, Debug)]
pub enum SiteError {
    /// Backup source not found at the specified path.
    #[error("Backup not found at '{path}'")]
    BackupNotFound { path: PathBuf },

    /// Backup exists but is missing the expected directory structure.
    #[error("Invalid backup structure: expected a '{dir}' directory under '{path}'")]
    MissingBackupDir { dir: &'static str, path: PathBuf },

    /// The backup source is an archive in a container format the tool
    /// cannot extract.
    #[error(
        "Unsupported archive format '{extension}'. Supported formats are: {}",
        .supported.join(", ")
    )]
    UnsupportedFormat {
        extension: String,
        supported: Vec<&'static str>,
    },

    /// Archive extraction failed.
    #[error("Archive extraction error: {0}")]
    ZipError(#[from] zip::result::ZipError),

    /// File read/write error.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Path-specific IO error with context.
    #[error("Failed to {operation} '{path}': {source}")]
    PathError {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Catch-all for other errors with context.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for chatsite operations.
pub type Result<T> = std::result::Result<T, SiteError>;

impl SiteError {
    /// Create a backup not found error.
    pub fn backup_not_found(path: impl Into<PathBuf>) -> Self {
        Self::BackupNotFound { path: path.into() }
    }

    /// Create a missing backup directory error.
    pub fn missing_backup_dir(dir: &'static str, path: impl Into<PathBuf>) -> Self {
        Self::MissingBackupDir {
            dir,
            path: path.into(),
        }
    }

    /// Create an unsupported archive format error carrying the rejected
    /// extension and the supported set.
    pub fn unsupported_format(extension: impl Into<String>) -> Self {
        Self::UnsupportedFormat {
            extension: extension.into(),
            supported: SUPPORTED_ARCHIVE_EXTENSIONS.to_vec(),
        }
    }

    /// Create a path error with operation context.
    pub fn path_error(
        operation: &'static str,
        path: impl Into<PathBuf>,
        source: std::io::Error,
    ) -> Self {
        Self::PathError {
            operation,
            path: path.into(),
            source,
        }
    }
}
