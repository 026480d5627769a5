//! Error types for the drive_fetch crate.

use thiserror::Error;

/// Errors that can occur when fetching from a public Google Drive folder.
#[derive(Error, Debug)]
pub enum DriveError {
    #[error("Invalid URL or ID: {0}")]
    InvalidUrlOrId(String),

    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("HTTP {status}: {message}")]
    ApiError { status: u16, message: String },

    #[error("Listing token mismatch: {ids} file ids vs {names} file names")]
    ListingMismatch { ids: usize, names: usize },

    #[error("Unsafe file name: {0}")]
    UnsafeFileName(String),

    #[error("Download directory outside allowed root: {0}")]
    UnsafeDownloadDir(String),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Result type alias for DriveError.
pub type Result<T> = std::result::Result<T, DriveError>;
