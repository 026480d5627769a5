//! drive_fetch - retrieve the contents of publicly shared Google Drive folders.
//!
//! This library provides functionality to:
//! - Resolve a folder ID from a sharing URL
//! - List the files on a folder's public browse page
//! - Bulk-download the listed files to the local filesystem
//! - Render a plain-text summary of the run
//!
//! # Example
//!
//! ```no_run
//! use drive_fetch::PublicDriveClient;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = PublicDriveClient::new("./downloads")?;
//!
//!     let summary = client
//!         .process_folder("https://drive.google.com/drive/folders/ABC123")
//!         .await?;
//!     println!("{}", summary);
//!
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod error;
pub mod listing;
pub mod models;
pub mod server;
pub mod url_parser;

// Re-exports for convenience
pub use client::{FolderLister, PublicDriveClient};
pub use error::{DriveError, Result};
pub use models::{FileCategory, FileEntry, RunSummary};
pub use url_parser::extract_folder_id;
