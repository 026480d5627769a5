//! HTTP client for public Google Drive folders.

use std::path::{Path, PathBuf};

use futures::StreamExt;
use reqwest::Client;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

use crate::error::{DriveError, Result};
use crate::listing::parse_listing;
use crate::models::{size_mb, DownloadStatus, FileCategory, FileEntry, FileReport, RunSummary};
use crate::url_parser::extract_folder_id;

/// Base URL of the public Drive endpoints.
const DEFAULT_BASE_URL: &str = "https://drive.google.com";

/// Source of folder listings.
///
/// The only implementation scrapes the public HTML browse page; an
/// authenticated listing API backend would slot in behind the same trait.
pub trait FolderLister {
    fn list_folder(
        &self,
        folder_id: &str,
    ) -> impl std::future::Future<Output = Result<Vec<FileEntry>>> + Send;
}

/// A file persisted to the download directory.
#[derive(Debug, Clone)]
pub struct DownloadedFile {
    pub path: PathBuf,
    pub size_bytes: u64,
}

/// Client for listing and downloading files from a publicly shared folder.
pub struct PublicDriveClient {
    base_url: String,
    download_dir: PathBuf,
    http: Client,
}

impl PublicDriveClient {
    /// Create a new client writing downloads under `download_dir`.
    ///
    /// The directory is created if it does not exist.
    pub fn new<P: AsRef<Path>>(download_dir: P) -> Result<Self> {
        Self::with_base_url(DEFAULT_BASE_URL, download_dir)
    }

    /// Create a client against an alternative base URL (used by tests).
    pub fn with_base_url<P: AsRef<Path>>(base_url: &str, download_dir: P) -> Result<Self> {
        let download_dir = download_dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&download_dir)?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            download_dir,
            http: Client::new(),
        })
    }

    /// Get the download directory.
    pub fn download_dir(&self) -> &Path {
        &self.download_dir
    }

    fn browse_url(&self, folder_id: &str) -> String {
        format!("{}/drive/folders/{}", self.base_url, folder_id)
    }

    fn direct_download_url(&self, file_id: &str) -> String {
        format!("{}/uc?export=download&id={}", self.base_url, file_id)
    }

    fn view_url(&self, file_id: &str) -> String {
        format!("{}/file/d/{}/view", self.base_url, file_id)
    }

    /// List all files visible on the folder's public browse page.
    ///
    /// A network or HTTP failure is an error, never an empty list; an
    /// empty `Ok` means the page rendered no file markup.
    pub async fn list_files(&self, folder_id: &str) -> Result<Vec<FileEntry>> {
        let response = self.http.get(self.browse_url(folder_id)).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(DriveError::ApiError {
                status: status.as_u16(),
                message: status.canonical_reason().unwrap_or("request failed").to_string(),
            });
        }

        let body = response.text().await?;
        let listed = parse_listing(&body)?;
        debug!(folder_id, count = listed.len(), "parsed folder listing");

        Ok(listed
            .into_iter()
            .map(|file| FileEntry {
                category: FileCategory::from_name(&file.name),
                view_url: self.view_url(&file.id),
                id: file.id,
                name: file.name,
            })
            .collect())
    }

    /// Download a single file into the download directory.
    ///
    /// The display name is scraped from an untrusted page, so names that
    /// would resolve outside the download directory are rejected before
    /// any I/O. An existing file with the same name is overwritten.
    pub async fn download_file(&self, file_id: &str, file_name: &str) -> Result<DownloadedFile> {
        let file_name = sanitize_file_name(file_name)?;
        let path = self.download_dir.join(file_name);

        let response = self
            .http
            .get(self.direct_download_url(file_id))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(DriveError::ApiError {
                status: status.as_u16(),
                message: status.canonical_reason().unwrap_or("request failed").to_string(),
            });
        }

        // Stream to file in bounded chunks
        let mut file = File::create(&path).await?;
        let mut stream = response.bytes_stream();
        let mut size_bytes: u64 = 0;

        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            size_bytes += chunk.len() as u64;
            file.write_all(&chunk).await?;
        }

        file.flush().await?;

        Ok(DownloadedFile { path, size_bytes })
    }

    /// Run one full listing + download pass over a folder sharing URL.
    ///
    /// Resolver and listing failures abort the run; a failed download is
    /// recorded in the summary and the remaining files are still
    /// attempted, in page order, one at a time.
    pub async fn process_folder(&self, url: &str) -> Result<RunSummary> {
        let folder_id = extract_folder_id(url)?;
        info!(folder_id = %folder_id, "processing folder");

        let entries = self.list_files(&folder_id).await?;
        info!(folder_id = %folder_id, total = entries.len(), "listing complete");

        let mut files = Vec::with_capacity(entries.len());
        let mut successful_downloads = 0;
        let mut failed_downloads = 0;

        for entry in entries {
            let status = match self.download_file(&entry.id, &entry.name).await {
                Ok(downloaded) => {
                    successful_downloads += 1;
                    DownloadStatus::Success {
                        file_size_mb: size_mb(downloaded.size_bytes),
                        file_path: downloaded.path,
                        file_size_bytes: downloaded.size_bytes,
                    }
                }
                Err(e) => {
                    failed_downloads += 1;
                    warn!(file = %entry.name, error = %e, "download failed");
                    DownloadStatus::Failed { error: e.to_string() }
                }
            };

            files.push(FileReport { entry, status });
        }

        Ok(RunSummary {
            folder_id,
            folder_url: url.to_string(),
            download_dir: self.download_dir.clone(),
            total_files: files.len(),
            successful_downloads,
            failed_downloads,
            files,
        })
    }
}

impl FolderLister for PublicDriveClient {
    async fn list_folder(&self, folder_id: &str) -> Result<Vec<FileEntry>> {
        self.list_files(folder_id).await
    }
}

/// Reject scraped display names that would escape the download directory.
fn sanitize_file_name(name: &str) -> Result<&str> {
    let unsafe_name = name.is_empty()
        || name == "."
        || name == ".."
        || name.contains('/')
        || name.contains('\\')
        || name.contains('\0');

    if unsafe_name {
        return Err(DriveError::UnsafeFileName(name.to_string()));
    }

    Ok(name)
}
