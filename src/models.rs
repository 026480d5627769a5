//! Data models for folder listings and download runs.

use std::path::{Path, PathBuf};

use serde::Serialize;

/// Human-readable file category, determined from the file name suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FileCategory {
    #[serde(rename = "PDF")]
    Pdf,
    #[serde(rename = "Word Document")]
    Word,
    #[serde(rename = "Excel Spreadsheet")]
    Excel,
    #[serde(rename = "PowerPoint")]
    PowerPoint,
    #[serde(rename = "Text File")]
    Text,
    #[serde(rename = "CSV File")]
    Csv,
    #[serde(rename = "JSON File")]
    Json,
    #[serde(rename = "Unknown")]
    Unknown,
}

impl FileCategory {
    /// Classify a file by its name suffix, case-insensitively.
    ///
    /// Total function: any unmapped or missing suffix yields `Unknown`.
    pub fn from_name(file_name: &str) -> Self {
        let extension = Path::new(file_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        match extension.as_deref() {
            Some("pdf") => Self::Pdf,
            Some("doc") | Some("docx") => Self::Word,
            Some("xls") | Some("xlsx") => Self::Excel,
            Some("ppt") | Some("pptx") => Self::PowerPoint,
            Some("txt") => Self::Text,
            Some("csv") => Self::Csv,
            Some("json") => Self::Json,
            _ => Self::Unknown,
        }
    }

    /// The human-readable label for this category.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Pdf => "PDF",
            Self::Word => "Word Document",
            Self::Excel => "Excel Spreadsheet",
            Self::PowerPoint => "PowerPoint",
            Self::Text => "Text File",
            Self::Csv => "CSV File",
            Self::Json => "JSON File",
            Self::Unknown => "Unknown",
        }
    }
}

impl std::fmt::Display for FileCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A file discovered in a public folder listing.
#[derive(Debug, Clone, Serialize)]
pub struct FileEntry {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub category: FileCategory,
    pub view_url: String,
}

impl std::fmt::Display for FileEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}\t{}\t{}", self.id, self.category, self.name)
    }
}

/// Outcome of one download attempt.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DownloadStatus {
    Success {
        file_path: PathBuf,
        file_size_bytes: u64,
        file_size_mb: f64,
    },
    Failed {
        error: String,
    },
}

/// A listed file together with its download outcome.
#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    #[serde(flatten)]
    pub entry: FileEntry,
    #[serde(flatten)]
    pub status: DownloadStatus,
}

impl FileReport {
    pub fn is_success(&self) -> bool {
        matches!(self.status, DownloadStatus::Success { .. })
    }
}

/// Aggregate result of one listing + download pass over a folder.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub folder_id: String,
    pub folder_url: String,
    pub download_dir: PathBuf,
    pub total_files: usize,
    pub successful_downloads: usize,
    pub failed_downloads: usize,
    pub files: Vec<FileReport>,
}

impl std::fmt::Display for RunSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Google Drive Processing Complete")?;
        writeln!(f, "=================================")?;
        writeln!(f)?;
        writeln!(f, "Folder ID: {}", self.folder_id)?;
        writeln!(f, "Total Files: {}", self.total_files)?;
        writeln!(f, "Successful Downloads: {}", self.successful_downloads)?;
        writeln!(f, "Failed Downloads: {}", self.failed_downloads)?;
        writeln!(f)?;
        writeln!(f, "Files Downloaded:")?;

        for report in &self.files {
            match &report.status {
                DownloadStatus::Success { file_size_mb, .. } => {
                    writeln!(f, "✓ {} ({:.2} MB)", report.entry.name, file_size_mb)?;
                }
                DownloadStatus::Failed { error } => {
                    writeln!(f, "✗ {} - Error: {}", report.entry.name, error)?;
                }
            }
        }

        writeln!(f)?;
        write!(f, "All files saved to: {}", self.download_dir.display())
    }
}

/// Megabytes rounded to two decimal places.
pub fn size_mb(bytes: u64) -> f64 {
    (bytes as f64 / (1024.0 * 1024.0) * 100.0).round() / 100.0
}

/// Format bytes into human-readable size.
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}
