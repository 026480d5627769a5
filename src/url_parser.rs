//! URL parser for extracting a folder ID from Google Drive sharing links.

use regex::Regex;
use std::sync::LazyLock;

use crate::error::{DriveError, Result};

/// Path-segment pattern: `/folders/<ID>` anywhere in the URL.
static FOLDER_SEGMENT_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"/folders/([a-zA-Z0-9_-]+)").expect("Invalid folder segment regex")
});

/// Query-parameter pattern: `?id=<ID>` or `&id=<ID>`.
static ID_PARAM_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[?&]id=([a-zA-Z0-9_-]+)").expect("Invalid id param regex"));

/// Valid raw ID pattern (alphanumeric, underscore, hyphen).
static ID_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9_-]+$").expect("Invalid ID regex"));

/// Extract a folder ID from a sharing URL, or validate a raw ID.
///
/// Supports the following input formats, first match wins:
/// - `https://drive.google.com/drive/folders/<ID>` (any `/folders/<ID>` segment)
/// - `https://drive.google.com/open?id=<ID>` (any `id` query parameter)
/// - Raw ID string
///
/// # Examples
///
/// ```
/// use drive_fetch::url_parser::extract_folder_id;
///
/// let id = extract_folder_id("https://drive.google.com/drive/folders/1abc123").unwrap();
/// assert_eq!(id, "1abc123");
///
/// let id = extract_folder_id("https://drive.google.com/open?id=1abc123").unwrap();
/// assert_eq!(id, "1abc123");
/// ```
pub fn extract_folder_id(url_or_id: &str) -> Result<String> {
    let trimmed = url_or_id.trim();

    // Try path-segment pattern
    if let Some(captures) = FOLDER_SEGMENT_REGEX.captures(trimmed) {
        if let Some(id) = captures.get(1) {
            return Ok(id.as_str().to_string());
        }
    }

    // Try id query parameter
    if let Some(captures) = ID_PARAM_REGEX.captures(trimmed) {
        if let Some(id) = captures.get(1) {
            return Ok(id.as_str().to_string());
        }
    }

    // Check if it's a raw ID
    if !trimmed.is_empty() && ID_REGEX.is_match(trimmed) {
        return Ok(trimmed.to_string());
    }

    Err(DriveError::InvalidUrlOrId(url_or_id.to_string()))
}
