//! Parser for the public folder browse page.
//!
//! The public HTML view embeds one `data-id` attribute and one
//! `data-tooltip` attribute per listed file. The two token sequences are
//! extracted independently and paired by position, so their lengths must
//! match exactly; a mismatch is reported as an error rather than zipped
//! to the shorter sequence, since that would silently corrupt the
//! id-to-name mapping.
//!
//! The page format is not a contract. Keeping the extraction here, behind
//! [`parse_listing`], leaves the rest of the crate indifferent to how the
//! listing is obtained.

use regex::Regex;
use std::sync::LazyLock;

use crate::error::{DriveError, Result};

static FILE_ID_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"data-id="([a-zA-Z0-9_-]+)""#).expect("Invalid file id regex")
});

static FILE_NAME_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"data-tooltip="([^"]+)""#).expect("Invalid file name regex")
});

/// An id/name pair extracted from the browse page, in page order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListedFile {
    pub id: String,
    pub name: String,
}

/// Extract the listed files from the raw HTML of a folder browse page.
///
/// Returns an empty vector when the page contains no file markup at all,
/// and `ListingMismatch` when the id and name sequences disagree in
/// length.
pub fn parse_listing(html: &str) -> Result<Vec<ListedFile>> {
    let ids: Vec<&str> = FILE_ID_REGEX
        .captures_iter(html)
        .filter_map(|c| c.get(1).map(|m| m.as_str()))
        .collect();

    let names: Vec<&str> = FILE_NAME_REGEX
        .captures_iter(html)
        .filter_map(|c| c.get(1).map(|m| m.as_str()))
        .collect();

    if ids.len() != names.len() {
        return Err(DriveError::ListingMismatch {
            ids: ids.len(),
            names: names.len(),
        });
    }

    Ok(ids
        .into_iter()
        .zip(names)
        .map(|(id, name)| ListedFile {
            id: id.to_string(),
            name: name.to_string(),
        })
        .collect())
}
