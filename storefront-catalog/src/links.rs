//! Image link normalization.
//!
//! Cloud-storage share links open a viewer page instead of returning image
//! bytes. This module rewrites them into the service's direct-fetch form.

use crate::types::{COL_IMAGE_URL, CatalogTable};

/// Path fragment identifying a Google Drive share link.
const SHARE_LINK_MARKER: &str = "drive.google.com/file/d/";

/// Direct-fetch endpoint; the file id is appended.
const DIRECT_LINK_PREFIX: &str = "https://drive.google.com/uc?export=view&id=";

/// Result of normalizing a single image reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkOutcome {
    /// Not a share link; left as-is.
    Unchanged,
    /// A share link rewritten to its direct form.
    Rewritten(String),
    /// Looks like a share link but carries no file id; left as-is.
    Unextractable,
}

/// Classify and, where possible, rewrite an image reference.
pub fn normalize_image_link(url: &str) -> LinkOutcome {
    let Some(start) = url.find(SHARE_LINK_MARKER) else {
        return LinkOutcome::Unchanged;
    };
    match extract_file_id(url, start) {
        Some(id) => LinkOutcome::Rewritten(format!("{DIRECT_LINK_PREFIX}{id}")),
        None => LinkOutcome::Unextractable,
    }
}

/// Normalize an image reference, returning the reference to use.
///
/// Idempotent: a rewritten link is already in direct form.
pub fn normalize_link(url: &str) -> String {
    match normalize_image_link(url) {
        LinkOutcome::Rewritten(direct) => direct,
        LinkOutcome::Unchanged | LinkOutcome::Unextractable => url.to_string(),
    }
}

/// Whether a reference can be fetched as image bytes without a viewer page.
pub fn is_direct_link(url: &str) -> bool {
    !url.contains(SHARE_LINK_MARKER)
}

/// The file id sits between `/d/` and the next `/`, `?` or `#`.
fn extract_file_id(url: &str, marker_start: usize) -> Option<&str> {
    let rest = &url[marker_start + SHARE_LINK_MARKER.len()..];
    let end = rest.find(['/', '?', '#']).unwrap_or(rest.len());
    let id = &rest[..end];
    if id.is_empty() { None } else { Some(id) }
}

/// Per-row outcome of normalizing a table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkChange {
    /// 1-based data row number.
    pub row: usize,
    pub before: String,
    pub outcome: LinkOutcome,
}

/// Summary of normalizing every image reference in a table.
#[derive(Debug, Clone, Default)]
pub struct NormalizeReport {
    pub changes: Vec<LinkChange>,
}

impl NormalizeReport {
    pub fn rewritten(&self) -> usize {
        self.count(|o| matches!(o, LinkOutcome::Rewritten(_)))
    }

    pub fn unchanged(&self) -> usize {
        self.count(|o| matches!(o, LinkOutcome::Unchanged))
    }

    pub fn unextractable(&self) -> usize {
        self.count(|o| matches!(o, LinkOutcome::Unextractable))
    }

    /// True when the table was modified and should be persisted.
    pub fn has_rewrites(&self) -> bool {
        self.rewritten() > 0
    }

    fn count(&self, pred: impl Fn(&LinkOutcome) -> bool) -> usize {
        self.changes.iter().filter(|c| pred(&c.outcome)).count()
    }
}

/// Rewrite the image column of a table in memory.
///
/// A table without an image column is returned untouched with an empty
/// report. Unextractable links are logged as warnings and left alone.
pub fn normalize_table(table: &mut CatalogTable) -> NormalizeReport {
    let mut report = NormalizeReport::default();
    let Some(col) = table.column_index(COL_IMAGE_URL) else {
        return report;
    };

    for row in 0..table.len() {
        let before = table.cell(row, col).to_string();
        let outcome = normalize_image_link(&before);
        match &outcome {
            LinkOutcome::Rewritten(direct) => {
                log::debug!("Row {}: {before} -> {direct}", row + 1);
                table.set_cell(row, col, direct.clone());
            }
            LinkOutcome::Unextractable => {
                log::warn!("Row {}: could not extract a file id from {before}", row + 1);
            }
            LinkOutcome::Unchanged => {}
        }
        report.changes.push(LinkChange {
            row: row + 1,
            before,
            outcome,
        });
    }

    report
}
