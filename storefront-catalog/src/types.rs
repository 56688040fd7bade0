//! Data model types for the product catalog.
//!
//! The raw [`CatalogTable`] keeps every header and cell exactly as read so
//! repair steps can widen or rewrite it without losing data. [`ProductRecord`]
//! is the typed view the site generator consumes.

use std::collections::HashMap;
use std::fmt;

// ── Columns ─────────────────────────────────────────────────────────────────

pub const COL_ID: &str = "product_id";
pub const COL_NAME: &str = "product_name";
pub const COL_PRICE: &str = "price";
pub const COL_DESCRIPTION: &str = "description";
pub const COL_IMAGE_URL: &str = "image_url";
pub const COL_SOCIAL_HANDLE: &str = "instagram_handle";

/// Columns every catalog must carry, in reporting order.
pub const REQUIRED_COLUMNS: &[&str] = &[COL_ID, COL_NAME, COL_PRICE, COL_DESCRIPTION, COL_IMAGE_URL];

// ── Product ─────────────────────────────────────────────────────────────────

/// Catalog identifier of a product. Integer ids are kept in their textual form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProductId(String);

impl ProductId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the id can be embedded in an output filename as-is.
    ///
    /// Allows ASCII letters, digits, `-`, `_` and `.`, but never a bare `.`
    /// or `..`.
    pub fn is_filename_safe(&self) -> bool {
        !self.0.is_empty()
            && self.0 != "."
            && self.0 != ".."
            && self
                .0
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProductId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// One row of the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductRecord {
    pub id: ProductId,
    pub name: String,
    /// Display price, currency symbol included. Never parsed.
    pub price: String,
    pub description: String,
    pub image_url: String,
    /// Social handle from the optional handle column, possibly `@`-prefixed.
    pub social_handle: Option<String>,
}

impl ProductRecord {
    /// The social handle with any leading `@` markers removed.
    pub fn social_username(&self) -> Option<&str> {
        self.social_handle
            .as_deref()
            .map(strip_handle_marker)
            .filter(|h| !h.is_empty())
    }

    /// The first `max_chars` characters of the description.
    ///
    /// Appends `...` only when something was cut off.
    pub fn description_preview(&self, max_chars: usize) -> String {
        truncate_chars(&self.description, max_chars)
    }
}

/// Strip leading `@` markers and surrounding whitespace from a social handle.
pub fn strip_handle_marker(handle: &str) -> &str {
    handle.trim().trim_start_matches('@')
}

/// Truncate to a number of characters (not bytes), appending `...` if needed.
pub fn truncate_chars(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", s[..cut].trim_end()),
        None => s.to_string(),
    }
}

// ── Table ───────────────────────────────────────────────────────────────────

/// The catalog as a raw table: ordered headers and ordered rows of cells.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl CatalogTable {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    /// Position of a column by exact (case-sensitive) name. First match wins.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Required columns that are absent, in [`REQUIRED_COLUMNS`] order.
    pub fn missing_required(&self) -> Vec<String> {
        REQUIRED_COLUMNS
            .iter()
            .filter(|c| !self.has_column(c))
            .map(|c| c.to_string())
            .collect()
    }

    /// A cell by row and column index. Short rows read as empty.
    pub fn cell(&self, row: usize, col: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Overwrite a cell, padding a short row with empty cells first.
    pub fn set_cell(&mut self, row: usize, col: usize, value: String) {
        if let Some(r) = self.rows.get_mut(row) {
            if r.len() <= col {
                r.resize(col + 1, String::new());
            }
            r[col] = value;
        }
    }

    /// Append a column at the end, filling every row with `default`.
    pub fn push_column(&mut self, name: &str, default: &str) {
        let width = self.headers.len();
        self.headers.push(name.to_string());
        for row in &mut self.rows {
            row.resize(width, String::new());
            row.push(default.to_string());
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// ── Catalog ─────────────────────────────────────────────────────────────────

/// A row that could not become a [`ProductRecord`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRow {
    /// 1-based data row number; the header row is not counted.
    pub row: usize,
    pub reason: String,
}

/// The typed catalog, in file order.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub records: Vec<ProductRecord>,
    pub skipped: Vec<SkippedRow>,
}

impl Catalog {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Ids that occur more than once, each listed once, in first-seen order.
    pub fn duplicate_ids(&self) -> Vec<ProductId> {
        let mut counts: HashMap<&ProductId, usize> = HashMap::new();
        let mut order = Vec::new();
        for record in &self.records {
            let n = counts.entry(&record.id).or_insert(0);
            *n += 1;
            if *n == 2 {
                order.push(record.id.clone());
            }
        }
        order
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(desc: &str, handle: Option<&str>) -> ProductRecord {
        ProductRecord {
            id: ProductId::new("101"),
            name: "Kilishi".to_string(),
            price: "₦2,500".to_string(),
            description: desc.to_string(),
            image_url: String::new(),
            social_handle: handle.map(str::to_string),
        }
    }

    #[test]
    fn test_truncate_counts_chars() {
        assert_eq!(truncate_chars("₦₦₦₦", 2), "₦₦...");
        assert_eq!(truncate_chars("short", 80), "short");
        assert_eq!(truncate_chars("abcde", 5), "abcde");
    }

    #[test]
    fn test_social_username_strips_marker() {
        assert_eq!(record("", Some("@saph")).social_username(), Some("saph"));
        assert_eq!(record("", Some("saph")).social_username(), Some("saph"));
        assert_eq!(record("", Some("@")).social_username(), None);
        assert_eq!(record("", None).social_username(), None);
    }

    #[test]
    fn test_filename_safe_ids() {
        assert!(ProductId::new("101").is_filename_safe());
        assert!(ProductId::new("cake-2.v1").is_filename_safe());
        assert!(!ProductId::new("../etc").is_filename_safe());
        assert!(!ProductId::new("a b").is_filename_safe());
        assert!(!ProductId::new("..").is_filename_safe());
        assert!(!ProductId::new("").is_filename_safe());
    }

    #[test]
    fn test_push_column_pads_short_rows() {
        let mut table = CatalogTable::new(
            vec!["a".into(), "b".into()],
            vec![vec!["1".into()], vec!["2".into(), "3".into()]],
        );
        table.push_column("c", "x");
        assert_eq!(table.rows[0], vec!["1", "", "x"]);
        assert_eq!(table.rows[1], vec!["2", "3", "x"]);
    }

    #[test]
    fn test_description_preview() {
        let r = record("Spicy dried beef, thinly sliced", None);
        assert_eq!(r.description_preview(5), "Spicy...");
    }
}
