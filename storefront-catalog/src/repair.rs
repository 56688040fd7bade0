//! Column and price repair, starter templates, and persistence of repaired
//! catalogs.
//!
//! Repair is a data-migration convenience: it widens a table with default
//! values for optional columns, reports required columns it cannot invent,
//! and never drops or reorders existing data.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::CatalogError;
use crate::loader::write_table;
use crate::types::{
    COL_DESCRIPTION, COL_ID, COL_IMAGE_URL, COL_NAME, COL_PRICE, COL_SOCIAL_HANDLE, CatalogTable,
};

/// Default used when the social handle column is absent.
pub const DEFAULT_SOCIAL_HANDLE: &str = "@sisters_business";

/// Stand-in some keyboards and spreadsheets use for the naira sign.
pub const DEFAULT_PRICE_MARKER: &str = "#";
pub const DEFAULT_CURRENCY_SYMBOL: &str = "\u{20A6}";

/// Optional-but-expected columns and the value to backfill them with.
///
/// Order matters: columns are appended in this order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDefaults {
    entries: Vec<(String, String)>,
}

impl ColumnDefaults {
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Set the default for a column, replacing any earlier value.
    pub fn with(mut self, column: impl Into<String>, value: impl Into<String>) -> Self {
        let column = column.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(c, _)| *c == column) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((column, value)),
        }
        self
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(c, _)| c == column)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(c, v)| (c.as_str(), v.as_str()))
    }
}

impl Default for ColumnDefaults {
    fn default() -> Self {
        Self::empty().with(COL_SOCIAL_HANDLE, DEFAULT_SOCIAL_HANDLE)
    }
}

/// What a repair pass found.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnReport {
    /// Required columns that are absent. Only reported, never fabricated.
    pub missing_required: Vec<String>,
    /// Absent optional columns with the default they will be filled with.
    pub backfill: Vec<(String, String)>,
}

impl ColumnReport {
    /// Nothing to add and nothing missing.
    pub fn is_clean(&self) -> bool {
        self.missing_required.is_empty() && self.backfill.is_empty()
    }

    pub fn needs_backfill(&self) -> bool {
        !self.backfill.is_empty()
    }
}

/// Inspect a table for missing columns.
pub fn plan_column_repair(table: &CatalogTable, defaults: &ColumnDefaults) -> ColumnReport {
    let missing_required = table.missing_required();
    let backfill = defaults
        .iter()
        .filter(|(column, _)| !table.has_column(column))
        .filter(|(column, _)| !missing_required.iter().any(|m| m == column))
        .map(|(column, value)| (column.to_string(), value.to_string()))
        .collect();
    ColumnReport {
        missing_required,
        backfill,
    }
}

/// Append every backfillable column. Returns the number of columns added.
pub fn apply_column_repair(table: &mut CatalogTable, report: &ColumnReport) -> usize {
    let mut added = 0;
    for (column, value) in &report.backfill {
        if table.has_column(column) {
            continue;
        }
        table.push_column(column, value);
        log::debug!("Added column '{column}' with default '{value}'");
        added += 1;
    }
    added
}

// ── Prices ──────────────────────────────────────────────────────────────────

/// A price cell rewritten by [`repair_prices`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceChange {
    /// 1-based data row number.
    pub row: usize,
    pub before: String,
    pub after: String,
}

/// Replace every `marker` in the price column with `symbol`, in memory.
///
/// Returns one entry per rewritten row. An empty marker, a marker equal to
/// the symbol, or a table without a price column changes nothing.
pub fn repair_prices(table: &mut CatalogTable, marker: &str, symbol: &str) -> Vec<PriceChange> {
    let mut changes = Vec::new();
    if marker.is_empty() || marker == symbol {
        return changes;
    }
    let Some(col) = table.column_index(COL_PRICE) else {
        return changes;
    };

    for row in 0..table.len() {
        let before = table.cell(row, col);
        if !before.contains(marker) {
            continue;
        }
        let after = before.replace(marker, symbol);
        let before = before.to_string();
        log::debug!("Row {}: price {before} -> {after}", row + 1);
        table.set_cell(row, col, after.clone());
        changes.push(PriceChange {
            row: row + 1,
            before,
            after,
        });
    }
    changes
}

// ── Template ────────────────────────────────────────────────────────────────

/// A starter catalog: every expected column and two sample rows.
pub fn template_table() -> CatalogTable {
    let headers = [
        COL_ID,
        COL_NAME,
        COL_PRICE,
        COL_DESCRIPTION,
        COL_IMAGE_URL,
        COL_SOCIAL_HANDLE,
    ];
    let sample = |id: &str, name: &str, price: &str, n: u8| {
        vec![
            id.to_string(),
            name.to_string(),
            price.to_string(),
            format!("Description {n}"),
            format!("https://example.com/image{n}.jpg"),
            DEFAULT_SOCIAL_HANDLE.to_string(),
        ]
    };
    CatalogTable::new(
        headers.iter().map(|h| h.to_string()).collect(),
        vec![
            sample("101", "Product One", "\u{20A6}1500", 1),
            sample("102", "Product Two", "\u{20A6}2500", 2),
        ],
    )
}

// ── Persistence ─────────────────────────────────────────────────────────────

/// Where a repaired table is written.
#[derive(Debug, Clone, Default)]
pub struct PersistOptions {
    /// Overwrite the source file instead of writing a sibling copy.
    pub in_place: bool,
    /// With `in_place`, copy the source to `<file>.bak` first.
    pub create_backup: bool,
    /// Explicit destination; wins over both defaults.
    pub output: Option<PathBuf>,
}

/// Result of persisting a repaired table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistOutcome {
    pub written: PathBuf,
    pub backup: Option<PathBuf>,
}

/// Default non-destructive destination: `products.csv` -> `products_fixed.csv`.
pub fn fixed_copy_path(source: &Path) -> PathBuf {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "catalog".to_string());
    let ext = source
        .extension()
        .map(|e| e.to_string_lossy().into_owned())
        .unwrap_or_else(|| "csv".to_string());
    source.with_file_name(format!("{stem}_fixed.{ext}"))
}

/// Backup path: `products.csv` -> `products.csv.bak`, `products` -> `products.bak`.
pub fn backup_path(source: &Path) -> PathBuf {
    let mut name = source.file_name().unwrap_or_default().to_os_string();
    name.push(".bak");
    source.with_file_name(name)
}

/// Write a repaired table according to `options`.
pub fn persist(
    table: &CatalogTable,
    source: &Path,
    options: &PersistOptions,
) -> Result<PersistOutcome, CatalogError> {
    let target = match (&options.output, options.in_place) {
        (Some(out), _) => out.clone(),
        (None, true) => source.to_path_buf(),
        (None, false) => fixed_copy_path(source),
    };

    let mut backup = None;
    if options.create_backup && target == source && source.exists() {
        let bak = backup_path(source);
        fs::copy(source, &bak).map_err(|e| CatalogError::io(&bak, e))?;
        backup = Some(bak);
    }

    write_table(table, &target)?;
    Ok(PersistOutcome {
        written: target,
        backup,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(headers: &[&str], rows: &[&[&str]]) -> CatalogTable {
        CatalogTable::new(
            headers.iter().map(|s| s.to_string()).collect(),
            rows.iter()
                .map(|r| r.iter().map(|s| s.to_string()).collect())
                .collect(),
        )
    }

    #[test]
    fn test_plan_reports_missing_price_without_backfill() {
        let t = table(
            &["product_id", "product_name", "description", "image_url"],
            &[&["101", "Kilishi", "Spicy", "x"]],
        );
        let report = plan_column_repair(&t, &ColumnDefaults::default());
        assert_eq!(report.missing_required, vec!["price"]);
        assert_eq!(
            report.backfill,
            vec![("instagram_handle".to_string(), "@sisters_business".to_string())]
        );
    }

    #[test]
    fn test_required_column_default_is_never_applied() {
        let t = table(&["product_id"], &[&["101"]]);
        let defaults = ColumnDefaults::empty().with("price", "₦0");
        let report = plan_column_repair(&t, &defaults);
        assert!(report.backfill.is_empty());
        assert!(report.missing_required.contains(&"price".to_string()));
    }

    #[test]
    fn test_apply_appends_without_reordering() {
        let mut t = table(
            &["product_id", "product_name"],
            &[&["101", "Kilishi"], &["102", "Chin Chin"]],
        );
        let report = plan_column_repair(&t, &ColumnDefaults::default());
        assert_eq!(apply_column_repair(&mut t, &report), 1);
        assert_eq!(t.headers, vec!["product_id", "product_name", "instagram_handle"]);
        assert_eq!(t.rows[0], vec!["101", "Kilishi", "@sisters_business"]);
        assert_eq!(t.rows[1], vec!["102", "Chin Chin", "@sisters_business"]);
    }

    #[test]
    fn test_present_column_is_left_alone() {
        let mut t = table(&["instagram_handle"], &[&["@mine"]]);
        let report = plan_column_repair(&t, &ColumnDefaults::default());
        assert!(!report.needs_backfill());
        assert_eq!(apply_column_repair(&mut t, &report), 0);
        assert_eq!(t.rows[0], vec!["@mine"]);
    }

    #[test]
    fn test_defaults_with_replaces() {
        let d = ColumnDefaults::default().with("instagram_handle", "@other");
        assert_eq!(d.get("instagram_handle"), Some("@other"));
        assert_eq!(d.iter().count(), 1);
    }

    #[test]
    fn test_paths() {
        assert_eq!(
            fixed_copy_path(Path::new("/shop/products.csv")),
            PathBuf::from("/shop/products_fixed.csv")
        );
        assert_eq!(
            backup_path(Path::new("/shop/products.csv")),
            PathBuf::from("/shop/products.csv.bak")
        );
        assert_eq!(
            backup_path(Path::new("/shop/products")),
            PathBuf::from("/shop/products.bak")
        );
    }

    #[test]
    fn test_repair_prices_replaces_marker() {
        let mut t = table(
            &["product_id", "price"],
            &[&["101", "#2,500"], &["102", "\u{20A6}1500"], &["103", "#5 - #7"]],
        );
        let changes = repair_prices(&mut t, "#", "\u{20A6}");
        assert_eq!(changes.len(), 2);
        assert_eq!(changes[0].row, 1);
        assert_eq!(changes[0].before, "#2,500");
        assert_eq!(changes[0].after, "\u{20A6}2,500");
        assert_eq!(changes[1].row, 3);
        assert_eq!(t.rows[1][1], "\u{20A6}1500");
        assert_eq!(t.rows[2][1], "\u{20A6}5 - \u{20A6}7");

        assert!(repair_prices(&mut t, "#", "\u{20A6}").is_empty());
    }

    #[test]
    fn test_repair_prices_without_price_column_or_marker() {
        let mut t = table(&["product_id"], &[&["#1"]]);
        assert!(repair_prices(&mut t, "#", "\u{20A6}").is_empty());
        assert_eq!(t.rows[0][0], "#1");

        let mut t = table(&["price"], &[&["#1"]]);
        assert!(repair_prices(&mut t, "", "\u{20A6}").is_empty());
        assert_eq!(t.rows[0][0], "#1");
    }

    #[test]
    fn test_template_has_every_expected_column() {
        let t = template_table();
        assert!(t.missing_required().is_empty());
        assert!(t.has_column("instagram_handle"));
        assert_eq!(t.len(), 2);
        assert!(t.rows.iter().all(|r| r.len() == t.headers.len()));
    }
}
