//! CSV loading and writing for the product catalog.
//!
//! Files are decoded as UTF-8 first and fall back to Latin-1, so catalogs
//! exported by spreadsheet tools on older systems still load.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::CatalogError;
use crate::types::{
    COL_DESCRIPTION, COL_ID, COL_IMAGE_URL, COL_NAME, COL_PRICE, COL_SOCIAL_HANDLE, Catalog,
    CatalogTable, ProductId, ProductRecord, SkippedRow,
};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Text encoding a catalog file was decoded with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    Utf8,
    Latin1,
}

/// Decode catalog bytes, trying UTF-8 first and Latin-1 second.
///
/// A leading UTF-8 byte-order mark is dropped before either attempt, so a
/// spreadsheet export with a BOM and a stray Latin-1 byte keeps its first
/// header intact. Latin-1 maps every byte to the code point of the same
/// value, so the fallback cannot fail.
pub fn decode_text(mut bytes: Vec<u8>) -> (String, TextEncoding) {
    if bytes.starts_with(UTF8_BOM) {
        bytes.drain(..UTF8_BOM.len());
    }
    match String::from_utf8(bytes) {
        Ok(text) => (text, TextEncoding::Utf8),
        Err(e) => {
            let text = e.into_bytes().iter().map(|&b| b as char).collect();
            (text, TextEncoding::Latin1)
        }
    }
}

/// Read a catalog file into a raw table.
pub fn read_table(path: &Path) -> Result<CatalogTable, CatalogError> {
    if !path.exists() {
        return Err(CatalogError::NotFound(path.to_path_buf()));
    }
    let bytes = fs::read(path).map_err(|e| CatalogError::io(path, e))?;
    let (text, encoding) = decode_text(bytes);
    if encoding == TextEncoding::Latin1 {
        log::warn!(
            "{} is not valid UTF-8; decoded as Latin-1",
            path.display()
        );
    }
    parse_table(&text, path)
}

/// Parse CSV text into a raw table. `source` is used for error reporting only.
pub fn parse_table(text: &str, source: &Path) -> Result<CatalogTable, CatalogError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| CatalogError::csv(source, e))?
        .iter()
        .map(str::to_string)
        .collect();

    let mut rows = Vec::new();
    for result in reader.records() {
        match result {
            Ok(record) => rows.push(record.iter().map(str::to_string).collect()),
            Err(e) => log::warn!("Skipping malformed catalog row in {}: {e}", source.display()),
        }
    }

    Ok(CatalogTable::new(headers, rows))
}

/// Convert a raw table into typed product records.
///
/// Fails with [`CatalogError::Malformed`] naming every missing required
/// column. Rows without an id or a name are skipped and reported.
pub fn build_catalog(table: &CatalogTable, source: &Path) -> Result<Catalog, CatalogError> {
    let missing = table.missing_required();
    if !missing.is_empty() {
        return Err(CatalogError::Malformed {
            path: source.to_path_buf(),
            missing,
        });
    }

    // Presence checked above; missing_required() covers all five.
    let col = |name: &str| table.column_index(name).unwrap_or_default();
    let (id_col, name_col, price_col, desc_col, image_col) = (
        col(COL_ID),
        col(COL_NAME),
        col(COL_PRICE),
        col(COL_DESCRIPTION),
        col(COL_IMAGE_URL),
    );
    let handle_col = table.column_index(COL_SOCIAL_HANDLE);

    let mut catalog = Catalog::default();
    for row in 0..table.len() {
        let id = table.cell(row, id_col);
        let name = table.cell(row, name_col);

        let reason = if id.is_empty() {
            Some(format!("empty {COL_ID}"))
        } else if name.is_empty() {
            Some(format!("empty {COL_NAME}"))
        } else {
            None
        };
        if let Some(reason) = reason {
            log::warn!("Skipping catalog row {}: {reason}", row + 1);
            catalog.skipped.push(SkippedRow {
                row: row + 1,
                reason,
            });
            continue;
        }

        catalog.records.push(ProductRecord {
            id: ProductId::new(id),
            name: name.to_string(),
            price: table.cell(row, price_col).to_string(),
            description: table.cell(row, desc_col).to_string(),
            image_url: table.cell(row, image_col).to_string(),
            social_handle: handle_col
                .map(|c| table.cell(row, c).to_string())
                .filter(|h| !h.is_empty()),
        });
    }

    Ok(catalog)
}

/// Load a catalog file straight into typed records.
pub fn load_catalog(path: &Path) -> Result<Catalog, CatalogError> {
    let table = read_table(path)?;
    build_catalog(&table, path)
}

/// Write a table as UTF-8 CSV.
///
/// Writes to a temporary sibling first and renames it over `path`, so an
/// interrupted write never leaves a half-written catalog behind.
pub fn write_table(table: &CatalogTable, path: &Path) -> Result<(), CatalogError> {
    let mut writer = csv::WriterBuilder::new()
        .flexible(true)
        .from_writer(Vec::new());
    writer
        .write_record(&table.headers)
        .map_err(|e| CatalogError::csv(path, e))?;
    for row in &table.rows {
        let mut cells = row.clone();
        cells.resize(table.headers.len().max(row.len()), String::new());
        writer
            .write_record(&cells)
            .map_err(|e| CatalogError::csv(path, e))?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| CatalogError::io(path, e.into_error()))?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| CatalogError::io(parent, e))?;
    }
    let tmp = tmp_path(path);
    fs::write(&tmp, &bytes).map_err(|e| CatalogError::io(&tmp, e))?;
    fs::rename(&tmp, path).map_err(|e| CatalogError::io(path, e))?;
    Ok(())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}
