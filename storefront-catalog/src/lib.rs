//! Product catalog data model, CSV loading, and repair passes.
//!
//! This crate knows nothing about HTML or images. It turns a catalog file
//! into ordered [`ProductRecord`]s, rewrites share links into direct image
//! links, backfills missing optional columns, and fixes price markers.

pub mod error;
pub mod links;
pub mod loader;
pub mod repair;
pub mod types;

pub use error::CatalogError;
pub use links::{
    LinkOutcome, NormalizeReport, is_direct_link, normalize_image_link, normalize_link,
    normalize_table,
};
pub use loader::{build_catalog, load_catalog, read_table, write_table};
pub use repair::{
    ColumnDefaults, ColumnReport, PersistOptions, PriceChange, apply_column_repair,
    plan_column_repair, repair_prices, template_table,
};
pub use types::*;
