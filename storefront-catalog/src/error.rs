use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading or persisting a catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The catalog file does not exist.
    #[error("Catalog not found: {}", .0.display())]
    NotFound(PathBuf),

    /// Required columns are absent from the header row.
    #[error("Catalog {} is missing required columns: {}", .path.display(), .missing.join(", "))]
    Malformed { path: PathBuf, missing: Vec<String> },

    /// I/O error while reading or writing the catalog.
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The CSV itself could not be parsed or written.
    #[error("CSV error in {}: {source}", .path.display())]
    Csv { path: PathBuf, source: csv::Error },
}

impl CatalogError {
    pub(crate) fn io(path: &std::path::Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn csv(path: &std::path::Path, source: csv::Error) -> Self {
        Self::Csv {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Columns reported missing, if this is a [`CatalogError::Malformed`].
    pub fn missing_columns(&self) -> &[String] {
        match self {
            Self::Malformed { missing, .. } => missing,
            _ => &[],
        }
    }
}
