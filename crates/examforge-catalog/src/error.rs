//! Catalog load errors.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that stop a catalog from loading. No partial catalog is returned.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("unsupported catalog format '{extension}' for {}; expected .csv or .xlsx", path.display())]
    UnsupportedFormat { path: PathBuf, extension: String },

    #[error("missing columns in outcome catalog: {missing:?}. Required: {required:?}. Found: {found:?}")]
    MissingColumns {
        missing: Vec<String>,
        required: Vec<String>,
        found: Vec<String>,
    },

    #[error("failed to read CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to read spreadsheet: {0}")]
    Spreadsheet(#[from] calamine::Error),

    #[error("spreadsheet has no worksheet: {}", .0.display())]
    EmptyWorkbook(PathBuf),

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
