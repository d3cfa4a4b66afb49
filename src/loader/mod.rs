//! Dataset loading.
//!
//! Reads a submission log from disk into a [`SubmissionTable`]. Workbooks
//! (`xlsx`, `xlsm`, `xlsb`, `xls`, `ods`) go through calamine, delimited
//! text (`csv`) through the csv crate. The first row is always the header.

mod delimited;
mod workbook;

use crate::models::SubmissionTable;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

/// Why a dataset could not be loaded.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Input file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Input path is not a file: {}", .0.display())]
    NotAFile(PathBuf),

    #[error("Unsupported file type '{extension}' (expected csv, xlsx, xlsm, xlsb, xls or ods)")]
    UnsupportedFormat { extension: String },

    #[error("Malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("Unreadable workbook: {0}")]
    Workbook(#[from] calamine::Error),

    #[error("Worksheet '{name}' not found (available: {available})")]
    SheetNotFound { name: String, available: String },

    #[error("Dataset has no header row")]
    MissingHeader,
}

/// Options controlling how a dataset is read.
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Worksheet to read from a workbook. Defaults to the first sheet.
    pub sheet: Option<String>,
}

/// Supported input formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InputFormat {
    Delimited,
    Workbook,
}

impl InputFormat {
    fn detect(path: &Path) -> Result<Self, LoadError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "csv" => Ok(InputFormat::Delimited),
            "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => Ok(InputFormat::Workbook),
            _ => Err(LoadError::UnsupportedFormat { extension }),
        }
    }
}

/// Load a dataset from `path`.
pub fn load_table(path: &Path, options: &LoadOptions) -> Result<SubmissionTable, LoadError> {
    if !path.exists() {
        return Err(LoadError::NotFound(path.to_path_buf()));
    }
    if !path.is_file() {
        return Err(LoadError::NotAFile(path.to_path_buf()));
    }

    let format = InputFormat::detect(path)?;
    debug!("Reading {} as {:?}", path.display(), format);

    let table = match format {
        InputFormat::Delimited => {
            if let Some(ref sheet) = options.sheet {
                warn!("Ignoring worksheet '{}' for delimited input", sheet);
            }
            delimited::read_csv(path)?
        }
        InputFormat::Workbook => workbook::read_workbook(path, options.sheet.as_deref())?,
    };

    warn_duplicate_columns(table.columns());
    Ok(table)
}

/// Header label for a column, naming blank headers after their position.
fn header_name(position: usize, raw: &str) -> String {
    if raw.trim().is_empty() {
        format!("Unnamed: {}", position)
    } else {
        raw.to_string()
    }
}

fn warn_duplicate_columns(columns: &[String]) {
    let mut seen = HashSet::new();
    for name in columns {
        if !seen.insert(name.as_str()) {
            warn!("Duplicate column '{}', using its first occurrence", name);
        }
    }
}
