use super::{header_name, LoadError};
use crate::models::{Cell, SubmissionTable};
use std::path::Path;

/// Read a comma-separated file. Rows may be shorter or longer than the header.
pub(super) fn read_csv(path: &Path) -> Result<SubmissionTable, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)?;

    let headers = reader.headers()?;
    if headers.iter().all(|h| h.trim().is_empty()) {
        return Err(LoadError::MissingHeader);
    }
    let columns: Vec<String> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| header_name(i, h))
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(Cell::from_text).collect());
    }

    Ok(SubmissionTable::new(columns, rows))
}
