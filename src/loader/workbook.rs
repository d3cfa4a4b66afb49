use super::{header_name, LoadError};
use crate::models::{Cell, SubmissionTable};
use calamine::{open_workbook_auto, Data, Reader};
use std::path::Path;
use tracing::debug;

/// Read one worksheet of a workbook, the first one unless `sheet` names another.
pub(super) fn read_workbook(path: &Path, sheet: Option<&str>) -> Result<SubmissionTable, LoadError> {
    let mut workbook = open_workbook_auto(path)?;
    let sheet_names = workbook.sheet_names();

    let name = match sheet {
        Some(wanted) if sheet_names.iter().any(|s| s == wanted) => wanted.to_string(),
        Some(wanted) => {
            return Err(LoadError::SheetNotFound {
                name: wanted.to_string(),
                available: sheet_names.join(", "),
            })
        }
        None => sheet_names.first().cloned().ok_or(LoadError::MissingHeader)?,
    };
    debug!("Reading worksheet '{}'", name);

    let range = workbook.worksheet_range(&name)?;
    let mut rows = range.rows();
    let header = rows.next().ok_or(LoadError::MissingHeader)?;
    let columns: Vec<String> = header
        .iter()
        .enumerate()
        .map(|(i, data)| header_name(i, &cell_from_data(data).to_string()))
        .collect();

    let rows = rows
        .map(|row| row.iter().map(cell_from_data).collect())
        .collect();

    Ok(SubmissionTable::new(columns, rows))
}

/// Convert a spreadsheet value. Error cells count as empty.
fn cell_from_data(data: &Data) -> Cell {
    match data {
        Data::Empty | Data::Error(_) => Cell::Empty,
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::from_text(s),
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Float(f) => Cell::Number(*f),
        Data::Bool(b) => Cell::Bool(*b),
        Data::DateTime(dt) => Cell::Number(dt.as_f64()),
    }
}
