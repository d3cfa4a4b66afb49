//! Data models for the quote analyzer.
//!
//! This module contains the in-memory submission table produced by the
//! loader and the value types derived from it by the aggregation engine.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

/// Name of the line-of-business column every dataset must carry.
pub const LOB_COLUMN: &str = "LOB";

/// Carriers tracked by default, in report order.
pub const DEFAULT_CARRIERS: [&str; 18] = [
    "AmTrust",
    "Bristol West",
    "Chubb",
    "CNA",
    "Employers",
    "Guard",
    "Hanover",
    "Hartford",
    "Hourly",
    "ICW",
    "Kemper",
    "Liberty Mutual",
    "Markel",
    "Philadelphia",
    "Preferred",
    "Stillwater",
    "Travelers",
    "UFG",
];

/// Text tokens read as missing values, the same set pandas treats as NaN.
pub const NULL_TOKENS: [&str; 19] = [
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null", "",
];

fn is_null_text(raw: &str) -> bool {
    let trimmed = raw.trim();
    NULL_TOKENS.contains(&trimmed)
}

/// Returns the default carrier list as owned strings.
pub fn default_carriers() -> Vec<String> {
    DEFAULT_CARRIERS.iter().map(|c| c.to_string()).collect()
}

/// A single cell of the submission table.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    /// No value (empty cell, blank string or spreadsheet error).
    Empty,
    /// Textual value.
    Text(String),
    /// Numeric value (integers, floats and spreadsheet dates).
    Number(f64),
    /// Boolean value.
    Bool(bool),
}

impl Cell {
    /// Builds a cell from raw text, treating blank strings and null tokens as empty.
    pub fn from_text(raw: &str) -> Self {
        if is_null_text(raw) {
            Cell::Empty
        } else {
            Cell::Text(raw.to_string())
        }
    }

    /// Whether the cell holds a value. For carrier columns this means a quote.
    pub fn is_present(&self) -> bool {
        match self {
            Cell::Empty => false,
            Cell::Text(s) => !is_null_text(s),
            Cell::Number(n) => !n.is_nan(),
            Cell::Bool(_) => true,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Empty => Ok(()),
            Cell::Text(s) => write!(f, "{}", s),
            Cell::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => write!(f, "{}", *n as i64),
            Cell::Number(n) => write!(f, "{}", n),
            Cell::Bool(b) => write!(f, "{}", b),
        }
    }
}

static EMPTY_CELL: Cell = Cell::Empty;

/// Immutable, row-oriented table of submissions.
///
/// Rows are stored positionally against `columns`. Rows shorter than the
/// header are allowed; the missing trailing cells read as [`Cell::Empty`].
#[derive(Debug, Clone)]
pub struct SubmissionTable {
    columns: Vec<String>,
    index: HashMap<String, usize>,
    rows: Vec<Vec<Cell>>,
}

impl SubmissionTable {
    /// Creates a table from a header and its rows.
    ///
    /// When a header name repeats, lookups by name resolve to its first occurrence.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        let mut index = HashMap::with_capacity(columns.len());
        for (i, name) in columns.iter().enumerate() {
            index.entry(name.clone()).or_insert(i);
        }

        Self {
            columns,
            index,
            rows,
        }
    }

    /// Column names in file order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Position of a column, matched by exact, case-sensitive name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// Number of submissions.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Iterates over the rows.
    pub fn rows(&self) -> impl Iterator<Item = Row<'_>> {
        self.rows.iter().map(|cells| Row { cells })
    }
}

/// Borrowed view of one table row.
#[derive(Debug, Clone, Copy)]
pub struct Row<'a> {
    cells: &'a [Cell],
}

impl<'a> Row<'a> {
    /// Cell at a column position, empty when the row is short.
    pub fn get(&self, column: usize) -> &'a Cell {
        self.cells.get(column).unwrap_or(&EMPTY_CELL)
    }
}

/// Quote statistics for one carrier.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CarrierStatistic {
    /// Carrier name (column header).
    pub carrier: String,
    /// Submissions this carrier quoted.
    pub quote_count: usize,
    /// `quote_count / total_submissions * 100`, rounded to 2 decimals.
    pub quote_percentage: f64,
    /// All submissions in the table.
    pub total_submissions: usize,
}

/// Carrier statistics in known-carrier order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct CarrierStatistics(Vec<CarrierStatistic>);

impl CarrierStatistics {
    pub fn new(stats: Vec<CarrierStatistic>) -> Self {
        Self(stats)
    }

    /// Looks up a carrier by name.
    pub fn get(&self, carrier: &str) -> Option<&CarrierStatistic> {
        self.0.iter().find(|s| s.carrier == carrier)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CarrierStatistic> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Key of a line-of-business partition.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum LobKey {
    /// A LOB value taken from the data.
    Named(String),
    /// Rows whose LOB cell was empty. Serializes as `null`.
    Unknown,
}

impl LobKey {
    /// Derives the partition key of a LOB cell.
    pub fn from_cell(cell: &Cell) -> Self {
        if cell.is_present() {
            LobKey::Named(cell.to_string())
        } else {
            LobKey::Unknown
        }
    }
}

impl fmt::Display for LobKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LobKey::Named(name) => write!(f, "{}", name),
            LobKey::Unknown => write!(f, "(unknown LOB)"),
        }
    }
}

impl From<&str> for LobKey {
    fn from(s: &str) -> Self {
        LobKey::Named(s.to_string())
    }
}

/// Quotes one carrier gave within a LOB.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CarrierResponse {
    pub carrier: String,
    pub quote_count: usize,
}

/// Carrier response breakdown for one line of business.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LobBreakdown {
    /// Partition key.
    pub lob: LobKey,
    /// Submissions in this LOB.
    pub total_submissions: usize,
    /// Carriers with at least one quote in this LOB, in known-carrier order.
    pub carrier_responses: Vec<CarrierResponse>,
}

impl LobBreakdown {
    /// Quote count of a carrier within this LOB, if it quoted at all.
    pub fn response_for(&self, carrier: &str) -> Option<usize> {
        self.carrier_responses
            .iter()
            .find(|r| r.carrier == carrier)
            .map(|r| r.quote_count)
    }
}

/// LOB breakdowns in order of first appearance in the table.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct LobBreakdowns(Vec<LobBreakdown>);

impl LobBreakdowns {
    pub fn new(breakdowns: Vec<LobBreakdown>) -> Self {
        Self(breakdowns)
    }

    /// Looks up a partition by key.
    pub fn get(&self, lob: &LobKey) -> Option<&LobBreakdown> {
        self.0.iter().find(|b| &b.lob == lob)
    }

    pub fn iter(&self) -> impl Iterator<Item = &LobBreakdown> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Sum of all partition sizes.
    pub fn total_submissions(&self) -> usize {
        self.0.iter().map(|b| b.total_submissions).sum()
    }
}

/// Metadata about an analysis run.
#[derive(Debug, Clone, Serialize)]
pub struct ReportMetadata {
    /// Date and time of the analysis.
    pub analysis_date: DateTime<Utc>,
    /// Number of submissions analyzed.
    pub total_records: usize,
}

/// The complete analysis report.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    /// Metadata about the report.
    pub metadata: ReportMetadata,
    /// Per-carrier quote statistics.
    pub carrier_patterns: CarrierStatistics,
    /// Per-LOB carrier responses.
    pub lob_analysis: LobBreakdowns,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_presence() {
        assert!(!Cell::Empty.is_present());
        assert!(!Cell::Text("   ".to_string()).is_present());
        assert!(!Cell::Number(f64::NAN).is_present());
        assert!(Cell::Text("x".to_string()).is_present());
        assert!(Cell::Number(0.0).is_present());
        assert!(Cell::Bool(false).is_present());
    }

    #[test]
    fn test_cell_from_text() {
        assert_eq!(Cell::from_text(""), Cell::Empty);
        assert_eq!(Cell::from_text(" \t"), Cell::Empty);
        assert_eq!(Cell::from_text("GL"), Cell::Text("GL".to_string()));
    }

    #[test]
    fn test_null_tokens_are_empty() {
        for token in ["N/A", "NA", "#N/A", "NULL", "nan", "None", " n/a "] {
            assert_eq!(Cell::from_text(token), Cell::Empty, "{:?}", token);
            assert!(!Cell::Text(token.to_string()).is_present(), "{:?}", token);
        }
        assert!(Cell::from_text("Declined").is_present());
        assert!(Cell::from_text("na").is_present());
    }

    #[test]
    fn test_cell_display() {
        assert_eq!(Cell::Number(100.0).to_string(), "100");
        assert_eq!(Cell::Number(12.5).to_string(), "12.5");
        assert_eq!(Cell::Text("WC".to_string()).to_string(), "WC");
        assert_eq!(Cell::Empty.to_string(), "");
    }

    #[test]
    fn test_table_lookup_is_case_sensitive() {
        let table = SubmissionTable::new(
            vec!["LOB".to_string(), "Chubb".to_string()],
            vec![vec![Cell::from_text("GL")]],
        );

        assert_eq!(table.column_index("Chubb"), Some(1));
        assert_eq!(table.column_index("chubb"), None);
        assert_eq!(table.column_index("LOB "), None);
    }

    #[test]
    fn test_duplicate_columns_resolve_to_first() {
        let table = SubmissionTable::new(
            vec!["Chubb".to_string(), "LOB".to_string(), "Chubb".to_string()],
            Vec::new(),
        );
        assert_eq!(table.column_index("Chubb"), Some(0));
        assert_eq!(table.columns().len(), 3);
    }

    #[test]
    fn test_short_row_reads_empty() {
        let table = SubmissionTable::new(
            vec!["LOB".to_string(), "Chubb".to_string()],
            vec![vec![Cell::from_text("GL")]],
        );
        let row = table.rows().next().unwrap();
        assert_eq!(row.get(0), &Cell::Text("GL".to_string()));
        assert_eq!(row.get(1), &Cell::Empty);
    }

    #[test]
    fn test_lob_key_from_cell() {
        assert_eq!(LobKey::from_cell(&Cell::from_text("GL")), LobKey::from("GL"));
        assert_eq!(LobKey::from_cell(&Cell::Empty), LobKey::Unknown);
        assert_eq!(LobKey::from_cell(&Cell::Number(7.0)), LobKey::from("7"));
    }

    #[test]
    fn test_unknown_lob_is_distinct_from_its_label() {
        let label = LobKey::Unknown.to_string();
        assert_ne!(LobKey::Unknown, LobKey::Named(label));
    }

    #[test]
    fn test_lob_key_serialization() {
        assert_eq!(serde_json::to_string(&LobKey::from("GL")).unwrap(), "\"GL\"");
        assert_eq!(serde_json::to_string(&LobKey::Unknown).unwrap(), "null");
    }

    #[test]
    fn test_default_carriers_order() {
        let carriers = default_carriers();
        assert_eq!(carriers.len(), 18);
        assert_eq!(carriers.first().map(String::as_str), Some("AmTrust"));
        assert_eq!(carriers.last().map(String::as_str), Some("UFG"));
    }
}
