//! Up-front schema validation.
//!
//! Before any counting happens, every known carrier is resolved against the
//! table header once. The aggregations then walk the resulting plan instead
//! of looking up the header row by row.

use crate::models::{SubmissionTable, LOB_COLUMN};
use tracing::debug;

/// Where a known carrier lives in the table, if anywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CarrierColumn {
    Present(usize),
    Absent,
}

/// A known carrier and its resolved column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedCarrier {
    pub name: String,
    pub column: CarrierColumn,
}

/// Resolved column layout for one analysis run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnPlan {
    lob_column: Option<usize>,
    carriers: Vec<PlannedCarrier>,
}

impl ColumnPlan {
    /// Classifies each known carrier as present or absent in `table`.
    pub fn build(table: &SubmissionTable, known_carriers: &[String]) -> Self {
        let carriers: Vec<PlannedCarrier> = known_carriers
            .iter()
            .map(|name| PlannedCarrier {
                name: name.clone(),
                column: match table.column_index(name) {
                    Some(idx) => CarrierColumn::Present(idx),
                    None => CarrierColumn::Absent,
                },
            })
            .collect();

        let plan = Self {
            lob_column: table.column_index(LOB_COLUMN),
            carriers,
        };

        let absent: Vec<&str> = plan.absent_carriers().collect();
        if !absent.is_empty() {
            debug!("Carriers without a column (skipped): {}", absent.join(", "));
        }

        plan
    }

    /// Position of the LOB column.
    pub fn lob_column(&self) -> Option<usize> {
        self.lob_column
    }

    /// Carriers with a column, in known-carrier order, with their positions.
    pub fn present_carriers(&self) -> impl Iterator<Item = (&str, usize)> {
        self.carriers.iter().filter_map(|c| match c.column {
            CarrierColumn::Present(idx) => Some((c.name.as_str(), idx)),
            CarrierColumn::Absent => None,
        })
    }

    /// Carriers missing from the table.
    pub fn absent_carriers(&self) -> impl Iterator<Item = &str> {
        self.carriers
            .iter()
            .filter(|c| c.column == CarrierColumn::Absent)
            .map(|c| c.name.as_str())
    }
}
