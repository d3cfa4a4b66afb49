//! Carrier and line-of-business aggregation.
//!
//! Both aggregations are pure functions of the submission table: they never
//! touch the filesystem, read the clock or mutate their input, so running
//! them twice on the same table yields identical results.

use super::clock::Clock;
use super::error::AnalysisError;
use super::plan::ColumnPlan;
use crate::models::{
    CarrierResponse, CarrierStatistic, CarrierStatistics, LobBreakdown, LobBreakdowns, LobKey,
    Report, ReportMetadata, SubmissionTable, LOB_COLUMN,
};
use std::collections::HashMap;
use tracing::{debug, info, Dispatch};

/// Compute quote statistics for every known carrier that has a column.
///
/// Carriers without a column are skipped, not reported with zero counts.
/// Every carrier shares the same denominator: the total row count.
///
/// # Errors
///
/// [`AnalysisError::DivisionByZero`] if the table has no rows.
pub fn compute_carrier_statistics(
    table: &SubmissionTable,
    known_carriers: &[String],
) -> Result<CarrierStatistics, AnalysisError> {
    let plan = ColumnPlan::build(table, known_carriers);
    carrier_statistics(table, &plan)
}

/// Compute the carrier response breakdown of each line of business.
///
/// Partitions appear in order of first appearance. Rows with an empty LOB
/// cell are collected under [`LobKey::Unknown`]. A carrier is listed for a
/// LOB only if it quoted at least once there.
///
/// # Errors
///
/// [`AnalysisError::MissingColumn`] if the table has no `LOB` column.
pub fn compute_lob_breakdown(
    table: &SubmissionTable,
    known_carriers: &[String],
) -> Result<LobBreakdowns, AnalysisError> {
    let plan = ColumnPlan::build(table, known_carriers);
    lob_breakdown(table, &plan)
}

/// Run both aggregations and stamp the result with the clock's time.
///
/// Fails fast: no report is produced if either aggregation fails.
pub fn generate_report<C: Clock + ?Sized>(
    table: &SubmissionTable,
    known_carriers: &[String],
    clock: &C,
) -> Result<Report, AnalysisError> {
    info!("Generating analysis report");

    let plan = ColumnPlan::build(table, known_carriers);
    let carrier_patterns = carrier_statistics(table, &plan)?;
    let lob_analysis = lob_breakdown(table, &plan)?;

    debug!(
        "Computed {} carrier statistics and {} LOB partitions",
        carrier_patterns.len(),
        lob_analysis.len()
    );

    Ok(Report {
        metadata: ReportMetadata {
            analysis_date: clock.now(),
            total_records: table.row_count(),
        },
        carrier_patterns,
        lob_analysis,
    })
}

/// Percentage of `count` over `total`, rounded half away from zero to 2 decimals.
///
/// `total` must be non-zero.
pub fn quote_percentage(count: usize, total: usize) -> f64 {
    let raw = (count as f64 / total as f64) * 100.0;
    (raw * 100.0).round() / 100.0
}

fn carrier_statistics(
    table: &SubmissionTable,
    plan: &ColumnPlan,
) -> Result<CarrierStatistics, AnalysisError> {
    let total = table.row_count();
    if total == 0 {
        return Err(AnalysisError::DivisionByZero {
            operation: "carrier statistics",
        });
    }

    let stats = plan
        .present_carriers()
        .map(|(carrier, column)| {
            let quote_count = table
                .rows()
                .filter(|row| row.get(column).is_present())
                .count();

            CarrierStatistic {
                carrier: carrier.to_string(),
                quote_count,
                quote_percentage: quote_percentage(quote_count, total),
                total_submissions: total,
            }
        })
        .collect();

    Ok(CarrierStatistics::new(stats))
}

/// Running counts for one LOB partition.
struct Partition {
    lob: LobKey,
    submissions: usize,
    quotes: Vec<usize>,
}

fn lob_breakdown(table: &SubmissionTable, plan: &ColumnPlan) -> Result<LobBreakdowns, AnalysisError> {
    let lob_column = plan.lob_column().ok_or_else(|| AnalysisError::MissingColumn {
        column: LOB_COLUMN.to_string(),
    })?;

    let carriers: Vec<(&str, usize)> = plan.present_carriers().collect();
    let mut partitions: Vec<Partition> = Vec::new();
    let mut positions: HashMap<LobKey, usize> = HashMap::new();

    for row in table.rows() {
        let key = LobKey::from_cell(row.get(lob_column));
        let slot = match positions.get(&key) {
            Some(&slot) => slot,
            None => {
                partitions.push(Partition {
                    lob: key.clone(),
                    submissions: 0,
                    quotes: vec![0; carriers.len()],
                });
                positions.insert(key, partitions.len() - 1);
                partitions.len() - 1
            }
        };

        let partition = &mut partitions[slot];
        partition.submissions += 1;
        for (count, (_, column)) in partition.quotes.iter_mut().zip(&carriers) {
            if row.get(*column).is_present() {
                *count += 1;
            }
        }
    }

    let breakdowns = partitions
        .into_iter()
        .map(|partition| LobBreakdown {
            lob: partition.lob,
            total_submissions: partition.submissions,
            carrier_responses: carriers
                .iter()
                .zip(partition.quotes)
                .filter(|(_, count)| *count > 0)
                .map(|((carrier, _), quote_count)| CarrierResponse {
                    carrier: carrier.to_string(),
                    quote_count,
                })
                .collect(),
        })
        .collect();

    Ok(LobBreakdowns::new(breakdowns))
}

/// Runs report generation against an injected log sink.
///
/// Everything the engine logs while producing a report goes to `dispatch`
/// rather than to whatever subscriber happens to be global.
pub struct Analyzer<C: Clock> {
    carriers: Vec<String>,
    clock: C,
    dispatch: Dispatch,
}

impl<C: Clock> Analyzer<C> {
    pub fn new(carriers: Vec<String>, clock: C, dispatch: Dispatch) -> Self {
        Self {
            carriers,
            clock,
            dispatch,
        }
    }

    /// Produce a report for `table`.
    pub fn run(&self, table: &SubmissionTable) -> Result<Report, AnalysisError> {
        tracing::dispatcher::with_default(&self.dispatch, || {
            generate_report(table, &self.carriers, &self.clock)
        })
    }
}
