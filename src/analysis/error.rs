use thiserror::Error;

/// Failures of the aggregation engine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    #[error("Required column '{column}' is missing from the dataset")]
    MissingColumn { column: String },

    #[error("Division by zero in {operation}: the dataset has no rows")]
    DivisionByZero { operation: &'static str },
}
