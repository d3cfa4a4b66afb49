//! Aggregation engine.
//!
//! Turns a loaded [`SubmissionTable`](crate::models::SubmissionTable) into
//! per-carrier quote statistics and per-LOB carrier breakdowns.

pub mod aggregator;
pub mod clock;
pub mod error;
pub mod plan;

pub use aggregator::*;
pub use clock::{Clock, SystemClock};
pub use error::AnalysisError;
