//! Quote Analyzer library.
//!
//! Loads insurance submission logs and computes per-carrier quote rates and
//! per-line-of-business carrier breakdowns. The binary in `main.rs` wires
//! these modules into a command-line tool.

pub mod analysis;
pub mod cli;
pub mod config;
pub mod loader;
pub mod logging;
pub mod models;
pub mod report;
