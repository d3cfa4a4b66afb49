//! Report formatting.

pub mod generator;

pub use generator::*;
