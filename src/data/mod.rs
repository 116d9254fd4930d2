//! Deterministic test-data generation for the benchmarked subjects.

pub mod generate;

pub use generate::*;
