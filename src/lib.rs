//! `complexity-probe` library crate.
//!
//! The binary (`cprobe`) is a thin wrapper around this library so that:
//!
//! - core logic is testable without spawning processes
//! - the regression and classification layers can be reused on samples from
//!   any source (CSV, other harnesses)
//! - code stays easy to navigate as the project grows

pub mod app;
pub mod bench;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod fit;
pub mod io;
pub mod math;
pub mod models;
pub mod plot;
pub mod report;
pub mod subjects;
