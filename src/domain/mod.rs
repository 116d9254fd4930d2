//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - timing observations (`Sample`)
//! - the candidate model catalog (`ModelKind`) and fit outputs (`ModelFit`,
//!   `ComplexityVerdict`, `TheoreticalCurve`)
//! - run configuration (`HarnessConfig`, `RunConfig`, `SubjectKind`)

pub mod types;

pub use types::*;
