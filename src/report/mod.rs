//! Reporting: per-subject results, the JSON report schema, and formatted
//! terminal output.
//!
//! Formatting lives here so the fitting code stays free of presentation
//! concerns.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{Sample, TheoreticalCurve};
use crate::error::FitError;
use crate::fit::{Classification, SelectionPolicy, classify_with, theoretical_curve};

pub mod format;

pub use format::*;

/// Everything computed for one subject.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubjectReport {
    pub samples: Vec<Sample>,
    pub classification: Classification,
    pub theoretical: TheoreticalCurve,
}

/// A saved run report (JSON).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportFile {
    pub tool: String,
    pub generated_at: DateTime<Utc>,
    /// Base seed of the sweep; `None` when samples were loaded from a file.
    pub seed: Option<u64>,
    pub selection: SelectionPolicy,
    pub subjects: Vec<SubjectReport>,
}

/// Classify one subject's samples and build its theoretical series.
pub fn build_subject_report(samples: Vec<Sample>, policy: SelectionPolicy) -> Result<SubjectReport, FitError> {
    let classification = classify_with(&samples, policy)?;
    let theoretical = theoretical_curve(classification.verdict.model, &samples)?;
    Ok(SubjectReport {
        samples,
        classification,
        theoretical,
    })
}
