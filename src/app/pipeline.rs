//! Shared pipeline logic used by the `run` and `classify` commands.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! samples -> classification -> theoretical series -> report
//!
//! The command handlers can then focus on presentation (printing and files).

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use chrono::Utc;
use tracing::{info, warn};

use crate::bench::{Harness, PostfixSubject, StackScriptSubject};
use crate::domain::{RunConfig, Sample, SubjectKind};
use crate::error::{AppError, FitError};
use crate::fit::SelectionPolicy;
use crate::io::ingest::IngestedSamples;
use crate::report::{ReportFile, build_subject_report};

/// All computed outputs of one pipeline invocation.
#[derive(Debug, Clone)]
pub struct RunOutput {
    /// Subjects that classified successfully.
    pub report: ReportFile,
    /// Subjects whose classification failed, with their samples.
    pub failures: Vec<SubjectFailure>,
}

#[derive(Debug, Clone)]
pub struct SubjectFailure {
    pub subject_label: String,
    pub samples: Vec<Sample>,
    pub error: FitError,
}

impl RunOutput {
    /// First failure as an application error, if any subject failed.
    pub fn first_error(&self) -> Option<AppError> {
        self.failures.first().map(|f| AppError::from(f.error.clone()))
    }
}

/// Sweep every configured subject, then classify each.
pub fn run_sweep(
    config: &RunConfig,
    policy: SelectionPolicy,
    cancel: Option<Arc<AtomicBool>>,
) -> Result<RunOutput, AppError> {
    let mut harness = Harness::new(config.harness.clone())?;
    if let Some(flag) = cancel {
        harness = harness.with_cancel_flag(flag);
    }

    let mut per_subject = Vec::with_capacity(config.subjects.len());
    for &kind in &config.subjects {
        let samples = sweep_subject(&harness, kind);
        info!(subject = kind.label(), samples = samples.len(), "sweep finished");
        per_subject.push((kind.label().to_string(), samples));
    }

    Ok(assemble(per_subject, policy, Some(harness.config().seed)))
}

/// Load samples for `classify` from a sample CSV or a saved JSON report.
///
/// A report contributes the raw samples of every subject it classified; its
/// earlier verdicts are ignored so the current selection policy applies.
pub fn load_samples(path: &Path) -> Result<IngestedSamples, AppError> {
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if !is_json {
        return crate::io::load_samples_csv(path);
    }

    let report = crate::io::read_report_json(path)?;
    let samples: Vec<Sample> = report
        .subjects
        .into_iter()
        .flat_map(|subject| subject.samples)
        .collect();
    Ok(IngestedSamples {
        rows_read: samples.len(),
        samples,
        row_errors: Vec::new(),
    })
}

/// Classify loaded samples, one report per `AlgorithmType`.
pub fn classify_samples(ingested: &IngestedSamples, policy: SelectionPolicy) -> RunOutput {
    assemble(ingested.by_subject(), policy, None)
}

fn sweep_subject(harness: &Harness, kind: SubjectKind) -> Vec<Sample> {
    match kind {
        SubjectKind::Postfix => harness.run(&PostfixSubject),
        SubjectKind::Stack => harness.run(&StackScriptSubject),
    }
}

fn assemble(per_subject: Vec<(String, Vec<Sample>)>, policy: SelectionPolicy, seed: Option<u64>) -> RunOutput {
    let mut subjects = Vec::new();
    let mut failures = Vec::new();

    for (label, samples) in per_subject {
        match build_subject_report(samples.clone(), policy) {
            Ok(report) => subjects.push(report),
            Err(error) => {
                warn!(subject = %label, %error, "classification failed");
                failures.push(SubjectFailure {
                    subject_label: label,
                    samples,
                    error,
                });
            }
        }
    }

    RunOutput {
        report: ReportFile {
            tool: format!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")),
            generated_at: Utc::now(),
            seed,
            selection: policy,
            subjects,
        },
        failures,
    }
}

