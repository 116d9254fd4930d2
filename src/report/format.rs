//! Terminal formatting for run results.

use crate::domain::{ComplexityVerdict, Sample};
use crate::io::ingest::RowError;
use crate::report::SubjectReport;

/// Format the full per-subject summary: samples, model diagnostics, verdict.
pub fn format_subject_summary(report: &SubjectReport) -> String {
    let verdict = &report.classification.verdict;
    let mut out = String::new();

    out.push_str(&format!("=== Complexity analysis: {} ===\n", verdict.subject_label));
    out.push_str(&format_samples_table(&report.samples, &report.theoretical.points));

    out.push_str("\nModel diagnostics:\n");
    for fit in &report.classification.fits {
        let chosen = if fit.model == verdict.model { "*" } else { " " };
        out.push_str(&format!(
            "{chosen} {:<11} R²={:>9.5} coef={:>12.4e} RMSE={:.5}ms coefficients={}\n",
            fit.model.label(),
            fit.r_squared,
            fit.coefficient(),
            fit.rmse(),
            fmt_vec(&fit.coefficients),
        ));
    }
    for (kind, reason) in &report.classification.skipped {
        out.push_str(&format!("  (skipped {}) {reason}\n", kind.label()));
    }

    out.push('\n');
    out.push_str(&format_verdict(verdict));
    if let Some(fit) = report.classification.chosen_fit() {
        out.push_str(&format!("Residual RMSE: {:.5}ms over {} samples\n", fit.rmse(), fit.n));
    }
    out
}

/// Format the verdict block.
pub fn format_verdict(verdict: &ComplexityVerdict) -> String {
    let mut out = String::new();
    out.push_str(&format!("Most likely complexity: {}\n", verdict.model));
    out.push_str(&format!("Coefficient of determination (R²): {:.4}\n", verdict.r_squared));
    out.push_str(&format!("Estimated coefficient: {:.4e}\n", verdict.coefficient));
    out.push_str(&format!("Quality: {}\n", verdict.quality().description()));
    out
}

/// Format the rows skipped during CSV ingest.
pub fn format_row_errors(errors: &[RowError]) -> String {
    let mut out = String::new();
    for e in errors {
        out.push_str(&format!("  line {}: {}\n", e.line, e.message));
    }
    out
}

fn format_samples_table(samples: &[Sample], theoretical: &[Sample]) -> String {
    let mut out = String::new();
    out.push_str(&format!("{:>10} {:>14} {:>14}\n", "n", "measured_ms", "model_ms"));
    out.push_str(&format!("{:->10} {:->14} {:->14}\n", "", "", ""));
    for (i, s) in samples.iter().enumerate() {
        let model = theoretical
            .get(i)
            .map(|t| format!("{:.4}", t.duration_ms))
            .unwrap_or_default();
        out.push_str(&format!("{:>10} {:>14.4} {:>14}\n", s.input_size, s.duration_ms, model));
    }
    out
}

fn fmt_vec(v: &[f64]) -> String {
    let parts: Vec<String> = v.iter().map(|x| format!("{x:.6e}")).collect();
    format!("[{}]", parts.join(", "))
}
