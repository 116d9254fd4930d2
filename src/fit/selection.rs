//! Model selection across the candidate catalog.
//!
//! For one subject's samples the classifier fits every model in catalog order
//! and scores each with R² in the original size domain.
//!
//! Selection rules:
//! 1. Exclude models whose fit fails (too few samples, degenerate sizes,
//!    non-finite output). Record why.
//! 2. Among `O(1)`, `O(log n)`, `O(n)` and `O(n log n)` take the highest R².
//!    R² values within `TIE_EPS` of each other tie, and a tie goes to the
//!    earlier model in catalog order.
//! 3. `O(n²)` displaces that winner only when its R² is higher by more than
//!    `r2_tolerance`. With a zero tolerance it must simply be strictly higher.
//!
//! Rule 3 exists because the quadratic nests the constant and linear models:
//! on noisy linear timings its R² is always a hair higher. The straight-line
//! models do not nest one another, so they compete on R² alone.

use serde::{Deserialize, Serialize};

use crate::domain::{ComplexityVerdict, ModelFit, ModelKind, Sample, TheoreticalCurve};
use crate::error::FitError;
use crate::fit::fitter::{distinct_sizes, fit_model};
use crate::models::predict;

/// R² differences at or below this are rounding noise, not evidence.
const TIE_EPS: f64 = 1e-12;

/// Default R² margin the quadratic must clear over the best straight-line fit.
pub const DEFAULT_R2_TOLERANCE: f64 = 1e-3;

/// Knobs for model selection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SelectionPolicy {
    /// Extra R² the quadratic needs to displace `O(1)`..`O(n log n)`.
    pub r2_tolerance: f64,
}

impl Default for SelectionPolicy {
    fn default() -> Self {
        Self {
            r2_tolerance: DEFAULT_R2_TOLERANCE,
        }
    }
}

/// Output of fitting + selection for one subject.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Classification {
    pub verdict: ComplexityVerdict,
    /// Fits for every model that could be fitted, in catalog order.
    pub fits: Vec<ModelFit>,
    /// Models that were excluded and why.
    pub skipped: Vec<(ModelKind, String)>,
}

impl Classification {
    /// The fit backing the verdict.
    pub fn chosen_fit(&self) -> Option<&ModelFit> {
        self.fits.iter().find(|f| f.model == self.verdict.model)
    }
}

/// Classify with the default selection policy.
pub fn classify(samples: &[Sample]) -> Result<Classification, FitError> {
    classify_with(samples, SelectionPolicy::default())
}

/// Fit every candidate model and select the best one.
///
/// Fails with `AllModelsFailed` when no model survives. A sample set whose
/// sizes are all identical says nothing about growth, so every model
/// (including `O(1)`) is excluded in that case.
pub fn classify_with(samples: &[Sample], policy: SelectionPolicy) -> Result<Classification, FitError> {
    let subject = subject_label(samples);

    let mut fits = Vec::with_capacity(ModelKind::ALL.len());
    let mut skipped = Vec::new();

    let single_size = samples.len() >= 2 && distinct_sizes(samples) < 2;

    for model in ModelKind::ALL {
        if single_size && model == ModelKind::Constant {
            skipped.push((model, "growth is undefined for a single input size".to_string()));
            continue;
        }
        match fit_model(model, samples) {
            Ok(fit) if fit.r_squared.is_finite() => fits.push(fit),
            Ok(_) => skipped.push((model, "non-finite R²".to_string())),
            Err(err) => skipped.push((model, err.to_string())),
        }
    }

    let Some(best) = select_best(&fits, policy.r2_tolerance) else {
        return Err(FitError::AllModelsFailed {
            subject,
            excluded: skipped,
        });
    };

    let verdict = ComplexityVerdict {
        subject_label: subject,
        model: best.model,
        coefficient: best.coefficient(),
        r_squared: best.r_squared,
    };

    Ok(Classification {
        verdict,
        fits,
        skipped,
    })
}

/// Pick the winning fit.
///
/// Order of `fits` does not matter; catalog order is applied here.
pub fn select_best(fits: &[ModelFit], r2_tolerance: f64) -> Option<&ModelFit> {
    let simple = best_in_catalog_order(fits.iter().filter(|f| f.model != ModelKind::Quadratic));
    let quadratic = fits
        .iter()
        .find(|f| f.model == ModelKind::Quadratic && f.r_squared.is_finite());

    match (simple, quadratic) {
        (Some(s), Some(q)) if q.r_squared > s.r_squared + r2_tolerance.max(0.0) => Some(q),
        (Some(s), _) => Some(s),
        (None, q) => q,
    }
}

/// Highest R² with ties going to the earliest model in catalog order.
fn best_in_catalog_order<'a>(fits: impl Iterator<Item = &'a ModelFit>) -> Option<&'a ModelFit> {
    let candidates: Vec<&ModelFit> = fits.filter(|f| f.r_squared.is_finite()).collect();
    let best_r2 = candidates
        .iter()
        .map(|f| f.r_squared)
        .fold(f64::NEG_INFINITY, f64::max);

    ModelKind::ALL.into_iter().find_map(|kind| {
        candidates
            .iter()
            .copied()
            .find(|f| f.model == kind && f.r_squared >= best_r2 - TIE_EPS)
    })
}

/// Build the noise-free curve for `model` at the measured sizes.
///
/// The model is refit on the same samples the verdict came from, so the curve
/// and the reported coefficient always agree.
pub fn theoretical_curve(model: ModelKind, samples: &[Sample]) -> Result<TheoreticalCurve, FitError> {
    let fit = fit_model(model, samples)?;
    let points = samples
        .iter()
        .map(|s| {
            Sample::new(
                s.input_size,
                predict(model, s.input_size as f64, &fit.coefficients),
                format!("{} ({})", s.subject_label, model.label()),
            )
        })
        .collect();

    Ok(TheoreticalCurve { fit, points })
}

fn subject_label(samples: &[Sample]) -> String {
    samples
        .first()
        .map(|s| s.subject_label.clone())
        .unwrap_or_default()
}
