//! Fitting routines for a single candidate model.
//!
//! Given samples `(n_i, y_i)` and a model kind we:
//! - check the point count against the model's parameter count
//! - solve for the coefficients (mean, line over a transformed axis, or
//!   quadratic normal equations)
//! - score the fit with R² at the original sizes

use crate::domain::{ModelFit, ModelKind, Sample};
use crate::error::FitError;
use crate::math::{fit_line, fit_quadratic, goodness_of_fit, mean};
use crate::models::{predict, transform};

/// Fit one model kind to a sample set.
pub fn fit_model(model: ModelKind, samples: &[Sample]) -> Result<ModelFit, FitError> {
    let n = samples.len();
    let required = model.min_samples();
    if n < required {
        return Err(FitError::InsufficientData {
            model,
            required,
            actual: n,
        });
    }

    let sizes: Vec<f64> = samples.iter().map(|s| s.input_size as f64).collect();
    let y: Vec<f64> = samples.iter().map(|s| s.duration_ms).collect();

    let coefficients = match model {
        ModelKind::Constant => vec![mean(&y)],
        ModelKind::Logarithmic | ModelKind::Linear | ModelKind::Linearithmic => {
            let x: Vec<f64> = sizes.iter().map(|&s| transform(model, s)).collect();
            let line = fit_line(&x, &y).ok_or_else(|| FitError::DegenerateInput {
                model,
                reason: "every transformed input size is the same value".to_string(),
            })?;
            vec![line.intercept, line.slope]
        }
        ModelKind::Quadratic => {
            let distinct = distinct_sizes(samples);
            if distinct < 3 {
                return Err(FitError::DegenerateInput {
                    model,
                    reason: format!("{distinct} distinct input size(s), need 3"),
                });
            }
            let [c, b, a] = fit_quadratic(&sizes, &y).ok_or_else(|| FitError::DegenerateInput {
                model,
                reason: "normal equations are singular".to_string(),
            })?;
            vec![c, b, a]
        }
    };

    if coefficients.iter().any(|c| !c.is_finite()) {
        return Err(FitError::NonFinite {
            model,
            reason: "coefficients".to_string(),
        });
    }

    let predicted: Vec<f64> = sizes
        .iter()
        .map(|&s| predict(model, s, &coefficients))
        .collect();
    if predicted.iter().any(|p| !p.is_finite()) {
        return Err(FitError::NonFinite {
            model,
            reason: "predictions".to_string(),
        });
    }

    let goodness = goodness_of_fit(&y, &predicted);

    Ok(ModelFit {
        model,
        coefficients,
        r_squared: goodness.r_squared,
        sse: goodness.sse,
        n,
    })
}

/// Number of distinct input sizes in a sample set.
pub fn distinct_sizes(samples: &[Sample]) -> usize {
    let mut sizes: Vec<usize> = samples.iter().map(|s| s.input_size).collect();
    sizes.sort_unstable();
    sizes.dedup();
    sizes.len()
}
