//! Transforms and predictions for each candidate model.
//!
//! The fitter relies on two primitive operations:
//! - map an input size onto the model's regression axis (for OLS)
//! - predict a duration at an input size given coefficients (for residuals/plots)
//!
//! Predictions always take the *original* size so that R² is judged in the same
//! domain for every model.

use crate::domain::ModelKind;

/// Regression axis for the straight-line family.
///
/// - `O(log n)`: `ln(n + 1)` (the `+1` keeps `n = 0` finite)
/// - `O(n)`: `n`
/// - `O(n log n)`: `n·ln(n + 1)`
///
/// `O(1)` and `O(n²)` are not fitted over a single transformed axis; for them
/// this returns the raw size.
pub fn transform(model: ModelKind, n: f64) -> f64 {
    match model {
        ModelKind::Logarithmic => (n + 1.0).ln(),
        ModelKind::Linearithmic => n * (n + 1.0).ln(),
        ModelKind::Constant | ModelKind::Linear | ModelKind::Quadratic => n,
    }
}

/// Predict a duration at size `n`.
///
/// # Panics
/// Panics if `coefficients` is shorter than `model.param_count()`.
pub fn predict(model: ModelKind, n: f64, coefficients: &[f64]) -> f64 {
    match model {
        ModelKind::Constant => coefficients[0],
        ModelKind::Logarithmic | ModelKind::Linear | ModelKind::Linearithmic => {
            coefficients[0] + coefficients[1] * transform(model, n)
        }
        ModelKind::Quadratic => coefficients[0] + coefficients[1] * n + coefficients[2] * n * n,
    }
}
