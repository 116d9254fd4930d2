//! Summary statistics used by the fitter.

/// Relative floor on `SS_tot` below which the observations count as flat.
const FLAT_REL: f64 = 1e-20;

/// Arithmetic mean. Returns `0.0` for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Goodness of fit for a set of predictions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Goodness {
    pub r_squared: f64,
    /// `SS_res`.
    pub sse: f64,
}

/// Compute `R² = 1 - SS_res / SS_tot`.
///
/// Flat observations (`SS_tot` ≈ 0) make the ratio undefined. In that case a
/// model that reproduces the observations scores `1.0` and anything else
/// scores `0.0`, so a constant series resolves to `O(1)` through the catalog
/// tie-break rather than through NaN comparisons.
///
/// # Panics
/// Panics if the slices have different lengths.
pub fn goodness_of_fit(observed: &[f64], predicted: &[f64]) -> Goodness {
    assert_eq!(observed.len(), predicted.len(), "goodness_of_fit: length mismatch");

    let y_mean = mean(observed);
    let mut ss_tot = 0.0;
    let mut ss_res = 0.0;
    let mut ss_raw = 0.0;
    for (&y, &y_hat) in observed.iter().zip(predicted) {
        ss_tot += (y - y_mean) * (y - y_mean);
        ss_res += (y - y_hat) * (y - y_hat);
        ss_raw += y * y;
    }

    let floor = FLAT_REL * ss_raw;
    let r_squared = if ss_tot <= floor {
        if ss_res <= floor { 1.0 } else { 0.0 }
    } else {
        1.0 - ss_res / ss_tot
    };

    Goodness {
        r_squared,
        sse: ss_res,
    }
}
