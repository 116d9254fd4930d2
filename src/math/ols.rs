//! Closed-form least squares solvers.
//!
//! Two problem shapes show up in complexity fitting:
//!
//! ```text
//! y ≈ a + b·x            (straight line over a transformed size)
//! y ≈ C + B·x + A·x²     (full quadratic over the raw size)
//! ```
//!
//! Input sizes routinely span 3–4 orders of magnitude, so both solvers work on
//! shifted data:
//! - the line fit uses the centered form `b = Sxy / Sxx` instead of the
//!   sum-of-products formula, which cancels catastrophically for large `x`
//! - the quadratic fit centers and scales `x` into `[-1, 1]` before building the
//!   3×3 normal equations (raw `Σx⁴` for `x = 10⁴` is ~10¹⁶ and swamps the
//!   lower-order sums), then maps the coefficients back

use nalgebra::{Matrix3, Vector3};

/// Relative determinant floor for the scaled quadratic system.
const SINGULAR_REL: f64 = 1e-12;

/// Centering error per point, in units of `f64::EPSILON · max|x|`.
const CENTERING_ULPS: f64 = 4.0;

/// Intercept and slope of a straight-line fit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineFit {
    pub intercept: f64,
    pub slope: f64,
}

/// Fit `y ≈ intercept + slope·x` by ordinary least squares.
///
/// Returns `None` when the spread of `x` is no larger than the rounding error
/// of centering it, i.e. every `x` is the same value. Close but distinct values
/// (`10⁶`, `10⁶ + 1`) fit fine. Callers are responsible for the minimum point
/// count.
///
/// # Panics
/// Panics if `x` and `y` have different lengths.
pub fn fit_line(x: &[f64], y: &[f64]) -> Option<LineFit> {
    assert_eq!(x.len(), y.len(), "fit_line: x/y length mismatch");
    if x.is_empty() {
        return None;
    }

    let mean_x = super::mean(x);
    let mean_y = super::mean(y);

    let mut sxx = 0.0;
    let mut sxy = 0.0;
    let mut max_abs = 0.0_f64;
    for (&xi, &yi) in x.iter().zip(y) {
        let dx = xi - mean_x;
        sxx += dx * dx;
        sxy += dx * (yi - mean_y);
        max_abs = max_abs.max(xi.abs());
    }

    let rounding = CENTERING_ULPS * f64::EPSILON * max_abs;
    if !(sxx > x.len() as f64 * rounding * rounding) {
        return None;
    }

    let slope = sxy / sxx;
    let intercept = mean_y - slope * mean_x;
    Some(LineFit { intercept, slope })
}

/// Fit `y ≈ C + B·x + A·x²` by solving the 3×3 normal equations.
///
/// Returns `[C, B, A]`, or `None` when the system is singular (fewer than three
/// distinct `x` values) or the solve produced non-finite values.
///
/// # Panics
/// Panics if `x` and `y` have different lengths.
pub fn fit_quadratic(x: &[f64], y: &[f64]) -> Option<[f64; 3]> {
    assert_eq!(x.len(), y.len(), "fit_quadratic: x/y length mismatch");
    if x.len() < 3 {
        return None;
    }

    // u = (x - m) / s maps the sizes into [-1, 1].
    let m = super::mean(x);
    let s = x.iter().map(|&xi| (xi - m).abs()).fold(0.0, f64::max);
    if !(s > 0.0) {
        return None;
    }

    let (mut s1, mut s2, mut s3, mut s4) = (0.0, 0.0, 0.0, 0.0);
    let (mut t0, mut t1, mut t2) = (0.0, 0.0, 0.0);
    for (&xi, &yi) in x.iter().zip(y) {
        let u = (xi - m) / s;
        let u2 = u * u;
        s1 += u;
        s2 += u2;
        s3 += u2 * u;
        s4 += u2 * u2;
        t0 += yi;
        t1 += u * yi;
        t2 += u2 * yi;
    }
    let s0 = x.len() as f64;

    // Unknowns ordered [a', b', c'] for y ≈ a'u² + b'u + c'.
    let normal = Matrix3::new(
        s4, s3, s2, //
        s3, s2, s1, //
        s2, s1, s0,
    );
    let rhs = Vector3::new(t2, t1, t0);

    // Two distinct sizes leave the system singular in exact arithmetic but
    // rounding can hide that; reject on a relative determinant floor.
    let det = normal.determinant();
    if !(det.abs() > SINGULAR_REL * s0.powi(3)) {
        return None;
    }

    let sol = normal.lu().solve(&rhs)?;
    let (ap, bp, cp) = (sol[0], sol[1], sol[2]);

    // Undo the change of variables:
    // a'((x-m)/s)² + b'(x-m)/s + c'
    let a = ap / (s * s);
    let b = bp / s - 2.0 * ap * m / (s * s);
    let c = ap * m * m / (s * s) - bp * m / s + cp;

    if a.is_finite() && b.is_finite() && c.is_finite() {
        Some([c, b, a])
    } else {
        None
    }
}
