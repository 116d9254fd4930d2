use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// One timing observation for a labeled subject.
///
/// `duration_ms` is the mean elapsed time per invocation over all successful
/// trials at `input_size`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub input_size: usize,
    pub duration_ms: f64,
    pub subject_label: String,
}

impl Sample {
    pub fn new(input_size: usize, duration_ms: f64, subject_label: impl Into<String>) -> Self {
        Self {
            input_size,
            duration_ms,
            subject_label: subject_label.into(),
        }
    }
}

/// Candidate growth-rate shape.
///
/// Variant order is the catalog order used to break ties during selection:
/// an earlier (simpler) model wins over a later one with the same R².
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ModelKind {
    #[serde(rename = "O(1)")]
    Constant,
    #[serde(rename = "O(log n)")]
    Logarithmic,
    #[serde(rename = "O(n)")]
    Linear,
    #[serde(rename = "O(n log n)")]
    Linearithmic,
    #[serde(rename = "O(n²)")]
    Quadratic,
}

impl ModelKind {
    /// Every candidate, in catalog (tie-break) order.
    pub const ALL: [ModelKind; 5] = [
        ModelKind::Constant,
        ModelKind::Logarithmic,
        ModelKind::Linear,
        ModelKind::Linearithmic,
        ModelKind::Quadratic,
    ];

    /// Big-O label used in reports and exports.
    pub fn label(self) -> &'static str {
        match self {
            ModelKind::Constant => "O(1)",
            ModelKind::Logarithmic => "O(log n)",
            ModelKind::Linear => "O(n)",
            ModelKind::Linearithmic => "O(n log n)",
            ModelKind::Quadratic => "O(n²)",
        }
    }

    /// Number of fitted coefficients.
    pub fn param_count(self) -> usize {
        match self {
            ModelKind::Constant => 1,
            ModelKind::Logarithmic | ModelKind::Linear | ModelKind::Linearithmic => 2,
            ModelKind::Quadratic => 3,
        }
    }

    /// Minimum number of samples for the fit to be well-defined.
    ///
    /// The constant model is held to the same floor as the straight-line models
    /// so that "two points" is the universal minimum for classification.
    pub fn min_samples(self) -> usize {
        self.param_count().max(2)
    }
}

impl std::fmt::Display for ModelKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Fitted parameters for one candidate model.
///
/// `coefficients` are stored in ascending powers of the model's basis:
///
/// - `O(1)`: `[mean]`
/// - `O(log n)`, `O(n)`, `O(n log n)`: `[intercept, slope]` over the transformed size
/// - `O(n²)`: `[C, B, A]` for `A·n² + B·n + C`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelFit {
    pub model: ModelKind,
    pub coefficients: Vec<f64>,
    /// Coefficient of determination in the original size domain.
    pub r_squared: f64,
    /// Sum of squared residuals.
    pub sse: f64,
    pub n: usize,
}

impl ModelFit {
    /// The headline coefficient reported in a verdict.
    ///
    /// Its meaning depends on the model (see `ComplexityVerdict::coefficient`).
    pub fn coefficient(&self) -> f64 {
        match self.model {
            ModelKind::Constant => self.coefficients[0],
            ModelKind::Logarithmic | ModelKind::Linear | ModelKind::Linearithmic => {
                self.coefficients[1]
            }
            ModelKind::Quadratic => self.coefficients[2],
        }
    }

    pub fn rmse(&self) -> f64 {
        if self.n == 0 {
            return 0.0;
        }
        (self.sse / self.n as f64).sqrt()
    }
}

/// Qualitative reading of a verdict's R².
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FitQualityBand {
    High,
    Acceptable,
    Low,
}

impl FitQualityBand {
    pub fn from_r_squared(r_squared: f64) -> Self {
        if r_squared > 0.95 {
            FitQualityBand::High
        } else if r_squared > 0.85 {
            FitQualityBand::Acceptable
        } else {
            FitQualityBand::Low
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            FitQualityBand::High => "high-confidence fit",
            FitQualityBand::Acceptable => "acceptable fit",
            FitQualityBand::Low => "poor fit",
        }
    }
}

/// The classifier's answer for one subject.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplexityVerdict {
    pub subject_label: String,
    pub model: ModelKind,
    /// Leading coefficient of the chosen model. Units differ per model:
    ///
    /// - `O(1)`: mean duration in ms
    /// - `O(log n)`: ms per unit of `ln(n + 1)`
    /// - `O(n)`: ms per element
    /// - `O(n log n)`: ms per unit of `n·ln(n + 1)`
    /// - `O(n²)`: the `A` in `A·n² + B·n + C`
    pub coefficient: f64,
    /// R² of the chosen model. Never clamped; may be negative.
    pub r_squared: f64,
}

impl ComplexityVerdict {
    pub fn quality(&self) -> FitQualityBand {
        FitQualityBand::from_r_squared(self.r_squared)
    }
}

/// Noise-free curve under a chosen model, evaluated at the measured sizes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TheoreticalCurve {
    /// The refit that produced `points`; matches the verdict it was built for.
    pub fit: ModelFit,
    pub points: Vec<Sample>,
}

/// Which benchmarked operation to sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SubjectKind {
    /// Evaluate generated postfix expressions of `n` tokens.
    Postfix,
    /// Replay generated scripts of `n` stack operations through a scratch file.
    Stack,
}

impl SubjectKind {
    pub const ALL: [SubjectKind; 2] = [SubjectKind::Postfix, SubjectKind::Stack];

    pub fn label(self) -> &'static str {
        match self {
            SubjectKind::Postfix => "Postfix Evaluation",
            SubjectKind::Stack => "Stack Operations",
        }
    }
}

/// Default sweep sizes.
pub const DEFAULT_SIZES: &[usize] = &[10, 50, 100, 500, 1000, 5000, 10000];

/// Sweep configuration as understood by the harness.
///
/// Derived from CLI flags (plus defaults) and validated before any timing runs.
#[derive(Debug, Clone)]
pub struct HarnessConfig {
    /// Input sizes to probe. Sorted (stably) by the harness.
    pub sizes: Vec<usize>,
    /// Trials per size.
    pub repeats: usize,
    /// Base seed; each trial derives its own generator from `(seed, size, trial)`.
    pub seed: u64,
    /// Wall-clock budget a single trial should roughly fill (ms).
    pub target_trial_ms: f64,
    /// Upper bound on invocations per trial.
    pub max_invocations: usize,
    /// Sweep sizes on the rayon pool instead of sequentially.
    pub parallel: bool,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            sizes: DEFAULT_SIZES.to_vec(),
            repeats: 5,
            seed: 42,
            target_trial_ms: 5.0,
            max_invocations: 1000,
            parallel: false,
        }
    }
}

/// Run-level configuration for the `run` pipeline.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub harness: HarnessConfig,
    pub subjects: Vec<SubjectKind>,
    /// Where artifacts go; nothing is written when unset.
    pub out_dir: Option<std::path::PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quality_bands_use_strict_thresholds() {
        assert_eq!(FitQualityBand::from_r_squared(0.99), FitQualityBand::High);
        assert_eq!(FitQualityBand::from_r_squared(0.95), FitQualityBand::Acceptable);
        assert_eq!(FitQualityBand::from_r_squared(0.85), FitQualityBand::Low);
        assert_eq!(FitQualityBand::from_r_squared(-3.0), FitQualityBand::Low);
    }

    #[test]
    fn headline_coefficient_per_model() {
        let fit = |model, coefficients: Vec<f64>| ModelFit {
            model,
            coefficients,
            r_squared: 1.0,
            sse: 0.0,
            n: 3,
        };
        assert_eq!(fit(ModelKind::Constant, vec![2.5]).coefficient(), 2.5);
        assert_eq!(fit(ModelKind::Linear, vec![1.0, 3.0]).coefficient(), 3.0);
        assert_eq!(fit(ModelKind::Quadratic, vec![1.0, 2.0, 0.01]).coefficient(), 0.01);
    }

    #[test]
    fn model_labels_serialize_as_big_o() {
        let json = serde_json::to_string(&ModelKind::Linearithmic).unwrap();
        assert_eq!(json, "\"O(n log n)\"");
        assert_eq!(ModelKind::ALL.len(), 5);
        assert!(ModelKind::Constant < ModelKind::Quadratic);
    }
}
