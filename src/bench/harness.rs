//! Timing harness.
//!
//! For every input size the harness runs `repeats` trials. Each trial:
//!
//! 1. builds the subject input from a generator seeded with `(seed, size, trial)`
//! 2. runs one untimed warm-up invocation and uses its duration as a cost estimate
//! 3. times `k` back-to-back invocations and records `elapsed / k`
//!
//! `k` shrinks as the estimated cost grows, so cheap inputs are amplified
//! until they fill roughly `target_trial_ms` of wall-clock time while expensive
//! ones run once.
//!
//! A failing trial is logged and dropped; a size with no successful trials
//! produces no sample. Trials within a size always run sequentially. Sizes may
//! run on the rayon pool when the subject is `Sync`.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::bench::subject::Subject;
use crate::data::trial_rng;
use crate::domain::{HarnessConfig, Sample};
use crate::error::{AppError, EXIT_CONFIG, SubjectError};

/// Compute the invocation count for one trial.
///
/// Non-increasing in `estimated_ms`; always in `1..=max_invocations`.
pub fn invocation_count(estimated_ms: f64, target_ms: f64, max_invocations: usize) -> usize {
    let max_invocations = max_invocations.max(1);
    if !(estimated_ms.is_finite() && estimated_ms > 0.0) {
        // Below timer resolution.
        return max_invocations;
    }
    let k = (target_ms / estimated_ms).floor();
    if !(k >= 1.0) {
        return 1;
    }
    if k >= max_invocations as f64 {
        return max_invocations;
    }
    k as usize
}

#[derive(Debug, Clone)]
pub struct Harness {
    config: HarnessConfig,
    cancel: Option<Arc<AtomicBool>>,
}

impl Harness {
    /// Validate `config` and build a harness. Sizes are sorted (stably).
    pub fn new(mut config: HarnessConfig) -> Result<Self, AppError> {
        if config.sizes.is_empty() {
            return Err(AppError::new(EXIT_CONFIG, "At least one input size is required."));
        }
        if config.sizes.contains(&0) {
            return Err(AppError::new(EXIT_CONFIG, "Input sizes must be positive."));
        }
        if config.repeats == 0 {
            return Err(AppError::new(EXIT_CONFIG, "Repeat count must be > 0."));
        }
        if !(config.target_trial_ms.is_finite() && config.target_trial_ms > 0.0) {
            return Err(AppError::new(EXIT_CONFIG, "Target trial time must be a positive number."));
        }
        if config.max_invocations == 0 {
            return Err(AppError::new(EXIT_CONFIG, "Max invocations must be > 0."));
        }

        config.sizes.sort();
        Ok(Self {
            config,
            cancel: None,
        })
    }

    /// Stop the sweep between trials once `flag` is set.
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    /// Sweep all sizes, sequentially or in parallel per `config.parallel`.
    pub fn run<S: Subject + Sync>(&self, subject: &S) -> Vec<Sample> {
        if self.config.parallel {
            self.run_parallel(subject)
        } else {
            self.run_sequential(subject)
        }
    }

    /// Sweep sizes one after another, in increasing order.
    pub fn run_sequential<S: Subject>(&self, subject: &S) -> Vec<Sample> {
        let mut samples = Vec::with_capacity(self.config.sizes.len());
        for &size in &self.config.sizes {
            if self.cancelled() {
                info!(subject = subject.label(), size, "sweep cancelled");
                break;
            }
            if let Some(sample) = self.measure_size(subject, size) {
                samples.push(sample);
            }
        }
        samples
    }

    /// Sweep sizes on the rayon pool. Output order matches `run_sequential`.
    pub fn run_parallel<S: Subject + Sync>(&self, subject: &S) -> Vec<Sample> {
        self.config
            .sizes
            .par_iter()
            .filter_map(|&size| self.measure_size(subject, size))
            .collect()
    }

    /// Measure one size: mean of the successful trials, or `None`.
    ///
    /// A size interrupted by cancellation is dropped entirely so every emitted
    /// sample averages the full set of attempted trials.
    pub fn measure_size<S: Subject>(&self, subject: &S, size: usize) -> Option<Sample> {
        let mut total_ms = 0.0;
        let mut ok = 0usize;

        for trial in 0..self.config.repeats {
            if self.cancelled() {
                debug!(subject = subject.label(), size, trial, "dropping partially measured size");
                return None;
            }
            match self.run_trial(subject, size, trial) {
                Ok(ms) => {
                    total_ms += ms;
                    ok += 1;
                }
                Err(err) => {
                    warn!(subject = subject.label(), size, trial, error = %err, "trial failed");
                }
            }
        }

        if ok == 0 {
            warn!(subject = subject.label(), size, "no successful trials; size skipped");
            return None;
        }

        let duration_ms = total_ms / ok as f64;
        debug!(
            subject = subject.label(),
            size,
            trials = ok,
            duration_ms,
            "size measured"
        );
        Some(Sample::new(size, duration_ms, subject.label()))
    }

    /// Run one trial and return the per-invocation time in milliseconds.
    pub fn run_trial<S: Subject>(&self, subject: &S, size: usize, trial: usize) -> Result<f64, SubjectError> {
        let mut rng = trial_rng(self.config.seed, size, trial);
        let input = subject.generate(size, &mut rng)?;

        let start = Instant::now();
        subject.invoke(&input)?;
        let estimated_ms = start.elapsed().as_secs_f64() * 1e3;

        let k = invocation_count(estimated_ms, self.config.target_trial_ms, self.config.max_invocations);

        let start = Instant::now();
        for _ in 0..k {
            subject.invoke(&input)?;
        }
        let elapsed_ms = start.elapsed().as_secs_f64() * 1e3;

        Ok(elapsed_ms / k as f64)
    }

    fn cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invocation_count_decreases_with_cost() {
        let mut prev = usize::MAX;
        for est in [1e-6, 1e-4, 1e-3, 0.01, 0.1, 1.0, 5.0, 50.0] {
            let k = invocation_count(est, 5.0, 1000);
            assert!(k <= prev, "k={k} prev={prev} est={est}");
            assert!((1..=1000).contains(&k));
            prev = k;
        }
        assert_eq!(invocation_count(0.0, 5.0, 1000), 1000);
        assert_eq!(invocation_count(50.0, 5.0, 1000), 1);
        assert_eq!(invocation_count(0.5, 5.0, 1000), 10);
    }

    #[test]
    fn config_validation() {
        let bad = HarnessConfig {
            sizes: vec![],
            ..HarnessConfig::default()
        };
        assert_eq!(Harness::new(bad).unwrap_err().exit_code(), EXIT_CONFIG);

        let bad = HarnessConfig {
            repeats: 0,
            ..HarnessConfig::default()
        };
        assert!(Harness::new(bad).is_err());

        let bad = HarnessConfig {
            sizes: vec![10, 0],
            ..HarnessConfig::default()
        };
        assert!(Harness::new(bad).is_err());
    }

    #[test]
    fn sizes_are_sorted() {
        let h = Harness::new(HarnessConfig {
            sizes: vec![100, 10, 50, 10],
            ..HarnessConfig::default()
        })
        .unwrap();
        assert_eq!(h.config().sizes, vec![10, 10, 50, 100]);
    }
}
