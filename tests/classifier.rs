//! End-to-end properties of fitting, selection and the theoretical series.

use complexity_probe::domain::{ModelFit, ModelKind, Sample};
use complexity_probe::error::FitError;
use complexity_probe::fit::{classify, fit_model, select_best, theoretical_curve};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand_distr::{Distribution, Normal};

fn samples_from(sizes: &[usize], mut f: impl FnMut(f64) -> f64) -> Vec<Sample> {
    sizes
        .iter()
        .map(|&n| Sample::new(n, f(n as f64), "fixture"))
        .collect()
}

fn linear_sizes() -> Vec<usize> {
    (1..=10).map(|i| i * 10).collect()
}

#[test]
fn classification_is_deterministic() {
    let samples = samples_from(&[10, 50, 100, 500, 1000], |n| 0.002 * n * (n + 1.0).ln() + 0.1);
    let a = classify(&samples).unwrap();
    let b = classify(&samples).unwrap();
    assert_eq!(a.verdict.model, b.verdict.model);
    assert_eq!(a.verdict.coefficient.to_bits(), b.verdict.coefficient.to_bits());
    assert_eq!(a.verdict.r_squared.to_bits(), b.verdict.r_squared.to_bits());
}

#[test]
fn exact_linear_data_is_linear() {
    let samples = samples_from(&linear_sizes(), |n| 3.0 * n);
    let c = classify(&samples).unwrap();
    assert_eq!(c.verdict.model, ModelKind::Linear);
    assert!(c.verdict.r_squared >= 0.999);
    assert!((c.verdict.coefficient - 3.0).abs() < 1e-9);
}

#[test]
fn quadratic_data_is_quadratic() {
    let samples = samples_from(&[10, 50, 100, 200, 500], |n| 0.01 * n * n + 2.0 * n + 1.0);
    let c = classify(&samples).unwrap();
    assert_eq!(c.verdict.model, ModelKind::Quadratic);
    assert!(c.verdict.r_squared >= 0.99);
    assert!((c.verdict.coefficient - 0.01).abs() / 0.01 < 0.05);

    let fit = c.chosen_fit().unwrap();
    assert!((fit.coefficients[1] - 2.0).abs() < 1e-6);
    assert!((fit.coefficients[0] - 1.0).abs() < 1e-4);
}

#[test]
fn exact_linearithmic_data_is_not_mistaken_for_linear() {
    // Over a narrow, large range n·ln(n + 1) is nearly straight (linear R² ≈ 0.9992).
    let sizes: Vec<usize> = (1..=10).map(|i| i * 1000).collect();
    let samples = samples_from(&sizes, |n| 1e-4 * n * (n + 1.0).ln());
    let c = classify(&samples).unwrap();
    assert_eq!(c.verdict.model, ModelKind::Linearithmic);
    assert!(c.verdict.r_squared > 1.0 - 1e-9);
    assert!((c.verdict.coefficient - 1e-4).abs() < 1e-12);
}

#[test]
fn noisy_linear_data_stays_linear() {
    let normal = Normal::new(0.0, 1.0).unwrap();
    for seed in 0..20 {
        let mut rng = StdRng::seed_from_u64(seed);
        let samples = samples_from(&linear_sizes(), |n| 3.0 * n + normal.sample(&mut rng));
        let c = classify(&samples).unwrap();
        assert_eq!(c.verdict.model, ModelKind::Linear, "seed {seed}");
        assert!(c.verdict.r_squared > 0.99, "seed {seed}");
    }
}

#[test]
fn single_input_size_never_yields_a_verdict() {
    let samples: Vec<Sample> = [1.0, 1.1, 0.9, 1.05, 0.95]
        .iter()
        .map(|&ms| Sample::new(50, ms, "fixture"))
        .collect();

    for model in [ModelKind::Logarithmic, ModelKind::Linear, ModelKind::Linearithmic, ModelKind::Quadratic] {
        assert!(
            matches!(fit_model(model, &samples), Err(FitError::DegenerateInput { .. })),
            "{model}"
        );
    }

    match classify(&samples) {
        Err(FitError::AllModelsFailed { excluded, .. }) => assert_eq!(excluded.len(), 5),
        other => panic!("expected AllModelsFailed, got {other:?}"),
    }
}

#[test]
fn two_samples_fit_everything_but_quadratic() {
    let samples = samples_from(&[10, 100], |n| 0.5 * n);
    for model in ModelKind::ALL {
        let result = fit_model(model, &samples);
        if model == ModelKind::Quadratic {
            assert!(matches!(result, Err(FitError::InsufficientData { .. })));
        } else {
            assert!(result.is_ok(), "{model}: {result:?}");
        }
    }
    assert!(classify(&samples).is_ok());
}

#[test]
fn one_sample_fails_every_model() {
    let samples = samples_from(&[10], |n| n);
    for model in ModelKind::ALL {
        assert!(matches!(
            fit_model(model, &samples),
            Err(FitError::InsufficientData { actual: 1, .. })
        ));
    }
    assert!(matches!(classify(&samples), Err(FitError::AllModelsFailed { .. })));
}

#[test]
fn equal_r_squared_prefers_linear_over_linearithmic() {
    let make = |model: ModelKind| ModelFit {
        model,
        coefficients: vec![0.0, 1.0],
        r_squared: 0.98,
        sse: 1.0,
        n: 5,
    };
    // Presented out of catalog order on purpose.
    let fits = vec![make(ModelKind::Linearithmic), make(ModelKind::Linear)];
    assert_eq!(select_best(&fits, 0.0).unwrap().model, ModelKind::Linear);
}

#[test]
fn theoretical_curve_round_trips() {
    let samples = samples_from(&[10, 50, 100, 500, 1000, 5000], |n| 1e-4 * n * (n + 1.0).ln() + 0.02);
    let c = classify(&samples).unwrap();
    let curve = theoretical_curve(c.verdict.model, &samples).unwrap();

    assert_eq!(curve.fit.coefficient().to_bits(), c.verdict.coefficient.to_bits());
    assert_eq!(curve.fit.r_squared.to_bits(), c.verdict.r_squared.to_bits());
    assert_eq!(curve.points.len(), samples.len());
    for (p, s) in curve.points.iter().zip(&samples) {
        assert_eq!(p.input_size, s.input_size);
        assert_eq!(p.subject_label, format!("fixture ({})", c.verdict.model.label()));
    }

    let refit = fit_model(c.verdict.model, &curve.points).unwrap();
    assert!((refit.coefficient() - c.verdict.coefficient).abs() <= 1e-9 * c.verdict.coefficient.abs().max(1.0));
    assert!(refit.r_squared > 1.0 - 1e-9);
}

#[test]
fn flat_timings_are_constant() {
    let samples = samples_from(&[10, 100, 1000], |_| 0.25);
    let c = classify(&samples).unwrap();
    assert_eq!(c.verdict.model, ModelKind::Constant);
    assert_eq!(c.verdict.r_squared, 1.0);
    assert!((c.verdict.coefficient - 0.25).abs() < 1e-12);
}
