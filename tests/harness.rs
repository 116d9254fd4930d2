//! Harness behavior against deterministic fake subjects, plus smoke runs of the
//! built-in subjects.

use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use complexity_probe::app::pipeline::{classify_samples, load_samples, run_sweep};
use complexity_probe::bench::{Harness, PostfixSubject, StackScriptSubject, Subject};
use complexity_probe::domain::{HarnessConfig, ModelKind, RunConfig, Sample, SubjectKind};
use complexity_probe::error::{EXIT_CONFIG, SubjectError};
use complexity_probe::fit::SelectionPolicy;
use complexity_probe::io::{read_samples, write_report_json, write_samples, write_samples_csv};
use rand::Rng;
use rand::rngs::StdRng;

fn quick_config(sizes: &[usize], repeats: usize) -> HarnessConfig {
    HarnessConfig {
        sizes: sizes.to_vec(),
        repeats,
        seed: 7,
        target_trial_ms: 0.05,
        max_invocations: 8,
        parallel: false,
    }
}

/// Sums `size` numbers; fails generation for one poisoned size and for every
/// `fail_every`-th call.
struct FakeSubject {
    poisoned_size: Option<usize>,
    fail_every: Option<usize>,
    calls: AtomicUsize,
    cancel_at: Option<(usize, Arc<AtomicBool>)>,
}

impl FakeSubject {
    fn new() -> Self {
        Self {
            poisoned_size: None,
            fail_every: None,
            calls: AtomicUsize::new(0),
            cancel_at: None,
        }
    }
}

impl Subject for FakeSubject {
    type Input = Vec<u64>;

    fn label(&self) -> &str {
        "fake"
    }

    fn generate(&self, size: usize, rng: &mut StdRng) -> Result<Vec<u64>, SubjectError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some((at, flag)) = &self.cancel_at {
            if size >= *at {
                flag.store(true, Ordering::SeqCst);
            }
        }
        if self.poisoned_size == Some(size) {
            return Err(SubjectError::Io(io::Error::other("poisoned size")));
        }
        if let Some(every) = self.fail_every {
            if call % every == 0 {
                return Err(SubjectError::Io(io::Error::other("flaky trial")));
            }
        }
        Ok((0..size).map(|_| rng.gen_range(0..100)).collect())
    }

    fn invoke(&self, input: &Vec<u64>) -> Result<(), SubjectError> {
        std::hint::black_box(input.iter().sum::<u64>());
        Ok(())
    }
}

fn sizes_of(samples: &[Sample]) -> Vec<usize> {
    samples.iter().map(|s| s.input_size).collect()
}

#[test]
fn invalid_configs_are_rejected() {
    for config in [
        quick_config(&[], 3),
        quick_config(&[0, 10], 3),
        quick_config(&[10], 0),
        HarnessConfig {
            target_trial_ms: f64::NAN,
            ..quick_config(&[10], 1)
        },
    ] {
        let err = Harness::new(config).unwrap_err();
        assert_eq!(err.exit_code(), EXIT_CONFIG);
    }
}

#[test]
fn samples_come_out_sorted_by_size() {
    let harness = Harness::new(quick_config(&[300, 10, 100, 30], 2)).unwrap();
    let samples = harness.run(&FakeSubject::new());
    assert_eq!(sizes_of(&samples), vec![10, 30, 100, 300]);
    assert!(samples.iter().all(|s| s.duration_ms.is_finite() && s.duration_ms >= 0.0));
    assert!(samples.iter().all(|s| s.subject_label == "fake"));
}

#[test]
fn failing_trials_are_dropped_not_the_size() {
    let subject = FakeSubject {
        fail_every: Some(2),
        ..FakeSubject::new()
    };
    let harness = Harness::new(quick_config(&[10, 20, 40], 4)).unwrap();
    let samples = harness.run_sequential(&subject);
    assert_eq!(sizes_of(&samples), vec![10, 20, 40]);
}

#[test]
fn size_with_no_successful_trials_is_skipped() {
    let subject = FakeSubject {
        poisoned_size: Some(20),
        ..FakeSubject::new()
    };
    let harness = Harness::new(quick_config(&[10, 20, 40], 3)).unwrap();
    assert_eq!(sizes_of(&harness.run(&subject)), vec![10, 40]);
}

#[test]
fn parallel_sweep_matches_sequential_sizes() {
    let sizes = [5, 80, 10, 40, 20, 160];
    let sequential = Harness::new(quick_config(&sizes, 2)).unwrap();
    let parallel = Harness::new(HarnessConfig {
        parallel: true,
        ..quick_config(&sizes, 2)
    })
    .unwrap();

    let a = sequential.run(&FakeSubject::new());
    let b = parallel.run(&FakeSubject::new());
    assert_eq!(sizes_of(&a), sizes_of(&b));
}

#[test]
fn cancellation_stops_between_trials() {
    let flag = Arc::new(AtomicBool::new(false));
    let subject = FakeSubject {
        cancel_at: Some((30, flag.clone())),
        ..FakeSubject::new()
    };
    let harness = Harness::new(quick_config(&[10, 20, 30, 40], 3))
        .unwrap()
        .with_cancel_flag(flag);
    // 30 starts, trips the flag, and is dropped as incomplete; 40 never starts.
    assert_eq!(sizes_of(&harness.run(&subject)), vec![10, 20]);
}

#[test]
fn trial_inputs_are_reproducible() {
    let harness = Harness::new(quick_config(&[64], 1)).unwrap();
    let subject = FakeSubject::new();
    let mut a = complexity_probe::data::trial_rng(harness.config().seed, 64, 0);
    let mut b = complexity_probe::data::trial_rng(harness.config().seed, 64, 0);
    assert_eq!(subject.generate(64, &mut a).unwrap(), subject.generate(64, &mut b).unwrap());
}

#[test]
fn builtin_subjects_produce_samples() {
    let harness = Harness::new(quick_config(&[10, 50, 100], 2)).unwrap();

    let stack = harness.run(&StackScriptSubject);
    assert_eq!(sizes_of(&stack), vec![10, 50, 100]);
    assert!(stack.iter().all(|s| s.subject_label == SubjectKind::Stack.label()));

    let postfix = harness.run(&PostfixSubject);
    assert!(postfix.iter().all(|s| s.subject_label == SubjectKind::Postfix.label()));
}

#[test]
fn sweep_pipeline_reports_every_subject() {
    let config = RunConfig {
        harness: quick_config(&[10, 50, 100, 200], 1),
        subjects: vec![SubjectKind::Stack],
        out_dir: None,
    };
    let run = run_sweep(&config, SelectionPolicy::default(), None).unwrap();
    assert_eq!(run.report.seed, Some(7));
    assert_eq!(run.report.subjects.len() + run.failures.len(), 1);
}

#[test]
fn exported_samples_classify_after_reload() {
    let samples: Vec<Sample> = [10usize, 20, 40, 80, 160]
        .iter()
        .map(|&n| Sample::new(n, 0.003 * n as f64, "Stack Operations"))
        .collect();

    let mut buf = Vec::new();
    write_samples(&mut buf, &samples).unwrap();
    let ingested = read_samples(buf.as_slice()).unwrap();
    assert!(ingested.row_errors.is_empty());

    let run = classify_samples(&ingested, SelectionPolicy::default());
    assert!(run.failures.is_empty());
    assert_eq!(run.report.seed, None);
    let verdict = &run.report.subjects[0].classification.verdict;
    assert_eq!(verdict.model, ModelKind::Linear);
    assert_eq!(verdict.subject_label, "Stack Operations");
}

#[test]
fn saved_report_and_csv_load_the_same_samples() {
    let samples: Vec<Sample> = [10usize, 100, 1000, 10000]
        .iter()
        .map(|&n| Sample::new(n, 2e-4 * n as f64 * (n as f64 + 1.0).ln(), "Postfix Evaluation"))
        .collect();
    let dir = tempfile::tempdir().unwrap();

    let csv_path = dir.path().join("postfix_evaluation_samples.csv");
    write_samples_csv(&csv_path, &samples).unwrap();
    let from_csv = load_samples(&csv_path).unwrap();

    let run = classify_samples(&from_csv, SelectionPolicy::default());
    let json_path = dir.path().join("report.json");
    write_report_json(&json_path, &run.report).unwrap();
    let from_json = load_samples(&json_path).unwrap();

    assert_eq!(from_json.samples, from_csv.samples);
    assert!(from_json.row_errors.is_empty());

    let again = classify_samples(&from_json, SelectionPolicy::default());
    assert_eq!(
        again.report.subjects[0].classification.verdict.model,
        ModelKind::Linearithmic
    );
}
