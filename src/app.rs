//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and parses CLI arguments
//! - installs the tracing subscriber
//! - runs sweeps / classification through `pipeline`
//! - prints reports and plots
//! - writes artifacts

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::cli::{ClassifyArgs, Command, EvalArgs, PlotArgs, ReplayArgs, RunArgs};
use crate::domain::{HarnessConfig, RunConfig};
use crate::error::{AppError, EXIT_CONFIG, EXIT_DATA};
use crate::fit::SelectionPolicy;
use crate::report::ReportFile;

pub mod pipeline;

/// Entry point for the `cprobe` binary.
pub fn run() -> Result<(), AppError> {
    // Optional `.env` with CPROBE_* defaults; a missing file is fine.
    dotenvy::dotenv().ok();

    let cli = crate::cli::Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Run(args) => handle_run(args),
        Command::Classify(args) => handle_classify(args),
        Command::Eval(args) => handle_eval(args),
        Command::Replay(args) => handle_replay(args),
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    // A subscriber may already be installed when embedded; keep the existing one.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

fn handle_run(args: RunArgs) -> Result<(), AppError> {
    let config = run_config_from_args(&args);
    let policy = selection_policy(args.r2_tolerance)?;
    debug!(?config, "starting sweep");

    let run = pipeline::run_sweep(&config, policy, None)?;

    print_report(&run.report, &args.plot);
    print_failures(&run);

    if let Some(dir) = &config.out_dir {
        write_artifacts(dir, &run)?;
    }

    match run.first_error() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

fn handle_classify(args: ClassifyArgs) -> Result<(), AppError> {
    let policy = selection_policy(args.r2_tolerance)?;
    let ingested = pipeline::load_samples(&args.input)?;
    info!(rows = ingested.rows_read, skipped = ingested.row_errors.len(), "loaded samples");

    if !ingested.row_errors.is_empty() {
        eprintln!("Skipped {} malformed row(s):", ingested.row_errors.len());
        eprint!("{}", crate::report::format_row_errors(&ingested.row_errors));
    }
    if ingested.samples.is_empty() {
        return Err(AppError::new(
            EXIT_DATA,
            format!("No valid samples in '{}'", args.input.display()),
        ));
    }

    let run = pipeline::classify_samples(&ingested, policy);
    print_report(&run.report, &args.plot);
    print_failures(&run);

    if let Some(path) = &args.export_json {
        crate::io::write_report_json(path, &run.report)?;
    }

    match run.first_error() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

fn handle_eval(args: EvalArgs) -> Result<(), AppError> {
    let postfix = if args.infix {
        let converted = crate::subjects::to_postfix(&args.expression)
            .map_err(|e| AppError::new(EXIT_DATA, format!("Invalid infix expression: {e}")))?;
        println!("Postfix: {converted}");
        converted
    } else {
        args.expression
    };

    let value = crate::subjects::evaluate(&postfix)
        .map_err(|e| AppError::new(EXIT_DATA, format!("Evaluation failed: {e}")))?;
    println!("{value}");
    Ok(())
}

fn handle_replay(args: ReplayArgs) -> Result<(), AppError> {
    let text = fs::read_to_string(&args.script).map_err(|e| {
        AppError::new(EXIT_CONFIG, format!("Failed to read script '{}': {e}", args.script.display()))
    })?;
    let ops = crate::subjects::parse_script(&text)
        .map_err(|e| AppError::new(EXIT_DATA, format!("Invalid script: {e}")))?;

    let stdout = io::stdout();
    let mut machine = crate::subjects::StackMachine::new(stdout.lock());
    machine
        .run(&ops)
        .map_err(|e| AppError::new(EXIT_CONFIG, format!("Failed to write transcript: {e}")))?;
    Ok(())
}

pub fn run_config_from_args(args: &RunArgs) -> RunConfig {
    RunConfig {
        harness: HarnessConfig {
            sizes: args.sizes.clone(),
            repeats: args.repeats,
            seed: args.seed,
            target_trial_ms: args.target_trial_ms,
            max_invocations: args.max_invocations,
            parallel: args.parallel,
        },
        subjects: args.subjects.clone(),
        out_dir: args.out_dir.clone(),
    }
}

fn selection_policy(r2_tolerance: f64) -> Result<SelectionPolicy, AppError> {
    if !(r2_tolerance.is_finite() && r2_tolerance >= 0.0) {
        return Err(AppError::new(
            EXIT_CONFIG,
            format!("--r2-tolerance must be a non-negative number, got {r2_tolerance}"),
        ));
    }
    Ok(SelectionPolicy { r2_tolerance })
}

fn print_report(report: &ReportFile, plot: &PlotArgs) {
    for subject in &report.subjects {
        println!("{}", crate::report::format_subject_summary(subject));
        if plot.enabled() {
            println!(
                "{}",
                crate::plot::render_ascii_plot(&subject.samples, &subject.theoretical.fit, plot.width, plot.height)
            );
        }
    }
}

fn print_failures(run: &pipeline::RunOutput) {
    for failure in &run.failures {
        eprintln!(
            "{}: no verdict from {} sample(s): {}",
            failure.subject_label,
            failure.samples.len(),
            failure.error
        );
    }
}

/// Write per-subject CSVs and `report.json` into `dir`.
///
/// Failed subjects still get their raw samples written so the sweep is not lost.
fn write_artifacts(dir: &Path, run: &pipeline::RunOutput) -> Result<(), AppError> {
    fs::create_dir_all(dir)
        .map_err(|e| AppError::new(EXIT_CONFIG, format!("Failed to create '{}': {e}", dir.display())))?;

    for subject in &run.report.subjects {
        let stem = artifact_stem(&subject.classification.verdict.subject_label);
        crate::io::write_samples_csv(&dir.join(format!("{stem}_samples.csv")), &subject.samples)?;
        crate::io::write_samples_csv(
            &dir.join(format!("{stem}_theoretical.csv")),
            &subject.theoretical.points,
        )?;
    }
    for failure in &run.failures {
        let stem = artifact_stem(&failure.subject_label);
        crate::io::write_samples_csv(&dir.join(format!("{stem}_samples.csv")), &failure.samples)?;
    }

    crate::io::write_report_json(&dir.join("report.json"), &run.report)?;
    info!(dir = %dir.display(), "artifacts written");

    let mut err = io::stderr();
    let _ = writeln!(err, "Artifacts written to {}", dir.display());
    Ok(())
}

/// File stem for a subject label: lowercase alphanumerics joined by `_`.
pub fn artifact_stem(label: &str) -> String {
    let mut stem = String::with_capacity(label.len());
    for ch in label.chars() {
        if ch.is_ascii_alphanumeric() {
            stem.push(ch.to_ascii_lowercase());
        } else if !stem.is_empty() && !stem.ends_with('_') {
            stem.push('_');
        }
    }
    while stem.ends_with('_') {
        stem.pop();
    }
    if stem.is_empty() {
        stem.push_str("subject");
    }
    stem
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn artifact_stem_is_filesystem_friendly() {
        assert_eq!(artifact_stem("Postfix Evaluation"), "postfix_evaluation");
        assert_eq!(artifact_stem("  Stack / Ops (v2) "), "stack_ops_v2");
        assert_eq!(artifact_stem("!!"), "subject");
    }

    #[test]
    fn negative_tolerance_is_a_config_error() {
        let err = selection_policy(-0.1).unwrap_err();
        assert_eq!(err.exit_code(), EXIT_CONFIG);
        assert!(selection_policy(0.0).is_ok());
    }
}
