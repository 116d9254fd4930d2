//! Command-line parsing for the complexity probe.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the measurement and fitting code.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::{DEFAULT_SIZES, SubjectKind};
use crate::fit::DEFAULT_R2_TOLERANCE;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "cprobe",
    version,
    about = "Empirical complexity probe: time an operation across input sizes and classify its growth"
)]
pub struct Cli {
    /// Log harness and pipeline progress (debug level). `RUST_LOG` takes precedence.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Sweep the built-in subjects, classify each, print reports and write artifacts.
    Run(RunArgs),
    /// Classify samples from an exported CSV or a saved JSON report.
    Classify(ClassifyArgs),
    /// Evaluate a single postfix (or infix) expression.
    Eval(EvalArgs),
    /// Execute a stack-operation script file and print the transcript.
    Replay(ReplayArgs),
}

/// Plot options shared by `run` and `classify`.
#[derive(Debug, Args, Clone)]
pub struct PlotArgs {
    /// Render an ASCII plot in the terminal (enabled by default).
    #[arg(long, default_value_t = true)]
    pub plot: bool,

    /// Disable the terminal plot.
    #[arg(long)]
    pub no_plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 80)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 20)]
    pub height: usize,
}

impl PlotArgs {
    pub fn enabled(&self) -> bool {
        self.plot && !self.no_plot
    }
}

/// Options for a measurement sweep.
#[derive(Debug, Args, Clone)]
pub struct RunArgs {
    /// Subjects to sweep (comma-separated).
    #[arg(
        short = 's',
        long = "subject",
        value_enum,
        value_delimiter = ',',
        default_values_t = SubjectKind::ALL.to_vec()
    )]
    pub subjects: Vec<SubjectKind>,

    /// Input sizes to probe (comma-separated).
    #[arg(short = 'n', long, value_delimiter = ',', default_values_t = DEFAULT_SIZES.to_vec())]
    pub sizes: Vec<usize>,

    /// Trials per size.
    #[arg(short = 'r', long, env = "CPROBE_REPEATS", default_value_t = 5)]
    pub repeats: usize,

    /// Base seed for input generation.
    #[arg(long, env = "CPROBE_SEED", default_value_t = 42)]
    pub seed: u64,

    /// Wall-clock budget for one trial (ms); cheap inputs are invoked repeatedly to fill it.
    #[arg(long, default_value_t = 5.0)]
    pub target_trial_ms: f64,

    /// Upper bound on invocations per trial.
    #[arg(long, default_value_t = 1000)]
    pub max_invocations: usize,

    /// Sweep sizes in parallel.
    #[arg(long)]
    pub parallel: bool,

    /// Directory for sample CSVs, theoretical CSVs and `report.json`.
    #[arg(short = 'o', long, env = "CPROBE_OUT_DIR")]
    pub out_dir: Option<PathBuf>,

    /// R² margin the quadratic must clear over the best straight-line model.
    #[arg(long, default_value_t = DEFAULT_R2_TOLERANCE)]
    pub r2_tolerance: f64,

    #[command(flatten)]
    pub plot: PlotArgs,
}

/// Options for classifying saved samples.
#[derive(Debug, Args, Clone)]
pub struct ClassifyArgs {
    /// Sample CSV (`InputSize,ExecutionTimeMs,AlgorithmType`) or a `report.json`
    /// from an earlier run.
    #[arg(value_name = "FILE")]
    pub input: PathBuf,

    /// R² margin the quadratic must clear over the best straight-line model.
    #[arg(long, default_value_t = DEFAULT_R2_TOLERANCE)]
    pub r2_tolerance: f64,

    /// Write the full report to JSON.
    #[arg(long = "export-json", value_name = "JSON")]
    pub export_json: Option<PathBuf>,

    #[command(flatten)]
    pub plot: PlotArgs,
}

/// Options for evaluating one expression.
#[derive(Debug, Args, Clone)]
pub struct EvalArgs {
    /// Space-separated expression, e.g. `"3 4 + 2 *"`.
    pub expression: String,

    /// Treat the expression as infix and convert it first.
    #[arg(long)]
    pub infix: bool,
}

/// Options for replaying a stack script.
#[derive(Debug, Args, Clone)]
pub struct ReplayArgs {
    /// Script file, one operation per line (`1,<v>` push, `2` pop, `3` top, `4` is-empty, `5` print).
    #[arg(value_name = "SCRIPT")]
    pub script: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_defaults() {
        let cli = Cli::try_parse_from(["cprobe", "run"]).unwrap();
        let Command::Run(args) = cli.command else {
            panic!("expected run");
        };
        assert_eq!(args.subjects, SubjectKind::ALL.to_vec());
        assert_eq!(args.sizes, DEFAULT_SIZES.to_vec());
        assert!(args.plot.enabled());
        assert!(!cli.verbose);
    }

    #[test]
    fn run_parses_lists_and_flags() {
        let cli = Cli::try_parse_from([
            "cprobe", "-v", "run", "--subject", "stack", "--sizes", "10,20,30", "--no-plot", "--parallel",
        ])
        .unwrap();
        assert!(cli.verbose);
        let Command::Run(args) = cli.command else {
            panic!("expected run");
        };
        assert_eq!(args.subjects, vec![SubjectKind::Stack]);
        assert_eq!(args.sizes, vec![10, 20, 30]);
        assert!(args.parallel);
        assert!(!args.plot.enabled());
    }

    #[test]
    fn classify_takes_input_path() {
        let cli = Cli::try_parse_from(["cprobe", "classify", "out/report.json", "--r2-tolerance", "0"]).unwrap();
        let Command::Classify(args) = cli.command else {
            panic!("expected classify");
        };
        assert_eq!(args.input, PathBuf::from("out/report.json"));
        assert_eq!(args.r2_tolerance, 0.0);
    }

    #[test]
    fn eval_takes_expression() {
        let cli = Cli::try_parse_from(["cprobe", "eval", "--infix", "1 + 2"]).unwrap();
        let Command::Eval(args) = cli.command else {
            panic!("expected eval");
        };
        assert!(args.infix);
        assert_eq!(args.expression, "1 + 2");
    }
}
