//! Export samples and theoretical series to CSV.
//!
//! Schema (one row per sample):
//!
//! ```text
//! InputSize,ExecutionTimeMs,AlgorithmType
//! 100,0.0123,Postfix Evaluation
//! ```
//!
//! Durations are written with fixed 4-decimal precision.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::domain::Sample;
use crate::error::{AppError, EXIT_CONFIG};

pub const CSV_COLUMNS: [&str; 3] = ["InputSize", "ExecutionTimeMs", "AlgorithmType"];

/// Write samples to `path`, replacing any existing file.
pub fn write_samples_csv(path: &Path, samples: &[Sample]) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(EXIT_CONFIG, format!("Failed to create CSV '{}': {e}", path.display())))?;
    write_samples(BufWriter::new(file), samples)
        .map_err(|e| AppError::new(EXIT_CONFIG, format!("Failed to write CSV '{}': {e}", path.display())))
}

/// Write samples in CSV form to any writer.
///
/// Labels are quoted only when they need it (commas, quotes, newlines).
pub fn write_samples<W: Write>(out: W, samples: &[Sample]) -> std::io::Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(CSV_COLUMNS)?;
    for s in samples {
        writer.write_record([
            s.input_size.to_string(),
            format!("{:.4}", s.duration_ms),
            s.subject_label.clone(),
        ])?;
    }
    writer.flush()
}
