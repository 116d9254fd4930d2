//! CSV ingest of previously exported samples.
//!
//! Accepts the export schema (`InputSize,ExecutionTimeMs,AlgorithmType`).
//! Column order does not matter, extra columns are ignored, and bad rows are
//! skipped and reported with their line number rather than failing the load.

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::StringRecord;

use crate::domain::Sample;
use crate::error::{AppError, EXIT_CONFIG};

const COL_SIZE: &str = "InputSize";
const COL_DURATION: &str = "ExecutionTimeMs";
const COL_LABEL: &str = "AlgorithmType";

/// A row-level error encountered during ingest.
#[derive(Debug, Clone, PartialEq)]
pub struct RowError {
    pub line: usize,
    pub message: String,
}

/// Ingest output: parsed samples in file order plus skipped rows.
#[derive(Debug, Clone, Default)]
pub struct IngestedSamples {
    pub samples: Vec<Sample>,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
}

impl IngestedSamples {
    /// Group samples by subject label, preserving first-seen label order.
    pub fn by_subject(&self) -> Vec<(String, Vec<Sample>)> {
        let mut groups: Vec<(String, Vec<Sample>)> = Vec::new();
        for s in &self.samples {
            match groups.iter_mut().find(|(label, _)| *label == s.subject_label) {
                Some((_, group)) => group.push(s.clone()),
                None => groups.push((s.subject_label.clone(), vec![s.clone()])),
            }
        }
        groups
    }
}

/// Load samples from a CSV file.
pub fn load_samples_csv(path: &Path) -> Result<IngestedSamples, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(EXIT_CONFIG, format!("Failed to open CSV '{}': {e}", path.display())))?;
    read_samples(file)
}

/// Parse samples from any reader.
pub fn read_samples<R: Read>(input: R) -> Result<IngestedSamples, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(input);

    let headers = reader
        .headers()
        .map_err(|e| AppError::new(EXIT_CONFIG, format!("Failed to read CSV headers: {e}")))?
        .clone();
    let columns = header_map(&headers);

    let col = |name: &str| {
        columns
            .get(name)
            .copied()
            .ok_or_else(|| AppError::new(EXIT_CONFIG, format!("Missing required column '{name}'.")))
    };
    let size_idx = col(COL_SIZE)?;
    let duration_idx = col(COL_DURATION)?;
    let label_idx = col(COL_LABEL)?;

    let mut out = IngestedSamples::default();

    for (idx, result) in reader.records().enumerate() {
        // +2: 1-based lines, plus the header row.
        let line = idx + 2;
        out.rows_read += 1;

        let record = match result {
            Ok(r) => r,
            Err(e) => {
                out.row_errors.push(RowError {
                    line,
                    message: format!("CSV parse error: {e}"),
                });
                continue;
            }
        };

        match parse_row(&record, size_idx, duration_idx, label_idx) {
            Ok(sample) => out.samples.push(sample),
            Err(message) => out.row_errors.push(RowError { line, message }),
        }
    }

    Ok(out)
}

fn header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(i, h)| (h.to_string(), i))
        .collect()
}

fn parse_row(
    record: &StringRecord,
    size_idx: usize,
    duration_idx: usize,
    label_idx: usize,
) -> Result<Sample, String> {
    let field = |idx: usize, name: &str| {
        record
            .get(idx)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| format!("missing {name}"))
    };

    let size_raw = field(size_idx, COL_SIZE)?;
    let input_size: usize = size_raw
        .parse()
        .map_err(|_| format!("invalid {COL_SIZE} '{size_raw}'"))?;
    if input_size == 0 {
        return Err(format!("{COL_SIZE} must be positive"));
    }

    let duration_raw = field(duration_idx, COL_DURATION)?;
    let duration_ms: f64 = duration_raw
        .parse()
        .map_err(|_| format!("invalid {COL_DURATION} '{duration_raw}'"))?;
    if !(duration_ms.is_finite() && duration_ms >= 0.0) {
        return Err(format!("{COL_DURATION} must be a non-negative number"));
    }

    let label = field(label_idx, COL_LABEL)?;

    Ok(Sample::new(input_size, duration_ms, label))
}
