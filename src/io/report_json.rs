//! Read/write the JSON run report.
//!
//! The JSON report is the portable record of a run: for every subject the raw
//! samples, every candidate fit, the excluded models, the verdict and the
//! theoretical series. The schema is defined by `report::ReportFile`.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::{AppError, EXIT_CONFIG};
use crate::report::ReportFile;

/// Write a report JSON file.
pub fn write_report_json(path: &Path, report: &ReportFile) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(EXIT_CONFIG, format!("Failed to create report JSON '{}': {e}", path.display())))?;

    let mut out = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut out, report)
        .map_err(|e| AppError::new(EXIT_CONFIG, format!("Failed to write report JSON: {e}")))?;
    out.flush()
        .map_err(|e| AppError::new(EXIT_CONFIG, format!("Failed to write report JSON: {e}")))
}

/// Read a report JSON file.
pub fn read_report_json(path: &Path) -> Result<ReportFile, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(EXIT_CONFIG, format!("Failed to open report JSON '{}': {e}", path.display())))?;
    let report: ReportFile = serde_json::from_reader(file)
        .map_err(|e| AppError::new(EXIT_CONFIG, format!("Invalid report JSON: {e}")))?;
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ModelKind, Sample};
    use crate::fit::SelectionPolicy;
    use crate::report::build_subject_report;

    #[test]
    fn report_survives_a_round_trip_through_disk() {
        let samples: Vec<Sample> = [10usize, 100, 1000]
            .iter()
            .map(|&n| Sample::new(n, 0.01 * n as f64, "Stack Operations"))
            .collect();
        let report = ReportFile {
            tool: "test".to_string(),
            generated_at: chrono::Utc::now(),
            seed: Some(42),
            selection: SelectionPolicy::default(),
            subjects: vec![build_subject_report(samples, SelectionPolicy::default()).unwrap()],
        };

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        write_report_json(&path, &report).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("\"O(n)\""));

        let back = read_report_json(&path).unwrap();
        assert_eq!(back.seed, Some(42));
        assert_eq!(back.generated_at, report.generated_at);
        let verdict = &back.subjects[0].classification.verdict;
        assert_eq!(verdict.model, ModelKind::Linear);
        assert_eq!(verdict.subject_label, "Stack Operations");
        assert_eq!(back.subjects[0].theoretical.points.len(), 3);
    }

    #[test]
    fn missing_report_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_report_json(&dir.path().join("nope.json")).unwrap_err();
        assert_eq!(err.exit_code(), EXIT_CONFIG);
    }
}
