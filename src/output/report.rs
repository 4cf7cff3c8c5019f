use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use serde::Serialize;
use std::path::Path;

use crate::batch::BatchOutcome;
use crate::grading::Term;

/// JSON report of a graded sheet.
#[derive(Debug, Serialize)]
pub struct GradeReport<'a> {
    pub version: u32,
    pub term: Term,
    #[serde(flatten)]
    pub outcome: &'a BatchOutcome,
}

impl<'a> GradeReport<'a> {
    pub fn new(term: Term, outcome: &'a BatchOutcome) -> Self {
        Self {
            version: 1,
            term,
            outcome,
        }
    }
}

/// Render the report as pretty-printed JSON
pub fn render_report(report: &GradeReport) -> Result<String> {
    serde_json::to_string_pretty(report).context("Failed to serialize grade report")
}

/// Save the report to a JSON file atomically
///
/// Uses atomic-write-file so a previous report is never left half-overwritten.
pub fn write_report(path: &Path, report: &GradeReport) -> Result<()> {
    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;

    serde_json::to_writer_pretty(&mut file, report).context("Failed to serialize grade report")?;

    file.commit().context("Failed to save grade report")?;

    tracing::info!(path = %path.display(), grades = report.outcome.grades.len(), "wrote grade report");
    Ok(())
}
