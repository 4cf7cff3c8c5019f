use anyhow::{Context, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::Path;

use crate::grading::{compute_term_grade, ComputedGrade, GradeError, GradeScale, ScoreBundle, Term, WeightConfig};

/// A normalized score sheet: one row per student.
///
/// Example YAML:
/// ```yaml
/// term: midterm
/// roster: ["Dela Cruz, Juan", "Santos, Maria"]
/// rows:
///   - name: "Dela Cruz, Juan"
///     quizzes:
///       - { label: "Quiz 1", score: 8, total: 10 }
///     class_standing:
///       - { label: "SW 1", score: 18, total: 20 }
///     recitation: 90
///     attendance: 95
///     sep: 100
///     project: 90
///     prelim: { score: 70, total: 100 }
///     midterm: { score: 80, total: 100 }
/// ```
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ScoreSheet {
    /// Term the sheet was recorded for; a command-line term takes precedence
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub term: Option<Term>,

    /// Known student names. When present, rows for anyone else are skipped.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roster: Option<Vec<String>>,

    #[serde(default)]
    pub rows: Vec<SheetRow>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct SheetRow {
    #[serde(default)]
    pub name: String,

    #[serde(flatten)]
    pub scores: ScoreBundle,

    /// Keys that are not score fields, usually misspellings. A row with any
    /// of these is skipped rather than graded with a category missing.
    #[serde(flatten)]
    pub unknown: BTreeMap<String, serde_json::Value>,
}

impl SheetRow {
    pub fn new(name: impl Into<String>, scores: ScoreBundle) -> Self {
        Self {
            name: name.into(),
            scores,
            unknown: BTreeMap::new(),
        }
    }
}

/// One student's computed grade.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StudentGrade {
    pub name: String,
    #[serde(flatten)]
    pub grade: ComputedGrade,
}

/// Outcome of grading a whole sheet. Rows that could not be graded are
/// described in `warnings`; all others are in `grades`, in sheet order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BatchOutcome {
    pub grades: Vec<StudentGrade>,
    pub warnings: Vec<String>,
}

/// Load a score sheet from YAML (`.yaml`/`.yml`) or JSON (`.json`).
pub fn load_score_sheet(path: &Path) -> Result<ScoreSheet> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read score sheet at {}", path.display()))?;

    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    let sheet: ScoreSheet = if is_json {
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse score sheet: invalid JSON in {}", path.display()))?
    } else {
        serde_saphyr::from_str(&content)
            .with_context(|| format!("Failed to parse score sheet: invalid YAML in {}", path.display()))?
    };

    tracing::debug!(path = %path.display(), rows = sheet.rows.len(), "loaded score sheet");
    Ok(sheet)
}

/// Grade every row of `sheet` independently.
///
/// Rows with a blank name are treated as separators and skipped silently.
/// Rows for students missing from the roster, rows with unrecognized keys and
/// rows with impossible scores are skipped with a warning. Only missing weights fail the whole batch.
pub fn compute_batch(
    sheet: &ScoreSheet,
    weights: Option<&WeightConfig>,
    scale: &GradeScale,
    term: Term,
) -> Result<BatchOutcome, GradeError> {
    let weights = weights.ok_or(GradeError::ConfigurationMissing)?;
    let roster: Option<HashSet<&str>> = sheet
        .roster
        .as_ref()
        .map(|names| names.iter().map(|n| n.trim()).collect());

    let mut outcome = BatchOutcome::default();

    for (index, row) in sheet.rows.iter().enumerate() {
        let row_number = index + 1;
        let name = row.name.trim();

        if name.is_empty() {
            tracing::debug!(row = row_number, "skipping row without a student name");
            continue;
        }

        if let Some(ref roster) = roster {
            if !roster.contains(name) {
                outcome.warnings.push(format!(
                    "Row {}: student '{}' not found in roster. Skipping row.",
                    row_number, name
                ));
                continue;
            }
        }

        if !row.unknown.is_empty() {
            let keys: Vec<&str> = row.unknown.keys().map(String::as_str).collect();
            outcome.warnings.push(format!(
                "Row {} ({}): unknown field(s) {}. Skipping row.",
                row_number,
                name,
                keys.join(", ")
            ));
            continue;
        }

        if let Err(problem) = check_row(&row.scores) {
            outcome.warnings.push(format!(
                "Row {} ({}): {}. Skipping row.",
                row_number, name, problem
            ));
            continue;
        }

        let grade = compute_term_grade(&row.scores, Some(weights), scale, term)?;
        outcome.grades.push(StudentGrade {
            name: name.to_string(),
            grade,
        });
    }

    tracing::info!(
        graded = outcome.grades.len(),
        skipped = outcome.warnings.len(),
        term = %term,
        "batch complete"
    );

    Ok(outcome)
}

/// Reject scores that cannot have come from a real sheet.
fn check_row(scores: &ScoreBundle) -> Result<(), String> {
    let categories = [("quizzes", &scores.quizzes), ("class_standing", &scores.class_standing)];
    for (category, items) in categories {
        for (i, item) in items.iter().enumerate() {
            let label = if item.label.is_empty() {
                format!("{}[{}]", category, i)
            } else {
                format!("{} '{}'", category, item.label)
            };
            check_pair(&label, item.score, item.total)?;
        }
        check_sum(category, items.iter().map(|item| item.score.unwrap_or_default()))?;
        check_sum(category, items.iter().map(|item| item.total.unwrap_or_default()))?;
    }

    let direct = [
        ("recitation", scores.recitation),
        ("attendance", scores.attendance),
        ("sep", scores.sep),
        ("project", scores.project),
    ];
    for (field, value) in direct {
        if value < Decimal::ZERO {
            return Err(format!("{} is negative ({})", field, value));
        }
    }

    let exams = [
        ("prelim", scores.prelim),
        ("midterm", scores.midterm),
        ("finals", scores.finals),
    ];
    for (exam, result) in exams {
        if let Some(result) = result {
            check_pair(exam, Some(result.score), Some(result.total))?;
        }
    }
    if let (Some(prelim), Some(midterm)) = (scores.prelim, scores.midterm) {
        check_sum("prelim + midterm", [prelim.total, midterm.total].into_iter())?;
    }

    Ok(())
}

fn check_sum(category: &str, mut values: impl Iterator<Item = Decimal>) -> Result<(), String> {
    values
        .try_fold(Decimal::ZERO, |acc, value| acc.checked_add(value))
        .map(|_| ())
        .ok_or_else(|| format!("{} add up to more than can be graded", category))
}

fn check_pair(label: &str, score: Option<Decimal>, total: Option<Decimal>) -> Result<(), String> {
    if let Some(score) = score {
        if score < Decimal::ZERO {
            return Err(format!("{} score is negative ({})", label, score));
        }
    }
    if let Some(total) = total {
        if total < Decimal::ZERO {
            return Err(format!("{} total is negative ({})", label, total));
        }
    }
    if let (Some(score), Some(total)) = (score, total) {
        if score > total {
            return Err(format!("{} score {} exceeds total {}", label, score, total));
        }
    }
    Ok(())
}
