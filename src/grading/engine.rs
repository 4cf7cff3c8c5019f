use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::aggregate::{aggregate, RawTotals, ScoreItem};
use super::composer::{compose, CategoryGrades};
use super::error::GradeError;
use super::rescale::percentage_grade;
use super::scale::{resolve_grade_point, GradePointSource, GradeScale};
use super::weights::WeightConfig;

/// Grading period. Both terms share one calculation and differ only in
/// which exams make up the exam portion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Term {
    /// Exam portion is prelim + midterm exams combined
    Midterm,
    /// Exam portion is the final exam
    Finals,
}

impl Term {
    /// Raw exam-portion totals for this term.
    pub fn exam_portion(&self, bundle: &ScoreBundle) -> RawTotals {
        let totals = |exam: Option<&ExamResult>| exam.map(ExamResult::totals).unwrap_or_default();
        match self {
            Term::Midterm => {
                let prelim = totals(bundle.prelim.as_ref());
                let midterm = totals(bundle.midterm.as_ref());
                RawTotals::new(
                    prelim.score.saturating_add(midterm.score),
                    prelim.total.saturating_add(midterm.total),
                )
            }
            Term::Finals => totals(bundle.finals.as_ref()),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Term::Midterm => "midterm",
            Term::Finals => "finals",
        }
    }
}

impl std::fmt::Display for Term {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Score and possible total for a single exam.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ExamResult {
    #[serde(default)]
    pub score: Decimal,
    pub total: Decimal,
}

impl ExamResult {
    pub fn new(score: Decimal, total: Decimal) -> Self {
        Self { score, total }
    }

    pub fn totals(&self) -> RawTotals {
        RawTotals::new(self.score, self.total)
    }
}

/// Everything recorded for one student in one term.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct ScoreBundle {
    #[serde(default)]
    pub quizzes: Vec<ScoreItem>,
    #[serde(default)]
    pub class_standing: Vec<ScoreItem>,
    #[serde(default)]
    pub recitation: Decimal,
    #[serde(default)]
    pub attendance: Decimal,
    #[serde(default)]
    pub sep: Decimal,
    #[serde(default)]
    pub project: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prelim: Option<ExamResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub midterm: Option<ExamResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finals: Option<ExamResult>,
}

/// Result of one engine run.
///
/// Produced whole by [`compute_term_grade`]. Recalculating a student means
/// running the engine again and replacing the old value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComputedGrade {
    pub term: Term,

    pub quiz_raw: RawTotals,
    pub quiz_pg: Decimal,
    pub quiz_weighted: Decimal,

    pub class_standing_raw: RawTotals,
    pub class_standing_pg: Decimal,
    pub class_standing_composite: Decimal,
    pub class_standing_weighted: Decimal,

    pub sep_pg: Decimal,
    pub sep_weighted: Decimal,

    pub project_pg: Decimal,
    pub project_weighted: Decimal,

    pub exam_raw: RawTotals,
    pub exam_pg: Decimal,
    pub exam_weighted: Decimal,

    pub final_percentage: Decimal,
    pub final_rounded: i64,
    pub grade_point: Decimal,
    pub grade_point_source: GradePointSource,
}

impl ComputedGrade {
    pub fn is_failing(&self) -> bool {
        self.grade_point_source != GradePointSource::Scale
    }
}

/// Compute one student's grade for `term`.
///
/// Fails only when `weights` is `None`. Empty categories and scale gaps are
/// absorbed into zero or failing values.
pub fn compute_term_grade(
    bundle: &ScoreBundle,
    weights: Option<&WeightConfig>,
    scale: &GradeScale,
    term: Term,
) -> Result<ComputedGrade, GradeError> {
    let quiz_raw = aggregate(&bundle.quizzes);
    let class_standing_raw = aggregate(&bundle.class_standing);
    let exam_raw = term.exam_portion(bundle);

    let grades = CategoryGrades {
        quiz_pg: percentage_grade(quiz_raw),
        class_standing_pg: percentage_grade(class_standing_raw),
        recitation: bundle.recitation,
        attendance: bundle.attendance,
        sep: bundle.sep,
        project: bundle.project,
        exam_pg: percentage_grade(exam_raw),
    };

    let breakdown = compose(&grades, weights)?;
    let grade_point = resolve_grade_point(breakdown.final_rounded, scale);

    tracing::debug!(
        term = %term,
        final_percentage = %breakdown.final_percentage,
        final_rounded = breakdown.final_rounded,
        grade_point = %grade_point.value,
        "computed term grade"
    );

    Ok(ComputedGrade {
        term,
        quiz_raw,
        quiz_pg: grades.quiz_pg,
        quiz_weighted: breakdown.quiz,
        class_standing_raw,
        class_standing_pg: grades.class_standing_pg,
        class_standing_composite: breakdown.class_standing_composite,
        class_standing_weighted: breakdown.class_standing,
        sep_pg: grades.sep,
        sep_weighted: breakdown.sep,
        project_pg: grades.project,
        project_weighted: breakdown.project,
        exam_raw,
        exam_pg: grades.exam_pg,
        exam_weighted: breakdown.exam,
        final_percentage: breakdown.final_percentage,
        final_rounded: breakdown.final_rounded,
        grade_point: grade_point.value,
        grade_point_source: grade_point.source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grading::scale::GradeScaleEntry;
    use rust_decimal_macros::dec;

    fn scenario_a_bundle() -> ScoreBundle {
        ScoreBundle {
            quizzes: vec![
                ScoreItem::new("Quiz 1", dec!(35), dec!(50)),
                ScoreItem::new("Quiz 2", dec!(45), dec!(50)),
            ],
            class_standing: vec![
                ScoreItem::new("SW 1", dec!(20), dec!(20)),
                ScoreItem::new("SW 2", dec!(25), dec!(30)),
            ],
            recitation: dec!(90),
            attendance: dec!(95),
            sep: dec!(100),
            project: dec!(90),
            prelim: Some(ExamResult::new(dec!(70), dec!(100))),
            midterm: Some(ExamResult::new(dec!(80), dec!(100))),
            finals: Some(ExamResult::new(dec!(150), dec!(200))),
        }
    }

    #[test]
    fn test_scenario_a_midterm() {
        let weights = WeightConfig::default();
        let grade =
            compute_term_grade(&scenario_a_bundle(), Some(&weights), &GradeScale::default(), Term::Midterm)
                .unwrap();

        assert_eq!(grade.quiz_raw, RawTotals::new(dec!(80), dec!(100)));
        assert_eq!(grade.quiz_pg, dec!(86.00));
        assert_eq!(grade.quiz_weighted, dec!(25.80));
        assert_eq!(grade.class_standing_raw, RawTotals::new(dec!(45), dec!(50)));
        assert_eq!(grade.class_standing_pg, dec!(93.00));
        assert_eq!(grade.class_standing_composite, dec!(92.67));
        assert_eq!(grade.class_standing_weighted, dec!(23.17));
        assert_eq!(grade.sep_weighted, dec!(5.00));
        assert_eq!(grade.project_weighted, dec!(9.00));
        assert_eq!(grade.exam_raw, RawTotals::new(dec!(150), dec!(200)));
        assert_eq!(grade.exam_pg, dec!(82.50));
        assert_eq!(grade.exam_weighted, dec!(24.75));
        assert_eq!(grade.final_percentage, dec!(87.72));
        assert_eq!(grade.final_rounded, 88);
        assert_eq!(grade.grade_point, dec!(1.75));
        assert_eq!(grade.grade_point_source, GradePointSource::Scale);
        assert!(!grade.is_failing());
    }

    #[test]
    fn test_terms_share_calculation() {
        // finals exam alone is 150/200, same as prelim + midterm combined
        let weights = WeightConfig::default();
        let scale = GradeScale::default();
        let bundle = scenario_a_bundle();
        let midterm = compute_term_grade(&bundle, Some(&weights), &scale, Term::Midterm).unwrap();
        let finals = compute_term_grade(&bundle, Some(&weights), &scale, Term::Finals).unwrap();

        assert_eq!(finals.term, Term::Finals);
        assert_eq!(finals.exam_raw, midterm.exam_raw);
        assert_eq!(finals.final_percentage, midterm.final_percentage);
        assert_eq!(finals.grade_point, midterm.grade_point);
    }

    #[test]
    fn test_finals_ignores_prelim_and_midterm() {
        let bundle = ScoreBundle {
            prelim: Some(ExamResult::new(dec!(100), dec!(100))),
            midterm: Some(ExamResult::new(dec!(100), dec!(100))),
            finals: None,
            ..ScoreBundle::default()
        };
        let weights = WeightConfig::default();
        let grade = compute_term_grade(&bundle, Some(&weights), &GradeScale::default(), Term::Finals).unwrap();
        assert_eq!(grade.exam_raw, RawTotals::default());
        assert_eq!(grade.exam_pg, dec!(0));
    }

    #[test]
    fn test_scenario_b_everything_empty() {
        let weights = WeightConfig::default();
        let grade =
            compute_term_grade(&ScoreBundle::default(), Some(&weights), &GradeScale::default(), Term::Midterm)
                .unwrap();
        assert_eq!(grade.quiz_pg, dec!(0));
        assert_eq!(grade.class_standing_pg, dec!(0));
        assert_eq!(grade.exam_pg, dec!(0));
        assert_eq!(grade.final_percentage, dec!(0));
        assert_eq!(grade.final_rounded, 0);
        assert_eq!(grade.grade_point, dec!(5.00));
        assert_eq!(grade.grade_point_source, GradePointSource::FailingFloor);
    }

    #[test]
    fn test_scenario_c_scale_gap() {
        // Scores landing exactly on 91
        let bundle = ScoreBundle {
            quizzes: vec![ScoreItem::new("Quiz", dec!(91), dec!(91))],
            class_standing: vec![ScoreItem::new("SW", dec!(1), dec!(1))],
            recitation: dec!(86.5),
            attendance: dec!(86.5),
            sep: dec!(91),
            project: dec!(91),
            finals: Some(ExamResult::new(dec!(61), dec!(70))),
            ..ScoreBundle::default()
        };
        let weights = WeightConfig {
            quiz: dec!(0),
            class_standing: dec!(0),
            sep: dec!(0.5),
            project: dec!(0.5),
            exam: dec!(0),
        };
        let scale = GradeScale::new(vec![
            GradeScaleEntry::new(Some(dec!(92)), dec!(100), dec!(1.25)),
            GradeScaleEntry::new(Some(dec!(74)), dec!(90), dec!(2.50)),
        ])
        .unwrap();

        let grade = compute_term_grade(&bundle, Some(&weights), &scale, Term::Finals).unwrap();
        assert_eq!(grade.final_rounded, 91);
        assert_eq!(grade.grade_point, dec!(5.00));
        assert_eq!(grade.grade_point_source, GradePointSource::UnmatchedFallback);
        assert!(grade.is_failing());
    }

    #[test]
    fn test_missing_weights() {
        let result = compute_term_grade(&scenario_a_bundle(), None, &GradeScale::default(), Term::Finals);
        assert_eq!(result.unwrap_err(), GradeError::ConfigurationMissing);
    }

    #[test]
    fn test_deterministic() {
        let weights = WeightConfig::default();
        let scale = GradeScale::default();
        let bundle = scenario_a_bundle();
        let first = compute_term_grade(&bundle, Some(&weights), &scale, Term::Midterm).unwrap();
        let second = compute_term_grade(&bundle, Some(&weights), &scale, Term::Midterm).unwrap();
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn test_failing_floor_at_73() {
        // Everything perfect except the exam portion, weighted to land on 73
        let weights = WeightConfig {
            quiz: dec!(0.73),
            class_standing: dec!(0),
            sep: dec!(0),
            project: dec!(0),
            exam: dec!(0.27),
        };
        let bundle = ScoreBundle {
            quizzes: vec![ScoreItem::new("Quiz", dec!(10), dec!(10))],
            ..ScoreBundle::default()
        };
        let grade = compute_term_grade(&bundle, Some(&weights), &GradeScale::default(), Term::Midterm).unwrap();
        assert_eq!(grade.final_rounded, 73);
        assert_eq!(grade.grade_point_source, GradePointSource::FailingFloor);
    }

    #[test]
    fn test_bundle_parse() {
        let yaml = r#"
quizzes:
  - { label: "Quiz 1", score: 8, total: 10 }
class_standing:
  - { label: "SW 1", score: 18, total: 20 }
recitation: 90
attendance: 100
sep: 85
project: 88
prelim: { score: 70, total: 100 }
midterm: { score: 75, total: 100 }
"#;
        let bundle: ScoreBundle = serde_saphyr::from_str(yaml).unwrap();
        assert_eq!(bundle.quizzes.len(), 1);
        assert_eq!(bundle.attendance, dec!(100));
        assert!(bundle.finals.is_none());
        assert_eq!(
            Term::Midterm.exam_portion(&bundle),
            RawTotals::new(dec!(145), dec!(200))
        );
    }

    #[test]
    fn test_term_display() {
        assert_eq!(Term::Midterm.to_string(), "midterm");
        assert_eq!(Term::Finals.to_string(), "finals");
    }
}
