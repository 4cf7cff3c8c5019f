use rust_decimal::Decimal;

use super::error::GradeError;
use super::rounding::{round2, round_to_int};
use super::weights::WeightConfig;

/// Per-category inputs to the weighted sum.
///
/// `sep` and `project` are already on a percentage scale and are used as-is.
/// `recitation` and `attendance` are direct scores averaged into class standing.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CategoryGrades {
    pub quiz_pg: Decimal,
    pub class_standing_pg: Decimal,
    pub recitation: Decimal,
    pub attendance: Decimal,
    pub sep: Decimal,
    pub project: Decimal,
    pub exam_pg: Decimal,
}

/// Weighted subtotals and the final percentage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightedBreakdown {
    pub quiz: Decimal,
    /// Average of recitation, attendance and the class-standing PG
    pub class_standing_composite: Decimal,
    pub class_standing: Decimal,
    pub sep: Decimal,
    pub project: Decimal,
    pub exam: Decimal,
    pub final_percentage: Decimal,
    pub final_rounded: i64,
}

/// Combine category grades with the configured weights.
///
/// Every weighted subtotal is rounded to two places before it is summed.
pub fn compose(
    grades: &CategoryGrades,
    weights: Option<&WeightConfig>,
) -> Result<WeightedBreakdown, GradeError> {
    let weights = weights.ok_or(GradeError::ConfigurationMissing)?;

    let quiz = round2(grades.quiz_pg.saturating_mul(weights.quiz));

    let composite_sum = grades
        .recitation
        .saturating_add(grades.attendance)
        .saturating_add(grades.class_standing_pg);
    let class_standing_composite = round2(composite_sum / Decimal::from(3));
    let class_standing = round2(class_standing_composite.saturating_mul(weights.class_standing));

    let sep = round2(grades.sep.saturating_mul(weights.sep));
    let project = round2(grades.project.saturating_mul(weights.project));
    let exam = round2(grades.exam_pg.saturating_mul(weights.exam));

    let final_percentage = round2(
        [class_standing, sep, project, exam]
            .into_iter()
            .fold(quiz, Decimal::saturating_add),
    );

    Ok(WeightedBreakdown {
        quiz,
        class_standing_composite,
        class_standing,
        sep,
        project,
        exam,
        final_percentage,
        final_rounded: round_to_int(final_percentage),
    })
}
