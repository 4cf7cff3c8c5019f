pub mod aggregate;
pub mod composer;
pub mod engine;
pub mod error;
pub mod rescale;
pub mod rounding;
pub mod scale;
pub mod validation;
pub mod weights;

pub use aggregate::{aggregate, RawTotals, ScoreItem};
pub use composer::{compose, CategoryGrades, WeightedBreakdown};
pub use engine::{compute_term_grade, ComputedGrade, ExamResult, ScoreBundle, Term};
pub use error::{GradeError, ScaleError};
pub use rescale::percentage_grade;
pub use rounding::{round2, round_to_int};
pub use scale::{
    default_scale_entries, resolve_grade_point, GradePoint, GradePointSource, GradeScale,
    GradeScaleEntry, FAILING_FLOOR_PERCENTAGE, FAILING_GRADE_POINT,
};
pub use validation::validate_config;
pub use weights::WeightConfig;
