//! Weighted term grades from raw component scores.
//!
//! The [`grading`] module holds the calculation itself: category totals are
//! rescaled onto a 30-100 percentage-grade, weighted, summed and rounded, and
//! the rounded percentage is mapped to a grade point through a [`GradeScale`].
//! [`batch`] runs that calculation over a whole score sheet.

pub mod batch;
pub mod config;
pub mod grading;
pub mod output;

pub use grading::{compute_term_grade, ComputedGrade, GradeError, GradeScale, ScoreBundle, Term, WeightConfig};
