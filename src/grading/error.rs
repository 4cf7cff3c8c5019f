use rust_decimal::Decimal;
use thiserror::Error;

/// Failures that stop a grade from being computed at all.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GradeError {
    /// No weight configuration was supplied. Nothing partial is produced.
    #[error("grade weights are not configured")]
    ConfigurationMissing,
}

/// Problems found while building a [`GradeScale`](super::scale::GradeScale).
///
/// Indices refer to the position of the entry as it was supplied.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScaleError {
    #[error("scale[{index}]: min_percentage {min} is greater than max_percentage {max}")]
    InvertedRange {
        index: usize,
        min: Decimal,
        max: Decimal,
    },

    #[error("scale[{first}] and scale[{second}] overlap")]
    OverlappingRanges { first: usize, second: usize },

    #[error("scale[{first}] and scale[{second}] both have no min_percentage")]
    MultipleUnbounded { first: usize, second: usize },
}
