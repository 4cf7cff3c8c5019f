use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::ScaleError;

/// Any final rounded percentage at or below this fails outright.
pub const FAILING_FLOOR_PERCENTAGE: i64 = 73;

/// Grade point given to failing percentages and to percentages no entry covers.
pub const FAILING_GRADE_POINT: Decimal = Decimal::from_parts(500, 0, 0, false, 2);

/// One row of the institutional grade scale.
///
/// Both bounds are inclusive. A missing `min_percentage` means the entry
/// covers everything up to `max_percentage`.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct GradeScaleEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_percentage: Option<Decimal>,
    pub max_percentage: Decimal,
    pub grade_point: Decimal,
}

impl GradeScaleEntry {
    pub fn new(min_percentage: Option<Decimal>, max_percentage: Decimal, grade_point: Decimal) -> Self {
        Self {
            min_percentage,
            max_percentage,
            grade_point,
        }
    }

    pub fn covers(&self, percentage: Decimal) -> bool {
        self.min_percentage.map_or(true, |min| percentage >= min) && percentage <= self.max_percentage
    }

    /// Range label for display, e.g. "97-100" or "<=75".
    pub fn range_label(&self) -> String {
        match self.min_percentage {
            Some(min) => format!("{}-{}", min.normalize(), self.max_percentage.normalize()),
            None => format!("<={}", self.max_percentage.normalize()),
        }
    }
}

/// Where a resolved grade point came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GradePointSource {
    /// Final rounded percentage was at or below the failing floor
    FailingFloor,
    /// Matched a scale entry
    Scale,
    /// Above the floor but no entry covered it; the scale likely has a gap
    UnmatchedFallback,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GradePoint {
    pub value: Decimal,
    pub source: GradePointSource,
}

/// A validated grade scale.
///
/// Entries are kept sorted by their lower bound (unbounded first) and are
/// guaranteed not to overlap, so a lookup has exactly one possible answer
/// no matter what order the entries were written in.
#[derive(Debug, Clone, PartialEq)]
pub struct GradeScale {
    entries: Vec<GradeScaleEntry>,
}

impl GradeScale {
    pub fn new(entries: Vec<GradeScaleEntry>) -> Result<Self, ScaleError> {
        for (index, entry) in entries.iter().enumerate() {
            if let Some(min) = entry.min_percentage {
                if min > entry.max_percentage {
                    return Err(ScaleError::InvertedRange {
                        index,
                        min,
                        max: entry.max_percentage,
                    });
                }
            }
        }

        let mut indexed: Vec<(usize, GradeScaleEntry)> = entries.into_iter().enumerate().collect();
        // None sorts before Some, which puts the unbounded entry first
        indexed.sort_by(|(_, a), (_, b)| {
            a.min_percentage
                .cmp(&b.min_percentage)
                .then(a.max_percentage.cmp(&b.max_percentage))
        });

        for pair in indexed.windows(2) {
            let (first, lower) = &pair[0];
            let (second, upper) = &pair[1];
            let (first, second) = (*first.min(second), *first.max(second));
            match upper.min_percentage {
                None => return Err(ScaleError::MultipleUnbounded { first, second }),
                Some(min) if min <= lower.max_percentage => {
                    return Err(ScaleError::OverlappingRanges { first, second })
                }
                Some(_) => {}
            }
        }

        Ok(Self {
            entries: indexed.into_iter().map(|(_, entry)| entry).collect(),
        })
    }

    /// Entries in ascending order of their lower bound.
    pub fn entries(&self) -> &[GradeScaleEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Find the entry covering `percentage`, if any.
    pub fn lookup(&self, percentage: Decimal) -> Option<&GradeScaleEntry> {
        // Last entry whose lower bound is at or below the percentage
        let idx = self
            .entries
            .partition_point(|e| e.min_percentage.map_or(true, |min| min <= percentage));
        let candidate = self.entries.get(idx.checked_sub(1)?)?;
        candidate.covers(percentage).then_some(candidate)
    }
}

impl Default for GradeScale {
    fn default() -> Self {
        Self {
            entries: default_scale_entries().into_iter().rev().collect(),
        }
    }
}

/// The conventional 1.00-3.00 scale, highest band first.
pub fn default_scale_entries() -> Vec<GradeScaleEntry> {
    let band = |min: i64, max: i64, point: i64| {
        GradeScaleEntry::new(Some(Decimal::from(min)), Decimal::from(max), Decimal::new(point, 2))
    };
    vec![
        band(97, 100, 100),
        band(94, 96, 125),
        band(91, 93, 150),
        band(88, 90, 175),
        band(85, 87, 200),
        band(82, 84, 225),
        band(79, 81, 250),
        band(76, 78, 275),
        GradeScaleEntry::new(None, Decimal::from(75), Decimal::new(300, 2)),
    ]
}

/// Resolve a final rounded percentage to its grade point.
///
/// Percentages at or below the failing floor never consult the scale.
pub fn resolve_grade_point(final_rounded: i64, scale: &GradeScale) -> GradePoint {
    if final_rounded <= FAILING_FLOOR_PERCENTAGE {
        return GradePoint {
            value: FAILING_GRADE_POINT,
            source: GradePointSource::FailingFloor,
        };
    }

    match scale.lookup(Decimal::from(final_rounded)) {
        Some(entry) => GradePoint {
            value: entry.grade_point,
            source: GradePointSource::Scale,
        },
        None => {
            tracing::warn!(
                percentage = final_rounded,
                "no grade scale entry covers {}%, falling back to {}; check the scale for gaps",
                final_rounded,
                FAILING_GRADE_POINT
            );
            GradePoint {
                value: FAILING_GRADE_POINT,
                source: GradePointSource::UnmatchedFallback,
            }
        }
    }
}
