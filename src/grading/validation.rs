use rust_decimal::Decimal;

use super::scale::{GradeScale, GradeScaleEntry};
use super::weights::WeightConfig;

/// How far the weight fractions may drift from 1.0 (allows thirds like 0.3333).
pub const WEIGHT_SUM_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 4);

/// Validate grading configuration at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_config(
    weights: Option<&WeightConfig>,
    scale: &[GradeScaleEntry],
) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    match weights {
        None => errors.push("weights: missing (grades cannot be computed without them)".to_string()),
        Some(weights) => {
            for (name, value) in weights.named() {
                if value < Decimal::ZERO {
                    errors.push(format!("weights.{}: must be non-negative", name));
                }
            }
            let total = weights.total();
            if (total - Decimal::ONE).abs() > WEIGHT_SUM_TOLERANCE {
                errors.push(format!("weights: must add up to 1.0, got {}", total.normalize()));
            }
        }
    }

    if scale.is_empty() {
        errors.push("scale: no entries (every passing percentage would fall back to 5.00)".to_string());
    }

    let hundred = Decimal::ONE_HUNDRED;
    for (i, entry) in scale.iter().enumerate() {
        if let Some(min) = entry.min_percentage {
            if min < Decimal::ZERO || min > hundred {
                errors.push(format!("scale[{}].min_percentage: must be between 0 and 100", i));
            }
        }
        if entry.max_percentage < Decimal::ZERO || entry.max_percentage > hundred {
            errors.push(format!("scale[{}].max_percentage: must be between 0 and 100", i));
        }
        if entry.grade_point < Decimal::ZERO {
            errors.push(format!("scale[{}].grade_point: must be non-negative", i));
        }
    }

    if let Err(e) = GradeScale::new(scale.to_vec()) {
        errors.push(e.to_string());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
