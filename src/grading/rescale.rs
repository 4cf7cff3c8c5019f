use rust_decimal::Decimal;

use super::aggregate::RawTotals;
use super::rounding::round2;

/// Lowest percentage-grade an attempted category can receive.
pub const PERCENTAGE_FLOOR: Decimal = Decimal::from_parts(30, 0, 0, false, 0);

/// Width of the band above the floor: a perfect score lands on 100.
pub const PERCENTAGE_SPAN: Decimal = Decimal::from_parts(70, 0, 0, false, 0);

/// Map a raw `(score, total)` pair onto the 30-100 percentage-grade scale.
///
/// A category with nothing possible (total of 0) gets 0 rather than the floor.
/// Ratios too large to represent saturate at `Decimal::MAX`.
pub fn percentage_grade(raw: RawTotals) -> Decimal {
    if raw.total <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    let ratio = raw.score.checked_div(raw.total).unwrap_or(Decimal::MAX);
    round2(ratio.saturating_mul(PERCENTAGE_SPAN).saturating_add(PERCENTAGE_FLOOR))
}
