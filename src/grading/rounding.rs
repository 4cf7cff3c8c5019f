use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// Every intermediate grade value is kept to two decimal places.
pub const GRADE_DECIMAL_PLACES: u32 = 2;

/// Round to two decimal places, ties away from zero (86.125 -> 86.13).
pub fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(GRADE_DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// Round to a whole percentage, ties away from zero (87.50 -> 88).
pub fn round_to_int(value: Decimal) -> i64 {
    let rounded = value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    rounded.to_i64().unwrap_or(if rounded.is_sign_negative() {
        i64::MIN
    } else {
        i64::MAX
    })
}
