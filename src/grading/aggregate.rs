use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One scored activity inside a category (a quiz, a seatwork, ...).
///
/// Cells that were never filled in are left out of the category list by
/// whoever builds it. A `None` that does make it into the list counts as 0.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct ScoreItem {
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub score: Option<Decimal>,
    #[serde(default)]
    pub total: Option<Decimal>,
}

impl ScoreItem {
    pub fn new(label: impl Into<String>, score: Decimal, total: Decimal) -> Self {
        Self {
            label: label.into(),
            score: Some(score),
            total: Some(total),
        }
    }
}

/// Summed raw score and possible total for a category.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct RawTotals {
    pub score: Decimal,
    pub total: Decimal,
}

impl RawTotals {
    pub fn new(score: Decimal, total: Decimal) -> Self {
        Self { score, total }
    }
}

/// Sum a category's items into a `(score, total)` pair.
///
/// Sums saturate at `Decimal::MAX` instead of overflowing.
pub fn aggregate(items: &[ScoreItem]) -> RawTotals {
    items.iter().fold(RawTotals::default(), |acc, item| RawTotals {
        score: acc.score.saturating_add(item.score.unwrap_or_default()),
        total: acc.total.saturating_add(item.total.unwrap_or_default()),
    })
}
