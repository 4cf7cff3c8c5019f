use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Weight fractions for the five grade components.
///
/// The fractions are expected to add up to 1.0. The engine trusts this;
/// `validate_config` is where it gets checked.
///
/// Example YAML:
/// ```yaml
/// weights:
///   quiz: 0.30
///   class_standing: 0.25
///   sep: 0.05
///   project: 0.10
///   exam: 0.30
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct WeightConfig {
    pub quiz: Decimal,
    pub class_standing: Decimal,
    /// Special project (SEP)
    pub sep: Decimal,
    pub project: Decimal,
    /// Exam portion: prelim + midterm for the midterm term, final exam for finals
    pub exam: Decimal,
}

impl Default for WeightConfig {
    fn default() -> Self {
        Self {
            quiz: Decimal::new(30, 2),
            class_standing: Decimal::new(25, 2),
            sep: Decimal::new(5, 2),
            project: Decimal::new(10, 2),
            exam: Decimal::new(30, 2),
        }
    }
}

impl WeightConfig {
    /// Sum of all five fractions.
    pub fn total(&self) -> Decimal {
        self.quiz + self.class_standing + self.sep + self.project + self.exam
    }

    /// Named view of the fractions, in the order they are applied.
    pub fn named(&self) -> [(&'static str, Decimal); 5] {
        [
            ("quiz", self.quiz),
            ("class_standing", self.class_standing),
            ("sep", self.sep),
            ("project", self.project),
            ("exam", self.exam),
        ]
    }
}
