use serde::{Deserialize, Serialize};

use crate::grading::{default_scale_entries, GradeScale, GradeScaleEntry, ScaleError, WeightConfig};

/// Top-level configuration file.
///
/// Example YAML:
/// ```yaml
/// weights:
///   quiz: 0.30
///   class_standing: 0.25
///   sep: 0.05
///   project: 0.10
///   exam: 0.30
/// scale:
///   - { min_percentage: 97, max_percentage: 100, grade_point: 1.00 }
///   - { min_percentage: 94, max_percentage: 96, grade_point: 1.25 }
///   - { max_percentage: 75, grade_point: 3.00 }
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Left unset, every calculation fails with a missing-configuration error.
    #[serde(default)]
    pub weights: Option<WeightConfig>,

    /// Grade scale entries, in any order
    #[serde(default)]
    pub scale: Vec<GradeScaleEntry>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            weights: Some(WeightConfig::default()),
            scale: default_scale_entries(),
        }
    }
}

impl Config {
    /// Build the validated grade scale from the configured entries.
    pub fn grade_scale(&self) -> Result<GradeScale, ScaleError> {
        GradeScale::new(self.scale.clone())
    }
}
