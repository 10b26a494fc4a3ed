//! Quality gate verdict carried inside a SonarQube notification.

use super::null_as_default;
use serde::{Deserialize, Serialize};

/// Overall quality gate result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct QualityGate {
    /// Quality gate name (e.g., `Sonar way`).
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,

    /// Verdict as reported by SonarQube: `OK`, `ERROR`, `FAILED`, ...
    #[serde(deserialize_with = "null_as_default")]
    pub status: String,

    /// Individual metric evaluations, in the order SonarQube sent them.
    #[serde(deserialize_with = "null_as_default")]
    pub conditions: Vec<QualityGateCondition>,
}

/// One metric condition of a quality gate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct QualityGateCondition {
    /// Metric key (e.g., `new_coverage`).
    #[serde(deserialize_with = "null_as_default")]
    pub metric: String,

    /// Comparison operator: `LESS_THAN`, `GREATER_THAN`.
    #[serde(deserialize_with = "null_as_default")]
    pub operator: String,

    /// Measured value. Absent when the metric has no data yet.
    #[serde(deserialize_with = "null_as_default")]
    pub value: String,

    /// Condition status: `OK`, `ERROR`, `NO_VALUE`.
    #[serde(deserialize_with = "null_as_default")]
    pub status: String,

    /// Configured error threshold.
    #[serde(deserialize_with = "null_as_default")]
    pub error_threshold: String,
}

impl QualityGate {
    /// Conditions that did not pass.
    pub fn failing_conditions(&self) -> impl Iterator<Item = &QualityGateCondition> {
        self.conditions.iter().filter(|c| c.status == "ERROR")
    }
}
