//! SonarQube webhook notification model.
//!
//! Mirrors the JSON document SonarQube posts when a background analysis task
//! completes. Every field defaults to empty when absent: SonarQube leaves out
//! `branch` on editions without branch support and `qualityGate` when no gate
//! is attached to the project.

use super::null_as_default;
use super::quality_gate::QualityGate;
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Timestamp layout SonarQube uses (`2016-11-18T10:46:28+0100`).
const SONAR_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%z";

/// Inbound quality gate notification.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Notification {
    /// Base URL of the SonarQube server that sent the notification.
    #[serde(deserialize_with = "null_as_default")]
    pub server_url: String,

    /// Background task ID.
    #[serde(deserialize_with = "null_as_default")]
    pub task_id: String,

    /// Background task status (`SUCCESS`, `FAILED`).
    #[serde(deserialize_with = "null_as_default")]
    pub status: String,

    /// When the analysis ran.
    #[serde(deserialize_with = "null_as_default")]
    pub analysed_at: String,

    /// SCM revision that was analysed.
    #[serde(deserialize_with = "null_as_default")]
    pub revision: String,

    /// When the project state last changed.
    #[serde(deserialize_with = "null_as_default")]
    pub changed_at: String,

    /// Analysed project.
    #[serde(deserialize_with = "null_as_default")]
    pub project: Project,

    /// Analysed branch.
    #[serde(deserialize_with = "null_as_default")]
    pub branch: Branch,

    /// Quality gate verdict.
    #[serde(deserialize_with = "null_as_default")]
    pub quality_gate: QualityGate,

    /// Free-form analysis properties (`sonar.analysis.*` scanner parameters).
    #[serde(deserialize_with = "null_as_default")]
    pub properties: HashMap<String, String>,
}

/// SonarQube project reference.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Project {
    #[serde(deserialize_with = "null_as_default")]
    pub key: String,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub url: String,
}

/// SonarQube branch reference.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Branch {
    /// Branch name (or pull request key).
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,

    /// `BRANCH` or `PULL_REQUEST`.
    #[serde(rename = "type", deserialize_with = "null_as_default")]
    pub branch_type: String,

    /// Whether this is the project's main branch.
    #[serde(deserialize_with = "null_as_default")]
    pub is_main: bool,

    /// Link to the branch dashboard in SonarQube.
    #[serde(deserialize_with = "null_as_default")]
    pub url: String,
}

impl Notification {
    /// Look up a non-empty property value.
    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    /// Parse `analysedAt`, accepting both RFC 3339 and SonarQube's `+hhmm` offsets.
    pub fn analysed_at(&self) -> Option<DateTime<FixedOffset>> {
        parse_sonar_timestamp(&self.analysed_at)
    }
}

fn parse_sonar_timestamp(value: &str) -> Option<DateTime<FixedOffset>> {
    if value.is_empty() {
        return None;
    }
    DateTime::parse_from_rfc3339(value)
        .or_else(|_| DateTime::parse_from_str(value, SONAR_TIMESTAMP_FORMAT))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    const SAMPLE: &str = r#"{
        "serverUrl": "http://localhost:9000",
        "taskId": "AVh21JS2JepAEhwQ-b3u",
        "status": "SUCCESS",
        "analysedAt": "2016-11-18T10:46:28+0100",
        "revision": "c739069ec7105e01303e8b3065a81141aad9f129",
        "changedAt": "2016-11-18T10:46:28+0100",
        "project": {
            "key": "myproject",
            "name": "My Project",
            "url": "https://mycompany.com/sonarqube/dashboard?id=myproject"
        },
        "branch": {
            "name": "feature/login",
            "type": "BRANCH",
            "isMain": false,
            "url": "https://mycompany.com/sonarqube/dashboard?id=myproject&branch=feature%2Flogin"
        },
        "qualityGate": {
            "name": "SonarQube way",
            "status": "OK",
            "conditions": [
                {
                    "metric": "new_reliability_rating",
                    "operator": "GREATER_THAN",
                    "value": "1",
                    "status": "OK",
                    "errorThreshold": "1"
                }
            ]
        },
        "properties": {
            "sonar.analysis.project_id": "42"
        }
    }"#;

    #[test]
    fn test_deserialize_full_payload() {
        let n: Notification = serde_json::from_str(SAMPLE).unwrap();
        assert_eq!(n.task_id, "AVh21JS2JepAEhwQ-b3u");
        assert_eq!(n.project.key, "myproject");
        assert_eq!(n.branch.branch_type, "BRANCH");
        assert!(!n.branch.is_main);
        assert_eq!(n.quality_gate.conditions.len(), 1);
        assert_eq!(n.quality_gate.conditions[0].error_threshold, "1");
        assert_eq!(n.property("sonar.analysis.project_id"), Some("42"));
    }

    #[test]
    fn test_missing_sections_default_to_empty() {
        let n: Notification = serde_json::from_str(r#"{"taskId": "x"}"#).unwrap();
        assert!(!n.branch.is_main);
        assert_eq!(n.quality_gate.status, "");
        assert!(n.quality_gate.conditions.is_empty());
        assert!(n.properties.is_empty());
    }

    #[test]
    fn test_wrong_type_is_rejected() {
        let result = serde_json::from_str::<Notification>(r#"{"branch": {"isMain": "yes"}}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_null_fields_decode_as_empty() {
        let json = r#"{
            "taskId": null,
            "project": null,
            "branch": { "name": null, "type": null, "isMain": null, "url": null },
            "qualityGate": {
                "status": "ERROR",
                "conditions": [
                    { "metric": "coverage", "operator": null, "value": null,
                      "status": "ERROR", "errorThreshold": null }
                ]
            },
            "properties": { "project_id": "1", "commit_sha": "a" }
        }"#;
        let n: Notification = serde_json::from_str(json).unwrap();
        assert_eq!(n.task_id, "");
        assert_eq!(n.project, Project::default());
        assert!(!n.branch.is_main);
        assert_eq!(n.branch.url, "");
        let condition = &n.quality_gate.conditions[0];
        assert_eq!(condition.metric, "coverage");
        assert_eq!(condition.value, "");
        assert_eq!(condition.error_threshold, "");

        match crate::services::interpreter::decide(n) {
            crate::models::Decision::Forward(_, input) => {
                assert_eq!(input.branch_url, "");
                assert_eq!(input.quality_gate.conditions.len(), 1);
            }
            other => panic!("expected Forward, got {:?}", other),
        }
    }

    #[test]
    fn test_null_sections_decode_as_empty() {
        let json = r#"{"branch": null, "qualityGate": {"conditions": null}, "properties": null}"#;
        let n: Notification = serde_json::from_str(json).unwrap();
        assert_eq!(n.branch, Branch::default());
        assert!(n.quality_gate.conditions.is_empty());
        assert!(n.properties.is_empty());
    }

    #[test]
    fn test_empty_property_is_absent() {
        let mut n = Notification::default();
        n.properties.insert("commit_sha".to_string(), String::new());
        assert_eq!(n.property("commit_sha"), None);
        assert_eq!(n.property("missing"), None);
    }

    #[test]
    fn test_analysed_at_sonar_offset() {
        let n: Notification = serde_json::from_str(SAMPLE).unwrap();
        let ts = n.analysed_at().unwrap();
        assert_eq!(ts.year(), 2016);
        assert_eq!(ts.hour(), 10);
        assert_eq!(ts.offset().local_minus_utc(), 3600);
    }

    #[test]
    fn test_analysed_at_rfc3339_and_garbage() {
        let mut n = Notification {
            analysed_at: "2024-02-29T08:00:00Z".to_string(),
            ..Default::default()
        };
        assert_eq!(n.analysed_at().unwrap().day(), 29);

        n.analysed_at = "yesterday".to_string();
        assert!(n.analysed_at().is_none());

        n.analysed_at = String::new();
        assert!(n.analysed_at().is_none());
    }
}
