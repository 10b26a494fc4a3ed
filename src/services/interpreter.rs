//! Notification interpreter.
//!
//! Turns a raw webhook body into a [`Decision`]. Nothing here performs I/O
//! or reads configuration, so routing can be tested without a network.

use crate::error::AppError;
use crate::models::{CommentInput, Decision, Notification, RoutingTarget};

/// Property holding the GitLab project ID.
pub const PROJECT_ID_KEY: &str = "project_id";

/// Property holding the analysed commit SHA.
pub const COMMIT_SHA_KEY: &str = "commit_sha";

/// Property holding the merge request IID.
pub const MR_IID_KEY: &str = "mr_iid";

/// Prefix SonarQube puts in front of `-Dsonar.analysis.*` scanner parameters.
const SONAR_ANALYSIS_PREFIX: &str = "sonar.analysis.";

/// Decode a webhook body and decide what to do with it.
pub fn interpret(raw: &[u8]) -> Result<Decision, AppError> {
    decode(raw).map(decide)
}

/// Decode a webhook body. A bare `null` body decodes as an empty notification.
pub fn decode(raw: &[u8]) -> Result<Notification, AppError> {
    let notification: Option<Notification> = serde_json::from_slice(raw)?;
    Ok(notification.unwrap_or_default())
}

/// Decide what to do with an already decoded notification.
pub fn decide(notification: Notification) -> Decision {
    if notification.branch.is_main {
        return Decision::Suppressed;
    }

    match resolve_target(&notification) {
        Some(target) => Decision::Forward(
            target,
            CommentInput {
                quality_gate: notification.quality_gate,
                branch_url: notification.branch.url,
            },
        ),
        None => Decision::Incomplete,
    }
}

/// Pick the comment target from the notification properties.
///
/// A commit SHA takes priority over a merge request IID when both are set.
pub fn resolve_target(notification: &Notification) -> Option<RoutingTarget> {
    let project_id = routing_property(notification, PROJECT_ID_KEY)?;

    if let Some(commit_sha) = routing_property(notification, COMMIT_SHA_KEY) {
        return Some(RoutingTarget::Commit {
            project_id: project_id.to_string(),
            commit_sha: commit_sha.to_string(),
        });
    }

    routing_property(notification, MR_IID_KEY).map(|mr_iid| RoutingTarget::MergeRequest {
        project_id: project_id.to_string(),
        mr_iid: mr_iid.to_string(),
    })
}

/// Non-empty value for `key`, falling back to `sonar.analysis.<key>`.
fn routing_property<'a>(notification: &'a Notification, key: &str) -> Option<&'a str> {
    notification
        .property(key)
        .or_else(|| notification.property(&format!("{}{}", SONAR_ANALYSIS_PREFIX, key)))
}
