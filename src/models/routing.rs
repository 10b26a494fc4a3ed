//! Where a quality gate comment goes, and what it is built from.

use super::quality_gate::QualityGate;

/// GitLab resource a comment is attached to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoutingTarget {
    /// Comment on a single commit.
    Commit {
        project_id: String,
        commit_sha: String,
    },

    /// Note on a merge request.
    MergeRequest { project_id: String, mr_iid: String },
}

impl RoutingTarget {
    /// API path below `/api/v4`, without encoding the identifiers.
    pub fn endpoint(&self) -> String {
        match self {
            Self::Commit {
                project_id,
                commit_sha,
            } => format!(
                "/projects/{}/repository/commits/{}/comments",
                project_id, commit_sha
            ),
            Self::MergeRequest { project_id, mr_iid } => {
                format!("/projects/{}/merge_requests/{}/notes", project_id, mr_iid)
            }
        }
    }

    /// GitLab project ID the target belongs to.
    pub fn project_id(&self) -> &str {
        match self {
            Self::Commit { project_id, .. } | Self::MergeRequest { project_id, .. } => project_id,
        }
    }
}

impl std::fmt::Display for RoutingTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Commit {
                project_id,
                commit_sha,
            } => write!(f, "commit {} in project {}", commit_sha, project_id),
            Self::MergeRequest { project_id, mr_iid } => {
                write!(f, "merge request !{} in project {}", mr_iid, project_id)
            }
        }
    }
}

/// Everything needed to render the comment text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentInput {
    pub quality_gate: QualityGate,

    /// SonarQube dashboard link for the analysed branch.
    pub branch_url: String,
}

/// Outcome of interpreting one notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Main branch analysis; never commented on.
    Suppressed,

    /// No usable project/commit or project/merge request property pair.
    Incomplete,

    /// Publish a comment on `target`.
    Forward(RoutingTarget, CommentInput),
}
