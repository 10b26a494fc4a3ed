//! Renders the GitLab comment for a quality gate result.

use crate::models::CommentInput;
use std::fmt::Write;

/// Render the comment body.
///
/// The branch URL and status go into the anchor verbatim, without HTML escaping.
pub fn render_comment(input: &CommentInput) -> String {
    let gate = &input.quality_gate;
    let mut comment = format!(
        "SonarQube Quality Gate: <a href='{}'>{}</a>\n\n",
        input.branch_url, gate.status
    );

    for condition in &gate.conditions {
        // Writing to a String cannot fail.
        let _ = writeln!(
            comment,
            "- {} ({}): {} ({}) [Threshold: {}]",
            condition.metric,
            condition.operator,
            condition.value,
            condition.status,
            condition.error_threshold,
        );
    }

    comment
}
