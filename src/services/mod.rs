//! Business logic services.
//!
//! The interpreter decides what a SonarQube notification asks for; the GitLab
//! client renders and publishes the comment; the webhook server wires both to
//! HTTP.
//!
//! The interpreter and comment formatting are pure and testable without a
//! network.

pub mod comment_format;
pub mod gitlab_client;
pub mod interpreter;
pub mod webhook_server;

pub use gitlab_client::{GitLabClient, GitLabClientConfig};
pub use interpreter::interpret;
pub use webhook_server::{start_webhook_server, webhook_routes, WebhookState};
