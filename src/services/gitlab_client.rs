//! GitLab API client.
//!
//! Publishes quality gate comments through GitLab API v4, authenticated with
//! a private access token.

use crate::error::AppError;
use crate::models::{CommentInput, RoutingTarget};
use crate::services::comment_format::render_comment;
use reqwest::{header, Client, Response, StatusCode};

/// `PRIVATE-TOKEN`, the header GitLab reads access tokens from.
const PRIVATE_TOKEN_HEADER: header::HeaderName = header::HeaderName::from_static("private-token");

/// GitLab API client configuration.
#[derive(Debug, Clone, Default)]
pub struct GitLabClientConfig {
    /// Base URL of the GitLab instance (e.g., `https://gitlab.com`).
    pub base_url: String,

    /// Access token sent in the `PRIVATE-TOKEN` header.
    pub token: String,

    /// Request timeout in seconds. `None` leaves requests unbounded.
    pub timeout_secs: Option<u64>,
}

/// GitLab API client.
#[derive(Debug, Clone)]
pub struct GitLabClient {
    client: Client,
    config: GitLabClientConfig,
}

impl GitLabClient {
    /// Create a new GitLab client.
    pub fn new(config: GitLabClientConfig) -> Result<Self, AppError> {
        let mut headers = header::HeaderMap::new();

        let mut token_value = header::HeaderValue::from_str(&config.token).map_err(|_| {
            AppError::configuration("Invalid token format", "GITLAB_TOKEN")
        })?;
        token_value.set_sensitive(true);
        headers.insert(PRIVATE_TOKEN_HEADER, token_value);

        let mut builder = Client::builder().default_headers(headers);
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(std::time::Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| AppError::internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    /// Base URL this client talks to.
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Get the full URL for an API path.
    fn api_url(&self, path: &str) -> String {
        format!(
            "{}/api/v4{}",
            self.config.base_url.trim_end_matches('/'),
            path
        )
    }

    /// Render the quality gate comment and post it to `target`.
    pub async fn publish(
        &self,
        target: &RoutingTarget,
        input: &CommentInput,
    ) -> Result<(), AppError> {
        let note = render_comment(input);
        self.post_note(target, &note).await
    }

    /// Post a pre-rendered note to `target`.
    ///
    /// Succeeds only on `201 Created`. One attempt, no retry.
    pub async fn post_note(&self, target: &RoutingTarget, note: &str) -> Result<(), AppError> {
        let endpoint = target.endpoint();
        let url = self.api_url(&endpoint);

        log::debug!("[gitlab] POST {}", url);

        let response = self
            .client
            .post(&url)
            .form(&[("note", note)])
            .send()
            .await?;

        Self::expect_created(response, &endpoint).await
    }

    /// Turn anything but `201 Created` into an error carrying the response body.
    async fn expect_created(response: Response, endpoint: &str) -> Result<(), AppError> {
        let status = response.status();
        if status == StatusCode::CREATED {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(AppError::gitlab_api_full(
            error_message(status, &body),
            status.as_u16(),
            endpoint,
        ))
    }
}

/// Build an error message from a GitLab error response.
///
/// GitLab returns errors as `{"message": ...}` or `{"error": ...}`; anything
/// else is reported as the raw body.
fn error_message(status: StatusCode, body: &str) -> String {
    let body_message = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.get("message").or_else(|| v.get("error")).map(|m| match m.as_str() {
                Some(s) => s.to_string(),
                // Sometimes "message" is an object like {"base":["msg"]}
                None => m.to_string(),
            })
        });

    match body_message {
        Some(msg) => format!("Request failed ({}): {}", status.as_u16(), msg),
        None if body.is_empty() => format!("Request failed ({})", status.as_u16()),
        None => format!("Request failed ({}): {}", status.as_u16(), body),
    }
}
