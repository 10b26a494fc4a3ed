//! Webhook HTTP server.
//!
//! Embeds an axum server exposing the SonarQube webhook endpoint. Each
//! delivery is interpreted and, when it targets a commit or merge request,
//! relayed to GitLab before the response is sent.

use crate::config::BridgeConfig;
use crate::error::AppError;
use crate::models::Decision;
use crate::services::gitlab_client::GitLabClient;
use crate::services::interpreter::{decide, decode};
use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use std::net::SocketAddr;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Shared state for the webhook routes.
#[derive(Clone)]
pub struct WebhookState {
    pub gitlab: GitLabClient,
}

// ── Error handling ───────────────────────────────────────────────────────────

/// JSON error response body.
#[derive(Serialize)]
struct ApiError {
    code: String,
    message: String,
}

/// Wrapper to make AppError usable as an axum error response.
pub struct ApiErr(AppError);

impl IntoResponse for ApiErr {
    fn into_response(self) -> Response {
        let (status, code) = match &self.0 {
            AppError::InvalidPayload { .. } => (StatusCode::BAD_REQUEST, "INVALID_PAYLOAD"),
            _ => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        };
        (
            status,
            Json(ApiError {
                code: code.to_string(),
                message: self.0.to_string(),
            }),
        )
            .into_response()
    }
}

impl From<AppError> for ApiErr {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

// ── Routes ───────────────────────────────────────────────────────────────────

/// Build the webhook routes.
///
/// `/webhook` only accepts POST; axum answers other methods with 405.
pub fn webhook_routes(state: WebhookState) -> Router {
    Router::new()
        .route("/webhook", post(webhook_handler))
        .route("/health", get(health_handler))
        .with_state(state)
}

/// Liveness check.
async fn health_handler() -> (StatusCode, &'static str) {
    (StatusCode::OK, "OK")
}

/// SonarQube webhook handler.
///
/// - 200: delivery handled (published, skipped, or publishing failed)
/// - 400: body is not a decodable notification
async fn webhook_handler(
    State(state): State<WebhookState>,
    body: Bytes,
) -> Result<StatusCode, ApiErr> {
    let notification = decode(&body).inspect_err(|e| {
        log::debug!("[webhook] Rejected delivery: {}", e);
    })?;

    log::debug!(
        "[webhook] Received task {} for project {} (analysed at {})",
        notification.task_id,
        notification.project.key,
        notification
            .analysed_at()
            .map(|ts| ts.to_rfc3339())
            .unwrap_or_else(|| "unknown".to_string())
    );

    match decide(notification) {
        Decision::Suppressed => {
            log::info!("[webhook] Skipping main branch");
        }
        Decision::Incomplete => {
            log::info!("[webhook] Missing project and commit/merge request properties, skipping");
        }
        Decision::Forward(target, input) => {
            let failing = input.quality_gate.failing_conditions().count();
            match state.gitlab.publish(&target, &input).await {
                Ok(()) => log::info!(
                    "[webhook] Posted quality gate {} ({} failing conditions) to {}",
                    input.quality_gate.status,
                    failing,
                    target
                ),
                Err(e) => log::error!("[webhook] Failed to post comment to {}: {}", target, e),
            }
        }
    }

    Ok(StatusCode::OK)
}

// ── Server lifecycle ─────────────────────────────────────────────────────────

/// Handle to a running webhook server.
pub struct WebhookServerHandle {
    /// Address the server actually bound to.
    pub local_addr: SocketAddr,
    task: JoinHandle<()>,
}

impl WebhookServerHandle {
    /// Wait for the server task to finish after its token was cancelled.
    pub async fn wait(self) {
        if let Err(e) = self.task.await {
            log::error!("[webhook] Server task panicked: {}", e);
        }
    }
}

/// Start the webhook server.
///
/// Binds `config.listen_addr` and serves until `cancel` is cancelled.
/// Returns an error if the GitLab client cannot be built or the address is
/// unavailable.
pub async fn start_webhook_server(
    config: BridgeConfig,
    cancel: CancellationToken,
) -> Result<WebhookServerHandle, AppError> {
    let gitlab = GitLabClient::new(config.gitlab)?;
    log::info!("[webhook] Publishing to GitLab at {:?}", gitlab.base_url());

    let app = webhook_routes(WebhookState { gitlab });

    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .map_err(|e| {
            AppError::internal(format!("Failed to bind to {}: {}", config.listen_addr, e))
        })?;
    let local_addr = listener
        .local_addr()
        .map_err(|e| AppError::internal(format!("Failed to read local address: {}", e)))?;

    log::info!("[webhook] Listening on http://{}", local_addr);

    let task = tokio::spawn(async move {
        let server = axum::serve(listener, app).with_graceful_shutdown(async move {
            cancel.cancelled().await;
        });

        if let Err(e) = server.await {
            log::error!("[webhook] Server error: {}", e);
        }

        log::info!("[webhook] Server stopped");
    });

    Ok(WebhookServerHandle { local_addr, task })
}
