//! Process configuration.
//!
//! Read once at startup from the environment and handed to the server
//! explicitly; nothing else in the crate reads environment variables.

use crate::error::AppError;
use crate::services::gitlab_client::GitLabClientConfig;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

/// Default port for the webhook listener.
pub const DEFAULT_PORT: u16 = 8080;

/// Bridge configuration.
#[derive(Debug, Clone)]
pub struct BridgeConfig {
    /// GitLab instance and credentials.
    pub gitlab: GitLabClientConfig,

    /// Address the webhook endpoint listens on.
    pub listen_addr: SocketAddr,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            gitlab: GitLabClientConfig::default(),
            listen_addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), DEFAULT_PORT),
        }
    }
}

impl BridgeConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// Missing GitLab URL or token is only warned about: a bad value shows up
    /// as a failed request to GitLab, not as a startup failure.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let base_url = var("GITLAB_URL").unwrap_or_default();
        if base_url.is_empty() {
            log::warn!("[config] GITLAB_URL is not set; comments cannot be published");
        }

        let token = var("GITLAB_TOKEN").unwrap_or_default();
        if token.is_empty() {
            log::warn!("[config] GITLAB_TOKEN is not set; GitLab will reject requests");
        }

        let timeout_secs = var("GITLAB_TIMEOUT_SECS")
            .map(|v| match v.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Ok(secs),
                _ => Err(AppError::configuration(
                    format!("GITLAB_TIMEOUT_SECS must be a positive number of seconds, got {:?}", v),
                    "GITLAB_TIMEOUT_SECS",
                )),
            })
            .transpose()?;

        let ip = match var("LISTEN_ADDR") {
            Some(v) => v.trim().parse::<IpAddr>().map_err(|_| {
                AppError::configuration(
                    format!("LISTEN_ADDR must be an IP address, got {:?}", v),
                    "LISTEN_ADDR",
                )
            })?,
            None => IpAddr::V4(Ipv4Addr::UNSPECIFIED),
        };

        let port = match var("PORT") {
            Some(v) => v.trim().parse::<u16>().map_err(|_| {
                AppError::configuration(format!("PORT must be a valid number, got {:?}", v), "PORT")
            })?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            gitlab: GitLabClientConfig {
                base_url,
                token,
                timeout_secs,
            },
            listen_addr: SocketAddr::new(ip, port),
        })
    }
}
