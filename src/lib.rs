//! Sonar GitLab Bridge - relays SonarQube quality gate webhooks to GitLab.
//!
//! Quality gate results for feature branches are posted as comments on the
//! analysed commit or merge request. Main branch analyses are ignored.

pub mod config;
pub mod error;
pub mod models;
pub mod services;
