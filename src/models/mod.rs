//! Data models for the bridge.
//!
//! The inbound SonarQube notification and the routing decision derived from
//! it. Models are plain data; decoding is done with serde.

pub mod notification;
pub mod quality_gate;
pub mod routing;

// Re-exports for convenient access
pub use notification::{Branch, Notification, Project};
pub use quality_gate::{QualityGate, QualityGateCondition};
pub use routing::{CommentInput, Decision, RoutingTarget};

use serde::{Deserialize, Deserializer};

/// Decode an explicit JSON `null` as the field type's default.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}
