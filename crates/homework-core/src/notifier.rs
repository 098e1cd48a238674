//! Outbound notification seam.

use async_trait::async_trait;

use crate::error::DeliveryError;

/// Delivers a text message to the configured chat.
///
/// The destination is bound when the notifier is built; there is exactly one
/// per relay.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Send `message`. Any channel failure comes back as [`DeliveryError`].
    async fn deliver(&self, message: &str) -> Result<(), DeliveryError>;
}
