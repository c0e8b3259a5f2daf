// # Notifier Trait
//
// Defines the interface for delivering availability changes.
//
// ## Implementations
//
// - Discord webhook: `stockwatch-notify-discord` crate

use async_trait::async_trait;

use crate::model::Transition;

/// Trait for notification channels
///
/// Implementations send exactly one message per call and never retry.
/// Whether a failed delivery matters is decided by the caller.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver a single transition
    ///
    /// # Returns
    ///
    /// - `Ok(())`: The channel accepted the message
    /// - `Err(Error::Config)`: The notifier cannot deliver anything (e.g. no destination)
    /// - `Err(Error)`: This delivery failed
    async fn send(&self, transition: &Transition) -> Result<(), crate::Error>;

    /// Get the notifier name (for logging/debugging)
    fn notifier_name(&self) -> &'static str;
}
