// # Notifier Trait
//
// Defines the interface for telling the operator how an update went.
//
// ## Implementations
//
// - Pushover: `r53-ddns-notify-pushover` crate
// - `NoopNotifier` below, for deployments without credentials

use async_trait::async_trait;

/// Outcome of a notification attempt that did not fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyStatus {
    /// The message was handed to the transport
    Sent,
    /// Notifications are not configured; nothing was sent
    Skipped,
}

/// Trait for operator notification channels
///
/// # Error Isolation
///
/// A returned error only ever reaches the log. The orchestrator swallows it,
/// so a broken notification channel can never fail or abort an update.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Report the outcome of an update for `host`
    ///
    /// # Parameters
    ///
    /// - `host`: The hostname whose record set was changed
    /// - `error`: `None` on success, the failure otherwise
    async fn notify(
        &self,
        host: &str,
        error: Option<&crate::Error>,
    ) -> Result<NotifyStatus, crate::Error>;

    /// Get the notifier name (for logging/debugging)
    fn notifier_name(&self) -> &'static str;
}

/// Notifier that never sends anything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopNotifier;

#[async_trait]
impl Notifier for NoopNotifier {
    async fn notify(
        &self,
        _host: &str,
        _error: Option<&crate::Error>,
    ) -> Result<NotifyStatus, crate::Error> {
        Ok(NotifyStatus::Skipped)
    }

    fn notifier_name(&self) -> &'static str {
        "noop"
    }
}
