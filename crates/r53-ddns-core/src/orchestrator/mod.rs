//! Update orchestration
//!
//! The UpdateOrchestrator is responsible for:
//! - Validating the address of an inbound request
//! - Resolving the requested hostname against the configured records
//! - Building and submitting the change batch via DnsClient
//! - Falling back to the additional hosts when the primary update fails
//! - Reporting outcomes via Notifier
//!
//! ## Architecture
//!
//! ```text
//!  UpdateRequest
//!        │
//!        ▼
//! ┌─────────────────────┐      ┌──────────────┐
//! │ UpdateOrchestrator  │─────▶│  AppConfig   │
//! └─────────────────────┘      │  (lookup)    │
//!        │                     └──────────────┘
//!        ├─────────────────────────┬──────────────────────────┐
//!        ▼                         ▼                          ▼
//! ┌──────────────┐         ┌──────────────┐           ┌─────────────┐
//! │  DnsClient   │         │   Notifier   │           │   Events    │
//! │  (upsert)    │         │  (operator)  │           │  (monitor)  │
//! └──────────────┘         └──────────────┘           └─────────────┘
//! ```
//!
//! ## Notification Policy
//!
//! The primary host's outcome is always reported. Additional hosts are only
//! attempted when the primary failed, and are only reported when they fail
//! themselves.

use std::net::Ipv4Addr;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tracing::{debug, error, info, warn};

use crate::change::{self, ChangeRequest};
use crate::config::{AppConfig, HostConfig};
use crate::error::{Error, Result};
use crate::request::UpdateRequest;
use crate::traits::{ChangeResponse, DnsClient, Notifier, NotifyStatus};

/// Events emitted by the UpdateOrchestrator
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrchestratorEvent {
    /// Request dropped before any remote call
    RequestRejected { host: String, reason: String },

    /// Change batch built for a host
    ChangeBuilt { host: String, change: ChangeRequest },

    /// Change batch built but not sent (`commit=false`)
    DryRun { host: String },

    /// Change batch accepted by the provider
    UpdateSucceeded { host: String, change_id: String },

    /// Change batch rejected or the call failed
    UpdateFailed { host: String, error: String },

    /// Primary update failed, additional hosts are being attempted
    FallbackStarted { primary: String, hosts: Vec<String> },
}

/// Update orchestrator
///
/// The orchestrator is stateless across requests. It holds only shared,
/// read-only handles and can serve any number of concurrent requests.
///
/// Two concurrent requests for the same hostname are not serialized; the
/// provider sees both changes in whatever order they arrive.
pub struct UpdateOrchestrator {
    /// DNS control-plane client
    client: Arc<dyn DnsClient>,

    /// Operator notification channel
    notifier: Arc<dyn Notifier>,

    /// Immutable startup configuration
    config: Arc<AppConfig>,

    /// Event sender for external monitoring
    event_tx: mpsc::Sender<OrchestratorEvent>,
}

impl UpdateOrchestrator {
    /// Create a new orchestrator
    ///
    /// # Returns
    ///
    /// A tuple of (orchestrator, event_receiver) where event_receiver yields
    /// orchestrator events. Dropping the receiver disables events.
    pub fn new(
        client: Arc<dyn DnsClient>,
        notifier: Arc<dyn Notifier>,
        config: Arc<AppConfig>,
    ) -> (Self, mpsc::Receiver<OrchestratorEvent>) {
        let capacity = config.app.event_channel_capacity.max(1);
        let (tx, rx) = mpsc::channel(capacity);

        let orchestrator = Self {
            client,
            notifier,
            config,
            event_tx: tx,
        };

        (orchestrator, rx)
    }

    /// The configuration this orchestrator resolves hosts against
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Process one update request to completion
    ///
    /// Outcomes are only observable through logs, notifications and events.
    pub async fn process(&self, request: &UpdateRequest) {
        let ip = match request.ipv4() {
            Ok(ip) => ip,
            Err(e) => {
                error!(request = ?request, error = %e, "Invalid IP specified");
                self.reject(&request.host, &e);
                return;
            }
        };

        let Some(host_config) = self.config.host(&request.host) else {
            let e = Error::unknown_host(&request.host);
            error!(request = ?request, "Hostname not found in config, ignoring");
            self.reject(&request.host, &e);
            return;
        };

        let primary = self
            .update_host(host_config, &request.host, ip, request.commit)
            .await;
        self.notify(&request.host, primary.as_ref().err()).await;

        if primary.is_err() {
            self.update_additional_hosts(host_config, &request.host, ip, request.commit)
                .await;
        }
    }

    /// Attempt every additional host in configured order
    async fn update_additional_hosts(
        &self,
        host_config: &HostConfig,
        primary: &str,
        ip: Ipv4Addr,
        commit: bool,
    ) {
        if host_config.additional_hosts.is_empty() {
            debug!(host = %primary, "No additional hosts configured");
            return;
        }

        warn!(
            host = %primary,
            additional_hosts = ?host_config.additional_hosts,
            "Primary update failed, updating additional hosts"
        );
        self.emit_event(OrchestratorEvent::FallbackStarted {
            primary: primary.to_string(),
            hosts: host_config.additional_hosts.clone(),
        });

        for hostname in &host_config.additional_hosts {
            if let Err(e) = self.update_host(host_config, hostname, ip, commit).await {
                self.notify(hostname, Some(&e)).await;
            }
        }
    }

    /// Build and (when committing) submit the change batch for one hostname
    ///
    /// # Returns
    ///
    /// - `Ok(Some(ChangeResponse))`: The provider accepted the batch
    /// - `Ok(None)`: Dry run, nothing was sent
    /// - `Err(Error)`: The remote call failed
    async fn update_host(
        &self,
        host_config: &HostConfig,
        hostname: &str,
        ip: Ipv4Addr,
        commit: bool,
    ) -> Result<Option<ChangeResponse>> {
        let change = change::build(&host_config.zone_id, hostname, ip, host_config.ttl);
        debug!(host = %hostname, commit, change = ?change, "Built change request");
        self.emit_event(OrchestratorEvent::ChangeBuilt {
            host: hostname.to_string(),
            change: change.clone(),
        });

        if !commit {
            info!(host = %hostname, ip = %ip, "Commit disabled, change not sent");
            self.emit_event(OrchestratorEvent::DryRun {
                host: hostname.to_string(),
            });
            return Ok(None);
        }

        match self.client.change_record_sets(&change).await {
            Ok(response) => {
                info!(
                    host = %hostname,
                    ip = %ip,
                    provider = self.client.provider_name(),
                    response = ?response,
                    "RecordSet updated successfully."
                );
                self.emit_event(OrchestratorEvent::UpdateSucceeded {
                    host: hostname.to_string(),
                    change_id: response.id.clone(),
                });
                Ok(Some(response))
            }
            Err(e) => {
                error!(
                    host = %hostname,
                    provider = self.client.provider_name(),
                    change = ?change,
                    error = %e,
                    "Error updating record sets"
                );
                self.emit_event(OrchestratorEvent::UpdateFailed {
                    host: hostname.to_string(),
                    error: e.to_string(),
                });
                Err(e)
            }
        }
    }

    /// Notify the operator, logging and swallowing any failure
    async fn notify(&self, host: &str, error: Option<&Error>) {
        let notifier = self.notifier.notifier_name();
        match self.notifier.notify(host, error).await {
            Ok(NotifyStatus::Sent) => {
                debug!(host = %host, notifier, "Notification sent");
            }
            Ok(NotifyStatus::Skipped) => {
                info!(host = %host, notifier, "Notification not configured, skipped");
            }
            Err(e) => {
                error!(host = %host, notifier, error = %e, "Error publishing notification");
            }
        }
    }

    fn reject(&self, host: &str, reason: &Error) {
        self.emit_event(OrchestratorEvent::RequestRejected {
            host: host.to_string(),
            reason: reason.to_string(),
        });
    }

    /// Emit an orchestrator event
    fn emit_event(&self, event: OrchestratorEvent) {
        match self.event_tx.try_send(event) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {
                warn!("Event channel full, dropping event. Consider increasing app.eventChannelCapacity.");
            }
            // Nobody is listening
            Err(TrySendError::Closed(_)) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::NoopNotifier;
    use async_trait::async_trait;

    struct UnreachableClient;

    #[async_trait]
    impl DnsClient for UnreachableClient {
        async fn change_record_sets(&self, _change: &ChangeRequest) -> Result<ChangeResponse> {
            Err(Error::remote_update("unreachable", "-", "no network in unit tests"))
        }

        fn provider_name(&self) -> &'static str {
            "unreachable"
        }
    }

    fn orchestrator(capacity: usize) -> (UpdateOrchestrator, mpsc::Receiver<OrchestratorEvent>) {
        let mut config = AppConfig::default();
        config.app.event_channel_capacity = capacity;
        config
            .records
            .insert("example.com".to_string(), HostConfig::new("Z1", 300));

        UpdateOrchestrator::new(
            Arc::new(UnreachableClient),
            Arc::new(NoopNotifier),
            Arc::new(config),
        )
    }

    #[tokio::test]
    async fn test_dry_run_emits_change() {
        let (orchestrator, mut rx) = orchestrator(16);

        orchestrator
            .process(&UpdateRequest::new("example.com", "198.51.100.7", false))
            .await;

        match rx.recv().await {
            Some(OrchestratorEvent::ChangeBuilt { host, change }) => {
                assert_eq!(host, "example.com");
                assert_eq!(change.zone_id, "Z1");
            }
            other => panic!("unexpected event: {:?}", other),
        }
        assert_eq!(
            rx.recv().await,
            Some(OrchestratorEvent::DryRun {
                host: "example.com".to_string()
            })
        );
    }

    #[tokio::test]
    async fn test_full_channel_drops_events() {
        let (orchestrator, mut rx) = orchestrator(1);

        // ChangeBuilt fills the channel, DryRun is dropped
        orchestrator
            .process(&UpdateRequest::new("example.com", "198.51.100.7", false))
            .await;

        assert!(matches!(rx.recv().await, Some(OrchestratorEvent::ChangeBuilt { .. })));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_dropped_receiver_is_harmless() {
        let (orchestrator, rx) = orchestrator(16);
        drop(rx);

        orchestrator
            .process(&UpdateRequest::new("example.com", "198.51.100.7", true))
            .await;
    }
}
