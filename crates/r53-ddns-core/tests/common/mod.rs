//! Test doubles and common utilities for orchestration contract tests
//!
//! These doubles record every call so tests can assert on what reached the
//! remote collaborators, and in which order.

#![allow(dead_code)]

use r53_ddns_core::change::{ChangeRequest, RecordType};
use r53_ddns_core::config::{AppConfig, HostConfig};
use r53_ddns_core::error::{Error, Result};
use r53_ddns_core::traits::{ChangeResponse, DnsClient, Notifier, NotifyStatus};
use r53_ddns_core::{OrchestratorEvent, UpdateOrchestrator};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

/// Zone state key: (zone id, record name, record type)
pub type RecordKey = (String, String, RecordType);

/// Zone state value: (ttl, values)
pub type RecordValue = (u32, Vec<String>);

/// A mock DnsClient that records calls and applies upserts to an in-memory zone
pub struct MockDnsClient {
    /// Call counter for change_record_sets()
    call_count: AtomicUsize,
    /// Every change batch received, in order
    changes: Mutex<Vec<ChangeRequest>>,
    /// Hostnames whose updates fail
    failing_hosts: Mutex<HashSet<String>>,
    /// Record state after applying successful batches
    zone: Mutex<HashMap<RecordKey, RecordValue>>,
}

impl MockDnsClient {
    pub fn new() -> Self {
        Self {
            call_count: AtomicUsize::new(0),
            changes: Mutex::new(Vec::new()),
            failing_hosts: Mutex::new(HashSet::new()),
            zone: Mutex::new(HashMap::new()),
        }
    }

    /// Make every update for `host` fail
    pub fn failing_for(self, host: &str) -> Self {
        self.failing_hosts.lock().unwrap().insert(host.to_string());
        self
    }

    /// Get the number of times change_record_sets() was called
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Get every change batch received, in order
    pub fn changes(&self) -> Vec<ChangeRequest> {
        self.changes.lock().unwrap().clone()
    }

    /// Get the hostnames of every attempted change, in order
    pub fn attempted_hosts(&self) -> Vec<String> {
        self.changes()
            .into_iter()
            .map(|c| c.hostname)
            .collect()
    }

    /// Snapshot of the in-memory zone
    pub fn zone(&self) -> HashMap<RecordKey, RecordValue> {
        self.zone.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl DnsClient for MockDnsClient {
    async fn change_record_sets(&self, change: &ChangeRequest) -> Result<ChangeResponse> {
        let n = self.call_count.fetch_add(1, Ordering::SeqCst);
        self.changes.lock().unwrap().push(change.clone());

        if self.failing_hosts.lock().unwrap().contains(&change.hostname) {
            return Err(Error::remote_update(
                "mock",
                &change.hostname,
                "InvalidChangeBatch",
            ));
        }

        let mut zone = self.zone.lock().unwrap();
        for record in &change.changes {
            zone.insert(
                (change.zone_id.clone(), record.name.clone(), record.record_type),
                (record.ttl, record.values.clone()),
            );
        }

        Ok(ChangeResponse {
            id: format!("/change/C{}", n + 1),
            status: "PENDING".to_string(),
            submitted_at: None,
        })
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }
}

/// A recorded notification: (host, was_failure)
pub type Notification = (String, bool);

/// A mock Notifier that records calls
pub struct RecordingNotifier {
    notifications: Mutex<Vec<Notification>>,
    /// When set, every call records and then fails
    fail: bool,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self {
            notifications: Mutex::new(Vec::new()),
            fail: false,
        }
    }

    /// A notifier whose transport always fails
    pub fn failing() -> Self {
        Self {
            notifications: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    /// Get every notification, in order
    pub fn notifications(&self) -> Vec<Notification> {
        self.notifications.lock().unwrap().clone()
    }

    /// Get the number of notify() calls
    pub fn count(&self) -> usize {
        self.notifications.lock().unwrap().len()
    }
}

#[async_trait::async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, host: &str, error: Option<&Error>) -> Result<NotifyStatus> {
        self.notifications
            .lock()
            .unwrap()
            .push((host.to_string(), error.is_some()));

        if self.fail {
            return Err(Error::notification("recording", "transport unavailable"));
        }
        Ok(NotifyStatus::Sent)
    }

    fn notifier_name(&self) -> &'static str {
        "recording"
    }
}

/// Helper to create a config with a single primary host
pub fn minimal_config(host: &str, additional_hosts: &[&str]) -> AppConfig {
    let mut config = AppConfig::default();
    config.records.insert(
        host.to_string(),
        HostConfig::new("Z1", 300).with_additional_hosts(additional_hosts.iter().copied()),
    );
    config
}

/// Helper to wire an orchestrator to the given doubles
pub fn orchestrator(
    client: &Arc<MockDnsClient>,
    notifier: &Arc<RecordingNotifier>,
    config: AppConfig,
) -> (UpdateOrchestrator, mpsc::Receiver<OrchestratorEvent>) {
    UpdateOrchestrator::new(
        Arc::clone(client) as Arc<dyn DnsClient>,
        Arc::clone(notifier) as Arc<dyn Notifier>,
        Arc::new(config),
    )
}

/// Drain every event currently buffered in the channel
pub fn drain_events(rx: &mut mpsc::Receiver<OrchestratorEvent>) -> Vec<OrchestratorEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}
