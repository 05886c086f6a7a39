//! Record change payloads
//!
//! Every DNS write is a batch of two upserts under the same name: the A
//! record carrying the address, and a TXT record holding a human-readable
//! "last updated" stamp for auditing. Applying the same batch twice leaves
//! the zone in the same state.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::net::Ipv4Addr;

use crate::config::Ttl;

/// Comment attached to every change batch
pub const CHANGE_COMMENT: &str = "Unifi Updated IP Address";

/// The action applied to a record set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChangeAction {
    /// Create the record set, or overwrite it if present
    Upsert,
}

/// Record types written by the updater
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RecordType {
    A,
    Txt,
}

impl RecordType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordType::A => "A",
            RecordType::Txt => "TXT",
        }
    }
}

/// A single record set operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordChange {
    pub action: ChangeAction,
    /// Fully-qualified record name, including the trailing dot
    pub name: String,
    pub record_type: RecordType,
    pub ttl: Ttl,
    pub values: Vec<String>,
}

/// A change batch for one hostname in one zone
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChangeRequest {
    /// Hosted zone the batch is applied to
    pub zone_id: String,
    /// Hostname as configured (without the trailing dot)
    pub hostname: String,
    /// Batch comment
    pub comment: String,
    /// Record operations, A first then TXT
    pub changes: Vec<RecordChange>,
}

impl ChangeRequest {
    /// The A record operation of this batch
    pub fn address_change(&self) -> Option<&RecordChange> {
        self.changes.iter().find(|c| c.record_type == RecordType::A)
    }

    /// The TXT audit record operation of this batch
    pub fn audit_change(&self) -> Option<&RecordChange> {
        self.changes.iter().find(|c| c.record_type == RecordType::Txt)
    }
}

/// Build the change batch for `hostname`, stamped with the current time
pub fn build(zone_id: &str, hostname: &str, ip: Ipv4Addr, ttl: Ttl) -> ChangeRequest {
    build_at(zone_id, hostname, ip, ttl, Utc::now())
}

/// Build the change batch for `hostname`, stamped with `timestamp`
pub fn build_at(
    zone_id: &str,
    hostname: &str,
    ip: Ipv4Addr,
    ttl: Ttl,
    timestamp: DateTime<Utc>,
) -> ChangeRequest {
    let name = record_name(hostname);

    ChangeRequest {
        zone_id: zone_id.to_string(),
        hostname: hostname.to_string(),
        comment: CHANGE_COMMENT.to_string(),
        changes: vec![
            RecordChange {
                action: ChangeAction::Upsert,
                name: name.clone(),
                record_type: RecordType::A,
                ttl,
                values: vec![ip.to_string()],
            },
            RecordChange {
                action: ChangeAction::Upsert,
                name,
                record_type: RecordType::Txt,
                ttl,
                values: vec![last_updated_value(timestamp)],
            },
        ],
    }
}

/// Absolute record name for a hostname
pub fn record_name(hostname: &str) -> String {
    if hostname.ends_with('.') {
        hostname.to_string()
    } else {
        format!("{}.", hostname)
    }
}

// TXT values must be quoted on the wire
fn last_updated_value(timestamp: DateTime<Utc>) -> String {
    format!("\"Last Updated: {}\"", timestamp.to_rfc3339())
}
