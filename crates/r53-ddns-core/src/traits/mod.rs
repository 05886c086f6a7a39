//! Core traits for the DDNS updater
//!
//! This module defines the interfaces of the two remote collaborators.
//!
//! - [`DnsClient`]: Submit record changes to the DNS provider
//! - [`Notifier`]: Tell the operator about update outcomes

pub mod dns_client;
pub mod notifier;

pub use dns_client::{ChangeResponse, DnsClient};
pub use notifier::{NoopNotifier, Notifier, NotifyStatus};
