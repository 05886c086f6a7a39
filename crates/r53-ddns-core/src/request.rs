//! Inbound update requests
//!
//! Router DDNS clients send `hostname`, `ip` and an optional `commit` flag.
//! [`validate`] turns those raw strings into an [`UpdateRequest`]; it performs
//! no lookups and has no side effects.

use serde::Serialize;
use std::net::Ipv4Addr;

use crate::error::{Error, Result};

/// A single update request, one per inbound HTTP call
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpdateRequest {
    /// Hostname as sent by the client, used verbatim as the config key
    pub host: String,
    /// Address literal as sent by the client
    pub ip: String,
    /// Whether the change is actually sent to the DNS provider
    pub commit: bool,
}

impl UpdateRequest {
    /// Create a request without validating it
    pub fn new(host: impl Into<String>, ip: impl Into<String>, commit: bool) -> Self {
        Self {
            host: host.into(),
            ip: ip.into(),
            commit,
        }
    }

    /// Parse the address as a dotted-decimal IPv4 literal
    pub fn ipv4(&self) -> Result<Ipv4Addr> {
        parse_ipv4(&self.ip)
    }
}

/// Validate the raw parameters of an update request
///
/// `raw_commit` defaults to `true` when absent: the service writes unless
/// the caller explicitly asks for a dry run.
pub fn validate(raw_host: &str, raw_ip: &str, raw_commit: Option<&str>) -> Result<UpdateRequest> {
    parse_ipv4(raw_ip)?;

    let commit = match raw_commit {
        Some(raw) => parse_bool(raw)?,
        None => true,
    };

    Ok(UpdateRequest::new(raw_host, raw_ip, commit))
}

/// Parse a dotted-decimal IPv4 literal
///
/// IPv6 literals, including IPv4-mapped ones, are rejected.
pub fn parse_ipv4(raw: &str) -> Result<Ipv4Addr> {
    raw.parse::<Ipv4Addr>().map_err(|_| Error::invalid_address(raw))
}

/// Parse a boolean flag, accepting the spellings common router firmware sends
pub fn parse_bool(raw: &str) -> Result<bool> {
    match raw {
        "1" | "t" | "T" | "true" | "TRUE" | "True" => Ok(true),
        "0" | "f" | "F" | "false" | "FALSE" | "False" => Ok(false),
        _ => Err(Error::invalid_input(format!(
            "commit flag '{}' is not a boolean",
            raw
        ))),
    }
}
