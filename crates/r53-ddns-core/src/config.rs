//! Configuration types for the DDNS updater
//!
//! The configuration is read once at startup from a YAML document and then
//! overlaid with environment variables carrying the [`ENV_PREFIX`] prefix.
//! The resulting [`AppConfig`] is immutable for the life of the process and is
//! handed to the orchestrator explicitly.
//!
//! ```yaml
//! app:
//!   port: 8080
//! records:
//!   example.com:
//!     zoneId: Z0123456789
//!     ttl: 300
//!     additionalHosts:
//!       - backup.example.com
//! pushover:
//!   api-token: aaaa
//!   user-key: uuuu
//! ```
//!
//! ## Environment overrides
//!
//! `UNIFI_R53_DNS_APP_PORT=9090` becomes the path `app.port`. Segments are
//! split on `_` only, so a hostname segment keeps its dots
//! (`UNIFI_R53_DNS_RECORDS_example.com_TTL`), and segments match existing keys
//! case-insensitively (`zoneid` reaches `zoneId`).

use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};
use std::collections::HashMap;
use std::ffi::OsString;
use std::path::Path;
use tracing::{debug, warn};

use crate::error::{Error, Result};

/// Default configuration file, relative to the working directory
pub const CONFIG_FILE_PATH: &str = "config.yaml";

/// Prefix shared by every environment override
pub const ENV_PREFIX: &str = "UNIFI_R53_DNS_";

/// Port used when `app.port` is absent or non-positive
pub const DEFAULT_PORT: u16 = 8080;

/// Record time-to-live, in seconds
pub type Ttl = u32;

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Listener and runtime settings
    #[serde(default)]
    pub app: AppSettings,

    /// Primary hostname -> record configuration
    #[serde(default)]
    pub records: HashMap<String, HostConfig>,

    /// Push notification credentials
    #[serde(default)]
    pub pushover: PushoverConfig,
}

impl AppConfig {
    /// Load the configuration file at `path`, overlaid with the process environment
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        Self::load_with_env(path, utf8_env_vars(std::env::vars_os()))
    }

    /// Load the configuration file at `path`, overlaid with the given variables
    pub fn load_with_env<I>(path: impl AsRef<Path>, vars: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!("Unable to read {}: {}", path.display(), e))
        })?;
        Self::from_yaml_str(&raw, vars)
    }

    /// Parse a YAML document and apply environment overrides
    pub fn from_yaml_str<I>(raw: &str, vars: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut tree: Value = serde_yaml::from_str(raw)?;
        if tree.is_null() {
            tree = Value::Mapping(Mapping::new());
        }

        apply_env_overrides(&mut tree, vars);

        let mut config: AppConfig = serde_yaml::from_value(tree)?;
        config.normalize();
        config.validate()?;

        debug!(config = ?config, "Loaded App Config");
        Ok(config)
    }

    /// Replace out-of-range settings with their defaults
    pub fn normalize(&mut self) {
        if self.app.port <= 0 || self.app.port > i64::from(u16::MAX) {
            warn!(
                port = self.app.port,
                "app.port configured for non-positive or out-of-range value, using default value."
            );
            self.app.port = i64::from(DEFAULT_PORT);
        }

        if self.app.event_channel_capacity == 0 {
            self.app.event_channel_capacity = default_event_channel_capacity();
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        for (host, record) in &self.records {
            if host.is_empty() {
                return Err(Error::config("Record hostname cannot be empty"));
            }
            if record.zone_id.is_empty() {
                return Err(Error::config(format!("records.{}.zoneId is required", host)));
            }
            if record.additional_hosts.iter().any(String::is_empty) {
                return Err(Error::config(format!(
                    "records.{}.additionalHosts contains an empty hostname",
                    host
                )));
            }
        }

        if self.records.is_empty() {
            warn!("No records configured, every update request will be ignored");
        }

        Ok(())
    }

    /// The port the HTTP listener binds to
    pub fn listen_port(&self) -> u16 {
        u16::try_from(self.app.port).unwrap_or(DEFAULT_PORT)
    }

    /// Look up the record configuration of a primary hostname
    pub fn host(&self, hostname: &str) -> Option<&HostConfig> {
        self.records.get(hostname)
    }
}

/// Listener and runtime settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    /// HTTP listener port
    #[serde(default)]
    pub port: i64,

    /// Capacity of the orchestrator event channel
    ///
    /// When full, new events are dropped with a warning log.
    #[serde(
        rename = "eventChannelCapacity",
        default = "default_event_channel_capacity"
    )]
    pub event_channel_capacity: usize,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            port: i64::from(DEFAULT_PORT),
            event_channel_capacity: default_event_channel_capacity(),
        }
    }
}

/// Record configuration for one primary hostname
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostConfig {
    /// Hosted zone the records live in
    #[serde(rename = "zoneId")]
    pub zone_id: String,

    /// TTL applied to both the A and the TXT record
    pub ttl: Ttl,

    /// Fallback hostnames, updated in order when the primary update fails
    #[serde(rename = "additionalHosts", default)]
    pub additional_hosts: Vec<String>,
}

impl HostConfig {
    /// Create a new record configuration
    pub fn new(zone_id: impl Into<String>, ttl: Ttl) -> Self {
        Self {
            zone_id: zone_id.into(),
            ttl,
            additional_hosts: Vec::new(),
        }
    }

    /// Set the fallback hostnames
    pub fn with_additional_hosts<I, S>(mut self, hosts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.additional_hosts = hosts.into_iter().map(Into::into).collect();
        self
    }
}

/// Pushover credentials
///
/// Both values empty means notifications are disabled.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct PushoverConfig {
    /// Application API token
    /// ⚠️ NEVER log this value
    #[serde(rename = "api-token", default)]
    pub api_token: String,

    /// Recipient user key
    #[serde(rename = "user-key", default)]
    pub user_key: String,
}

impl PushoverConfig {
    /// Whether both credentials are present
    pub fn is_configured(&self) -> bool {
        !self.api_token.is_empty() && !self.user_key.is_empty()
    }
}

// Custom Debug implementation that hides the credentials
impl std::fmt::Debug for PushoverConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let redact = |v: &str| if v.is_empty() { "<EMPTY>" } else { "<REDACTED>" };
        f.debug_struct("PushoverConfig")
            .field("api_token", &redact(&self.api_token))
            .field("user_key", &redact(&self.user_key))
            .finish()
    }
}

fn default_event_channel_capacity() -> usize {
    1000
}

/// Keep the variables whose name and value are both valid UTF-8
///
/// Non-UTF-8 entries are skipped; a skipped prefixed entry is logged.
pub fn utf8_env_vars<I>(vars: I) -> Vec<(String, String)>
where
    I: IntoIterator<Item = (OsString, OsString)>,
{
    vars.into_iter()
        .filter_map(|(key, value)| match (key.into_string(), value.into_string()) {
            (Ok(key), Ok(value)) => Some((key, value)),
            (key, _) => {
                let key = match key {
                    Ok(key) => key,
                    Err(raw) => raw.to_string_lossy().into_owned(),
                };
                if key.starts_with(ENV_PREFIX) {
                    warn!(key = %key, "Skipping non-UTF-8 environment override");
                }
                None
            }
        })
        .collect()
}

/// Translate an environment variable name into a configuration path
///
/// Returns `None` for variables outside the prefix or with empty segments.
fn env_key_path(key: &str) -> Option<Vec<String>> {
    let stripped = key.strip_prefix(ENV_PREFIX)?;
    let segments: Vec<String> = stripped
        .to_lowercase()
        .split('_')
        .map(str::to_string)
        .collect();

    if segments.iter().any(String::is_empty) {
        return None;
    }
    Some(segments)
}

/// Overlay prefixed environment variables onto the YAML tree
fn apply_env_overrides<I>(tree: &mut Value, vars: I)
where
    I: IntoIterator<Item = (String, String)>,
{
    for (key, raw) in vars {
        if let Some(path) = env_key_path(&key) {
            debug!(key = %key, path = %path.join("."), "Applying environment override");
            set_path(tree, &path, &raw);
        }
    }
}

fn set_path(node: &mut Value, path: &[String], raw: &str) {
    let Some((head, rest)) = path.split_first() else {
        *node = override_value(node, raw);
        return;
    };

    if !node.is_mapping() {
        *node = Value::Mapping(Mapping::new());
    }
    let Value::Mapping(map) = node else {
        return;
    };

    let key = map
        .keys()
        .find(|k| k.as_str().is_some_and(|s| s.eq_ignore_ascii_case(head)))
        .cloned()
        .unwrap_or_else(|| Value::String(head.clone()));

    let slot = map.entry(key).or_insert(Value::Null);
    set_path(slot, rest, raw);
}

/// Strings stay strings; anything else is parsed as a YAML scalar
fn override_value(existing: &Value, raw: &str) -> Value {
    if existing.is_string() {
        return Value::String(raw.to_string());
    }

    match serde_yaml::from_str::<Value>(raw) {
        Ok(v) if !v.is_null() && !v.is_mapping() && !v.is_sequence() => v,
        _ => Value::String(raw.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
app:
  port: 8081
records:
  example.com:
    zoneId: Z1
    ttl: 300
    additionalHosts:
      - backup.example.com
      - backup2.example.com
  other.example.org:
    zoneId: Z2
    ttl: 60
pushover:
  api-token: token-value
  user-key: user-value
"#;

    fn no_env() -> Vec<(String, String)> {
        Vec::new()
    }

    fn env(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_parse_sample() {
        let config = AppConfig::from_yaml_str(SAMPLE, no_env()).unwrap();

        assert_eq!(config.listen_port(), 8081);
        assert_eq!(config.records.len(), 2);

        let primary = config.host("example.com").unwrap();
        assert_eq!(primary.zone_id, "Z1");
        assert_eq!(primary.ttl, 300);
        assert_eq!(
            primary.additional_hosts,
            vec!["backup.example.com", "backup2.example.com"]
        );

        let other = config.host("other.example.org").unwrap();
        assert!(other.additional_hosts.is_empty());

        assert!(config.pushover.is_configured());
        assert_eq!(config.app.event_channel_capacity, 1000);
    }

    #[test]
    fn test_hostnames_are_case_sensitive() {
        let config = AppConfig::from_yaml_str(SAMPLE, no_env()).unwrap();
        assert!(config.host("Example.com").is_none());
    }

    #[test]
    fn test_missing_port_uses_default() {
        let config = AppConfig::from_yaml_str("records: {}", no_env()).unwrap();
        assert_eq!(config.listen_port(), DEFAULT_PORT);
    }

    #[test]
    fn test_non_positive_port_uses_default() {
        let config = AppConfig::from_yaml_str("app:\n  port: -5\n", no_env()).unwrap();
        assert_eq!(config.listen_port(), DEFAULT_PORT);

        let config = AppConfig::from_yaml_str("app:\n  port: 0\n", no_env()).unwrap();
        assert_eq!(config.listen_port(), DEFAULT_PORT);
    }

    #[test]
    fn test_empty_document() {
        let config = AppConfig::from_yaml_str("", no_env()).unwrap();
        assert!(config.records.is_empty());
        assert!(!config.pushover.is_configured());
        assert_eq!(config.listen_port(), DEFAULT_PORT);
    }

    #[test]
    fn test_env_overrides_port() {
        let vars = env(&[("UNIFI_R53_DNS_APP_PORT", "9090"), ("PATH", "/usr/bin")]);
        let config = AppConfig::from_yaml_str(SAMPLE, vars).unwrap();
        assert_eq!(config.listen_port(), 9090);
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_env_vars_are_skipped() {
        use std::os::unix::ffi::OsStringExt;

        let vars = vec![
            (OsString::from_vec(b"UNRELATED_\xff".to_vec()), OsString::from("x")),
            (OsString::from_vec(b"UNIFI_R53_DNS_\xff".to_vec()), OsString::from("1")),
            (
                OsString::from("UNIFI_R53_DNS_APP_PORT"),
                OsString::from_vec(b"90\xff".to_vec()),
            ),
            (OsString::from("UNIFI_R53_DNS_RECORDS_example.com_TTL"), OsString::from("60")),
        ];

        let kept = utf8_env_vars(vars);
        assert_eq!(
            kept,
            vec![("UNIFI_R53_DNS_RECORDS_example.com_TTL".to_string(), "60".to_string())]
        );

        let config = AppConfig::from_yaml_str(SAMPLE, kept).unwrap();
        assert_eq!(config.listen_port(), 8081);
        assert_eq!(config.host("example.com").unwrap().ttl, 60);
    }

    #[test]
    fn test_load_tolerates_process_environment() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, SAMPLE).unwrap();

        assert!(AppConfig::load(&path).is_ok());
    }

    #[test]
    fn test_env_matches_keys_case_insensitively() {
        let vars = env(&[
            ("UNIFI_R53_DNS_RECORDS_example.com_ZONEID", "Z9"),
            ("UNIFI_R53_DNS_RECORDS_example.com_TTL", "120"),
        ]);
        let config = AppConfig::from_yaml_str(SAMPLE, vars).unwrap();

        let primary = config.host("example.com").unwrap();
        assert_eq!(primary.zone_id, "Z9");
        assert_eq!(primary.ttl, 120);
        assert_eq!(primary.additional_hosts.len(), 2);
    }

    #[test]
    fn test_env_credentials_stay_strings() {
        let vars = env(&[("UNIFI_R53_DNS_PUSHOVER_API-TOKEN", "12345")]);
        let config = AppConfig::from_yaml_str(SAMPLE, vars).unwrap();
        assert_eq!(config.pushover.api_token, "12345");
    }

    #[test]
    fn test_env_creates_missing_sections() {
        let vars = env(&[
            ("UNIFI_R53_DNS_PUSHOVER_API-TOKEN", "tok"),
            ("UNIFI_R53_DNS_PUSHOVER_USER-KEY", "usr"),
        ]);
        let config = AppConfig::from_yaml_str("records: {}", vars).unwrap();
        assert!(config.pushover.is_configured());
    }

    #[test]
    fn test_unrelated_prefixed_vars_are_ignored() {
        let vars = env(&[
            ("UNIFI_R53_DNS_LOG_LEVEL", "info"),
            ("UNIFI_R53_DNS_CONFIG", "/etc/r53/config.yaml"),
            ("UNIFI_R53_DNS__BROKEN", "x"),
        ]);
        let config = AppConfig::from_yaml_str(SAMPLE, vars).unwrap();
        assert_eq!(config.listen_port(), 8081);
    }

    #[test]
    fn test_missing_zone_id_is_rejected() {
        let raw = "records:\n  example.com:\n    zoneId: ''\n    ttl: 300\n";
        let err = AppConfig::from_yaml_str(raw, no_env()).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_negative_ttl_is_rejected() {
        let raw = "records:\n  example.com:\n    zoneId: Z1\n    ttl: -1\n";
        let err = AppConfig::from_yaml_str(raw, no_env()).unwrap_err();
        assert!(matches!(err, Error::Yaml(_)));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, SAMPLE).unwrap();

        let config = AppConfig::load_with_env(&path, no_env()).unwrap();
        assert_eq!(config.records.len(), 2);
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = AppConfig::load_with_env(dir.path().join("absent.yaml"), no_env()).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_credentials_not_exposed_in_debug() {
        let config = AppConfig::from_yaml_str(SAMPLE, no_env()).unwrap();
        let debug_str = format!("{:?}", config);
        assert!(!debug_str.contains("token-value"));
        assert!(!debug_str.contains("user-value"));
        assert!(debug_str.contains("PushoverConfig"));
    }

    #[test]
    fn test_env_key_path() {
        assert_eq!(
            env_key_path("UNIFI_R53_DNS_APP_PORT"),
            Some(vec!["app".to_string(), "port".to_string()])
        );
        assert_eq!(env_key_path("HOME"), None);
        assert_eq!(env_key_path("UNIFI_R53_DNS_"), None);
    }
}
