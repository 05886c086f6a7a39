// # r53-ddnsd
//
// Thin HTTP shell around `r53-ddns-core`.
//
// CRITICAL RULES:
// - DO NOT add DNS logic, fallback logic or retry logic here
// - All update semantics live in `UpdateOrchestrator`
// - Handlers parse the request, hand it over, and always answer 200
//
// The daemon is responsible for:
// 1. Initializing logging from the environment
// 2. Loading the configuration file and its environment overrides
// 3. Building the Route53 client and the Pushover notifier
// 4. Serving `/nic/update` and `/health-check` until a shutdown signal

pub mod http;
pub mod logging;
pub mod shutdown;

/// Alternate configuration file path
pub const ENV_CONFIG_PATH: &str = "UNIFI_R53_DNS_CONFIG";

/// Log level override (trace, debug, info, warn, error)
pub const ENV_LOG_LEVEL: &str = "UNIFI_R53_DNS_LOG_LEVEL";

/// Presence selects human-readable console logging
pub const ENV_DEV_MODE: &str = "DEV_MODE";
