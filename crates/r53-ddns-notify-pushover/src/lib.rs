// # Pushover Notifier
//
// This crate provides the Pushover implementation of `Notifier`.
//
// ## Behaviour
//
// - One POST to the Pushover messages endpoint per notification
// - Normal priority, no sound or device targeting
// - When either credential is empty the notification is skipped, not failed
// - Delivery failures are returned to the orchestrator, which logs them
//
// ## Security Requirements
//
// - The API token and user key NEVER appear in logs or Debug output
//
// ## API Reference
//
// - Messages API: https://pushover.net/api#messages

use async_trait::async_trait;
use r53_ddns_core::config::PushoverConfig;
use r53_ddns_core::traits::{Notifier, NotifyStatus};
use r53_ddns_core::{Error, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::instrument;

/// Pushover messages endpoint
pub const PUSHOVER_API_URL: &str = "https://api.pushover.net/1/messages.json";

/// Normal message priority
const PRIORITY_NORMAL: i8 = 0;

/// Default HTTP timeout (10 seconds)
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(10);

const NOTIFIER_NAME: &str = "pushover";

/// Form body of a message submission
#[derive(Debug, Serialize)]
struct MessageForm<'a> {
    token: &'a str,
    user: &'a str,
    message: &'a str,
    priority: i8,
}

/// Messages API response body
#[derive(Debug, Deserialize)]
struct MessageResponse {
    status: i32,
    #[serde(default)]
    request: Option<String>,
    #[serde(default)]
    errors: Vec<String>,
}

/// Pushover notifier
pub struct PushoverNotifier {
    config: PushoverConfig,
    endpoint: String,
    client: Client,
}

impl std::fmt::Debug for PushoverNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PushoverNotifier")
            .field("config", &self.config)
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

impl PushoverNotifier {
    /// Create a notifier posting to the public Pushover API
    pub fn new(config: PushoverConfig) -> Result<Self> {
        Self::with_endpoint(config, PUSHOVER_API_URL)
    }

    /// Create a notifier posting to `endpoint`
    pub fn with_endpoint(config: PushoverConfig, endpoint: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .user_agent(format!(
                "{}/{}",
                env!("CARGO_PKG_NAME"),
                env!("CARGO_PKG_VERSION")
            ))
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .build()
            .map_err(|e| {
                Error::notification(NOTIFIER_NAME, format!("HTTP client setup failed: {}", e))
            })?;

        Ok(Self {
            config,
            endpoint: endpoint.into(),
            client,
        })
    }

    /// Whether credentials are present
    pub fn is_configured(&self) -> bool {
        self.config.is_configured()
    }
}

/// Message text for an update outcome
pub fn message(host: &str, error: Option<&Error>) -> String {
    match error {
        None => format!("IP Updated for: {}", host),
        Some(_) => format!("Error: IP Update Failed for: {}", host),
    }
}

#[async_trait]
impl Notifier for PushoverNotifier {
    #[instrument(skip(self, error), fields(failed = error.is_some()))]
    async fn notify(&self, host: &str, error: Option<&Error>) -> Result<NotifyStatus> {
        if !self.is_configured() {
            return Ok(NotifyStatus::Skipped);
        }

        let text = message(host, error);
        let form = MessageForm {
            token: &self.config.api_token,
            user: &self.config.user_key,
            message: &text,
            priority: PRIORITY_NORMAL,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .form(&form)
            .send()
            .await
            .map_err(|e| {
                Error::notification(NOTIFIER_NAME, format!("HTTP request failed: {}", e))
            })?;

        let status = response.status();
        let body: MessageResponse = response
            .json()
            .await
            .map_err(|e| {
                Error::notification(
                    NOTIFIER_NAME,
                    format!("Failed to parse response (HTTP {}): {}", status, e),
                )
            })?;

        if !status.is_success() || body.status != 1 {
            return Err(Error::notification(
                NOTIFIER_NAME,
                format!("HTTP {}: {}", status, body.errors.join(", ")),
            ));
        }

        tracing::debug!(request = ?body.request, "Pushover accepted notification");
        Ok(NotifyStatus::Sent)
    }

    fn notifier_name(&self) -> &'static str {
        NOTIFIER_NAME
    }
}
