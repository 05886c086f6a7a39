// # DNS Client Trait
//
// Defines the interface for submitting record changes to the DNS provider's
// control plane.
//
// ## Implementations
//
// - Route53: `r53-ddns-provider-route53` crate
//
// ## Usage
//
// ```rust,ignore
// use r53_ddns_core::{change, DnsClient};
//
// #[tokio::main]
// async fn main() -> anyhow::Result<()> {
//     let client = /* DnsClient implementation */;
//
//     let change = change::build("Z1", "example.com", "203.0.113.5".parse()?, 300);
//     let response = client.change_record_sets(&change).await?;
//     println!("submitted change {}", response.id);
//
//     Ok(())
// }
// ```

use async_trait::async_trait;
use serde::Serialize;

use crate::change::ChangeRequest;

/// Provider acknowledgement of a submitted change batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChangeResponse {
    /// Provider-assigned change identifier
    pub id: String,
    /// Provider-reported status (e.g. `PENDING`, `INSYNC`)
    pub status: String,
    /// Submission time as reported by the provider
    pub submitted_at: Option<String>,
}

/// Trait for DNS control-plane clients
///
/// # Thread Safety
///
/// Implementations must be safe to share between concurrently running
/// request handlers. The orchestrator adds no locking of its own.
///
/// # Trust Level: Untrusted
///
/// ## Allowed Capabilities
/// - ✅ Perform API calls to the provider endpoint
/// - ✅ Translate the provider's errors into [`crate::Error::RemoteUpdate`]
///
/// ## Forbidden Capabilities
/// - ❌ Retry failed calls (one attempt per host per request)
/// - ❌ Decide which hosts to update (owned by `UpdateOrchestrator`)
/// - ❌ Send notifications (owned by `Notifier`)
/// - ❌ Cache state between calls
#[async_trait]
pub trait DnsClient: Send + Sync {
    /// Submit a change batch
    ///
    /// Every record operation in the batch is an upsert, so submitting the
    /// same batch twice must leave the zone in the same state.
    ///
    /// # Returns
    ///
    /// - `Ok(ChangeResponse)`: The provider accepted the batch
    /// - `Err(Error)`: Network, authentication, quota or validation failure
    async fn change_record_sets(
        &self,
        change: &ChangeRequest,
    ) -> Result<ChangeResponse, crate::Error>;

    /// Get the provider name (for logging/debugging)
    fn provider_name(&self) -> &'static str;
}
