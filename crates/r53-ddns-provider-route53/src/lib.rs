// # Route53 DNS Client
//
// This crate provides the Amazon Route53 implementation of `DnsClient`.
//
// ## Implementation Status
//
// - ✅ One `ChangeResourceRecordSets` call per change batch
// - ✅ Full error propagation to the orchestrator
// - ✅ Operation timeout configured (30 seconds)
// - ✅ Credentials and region from the standard AWS provider chain
// - ❌ NO retry logic (SDK retries disabled, one attempt per host)
// - ❌ NO caching
// - ❌ NO background tasks
//
// ## Architectural Constraints
//
// ### Trust Level: Untrusted (DNS Client)
//
// **Allowed Capabilities**:
// - ✅ Call the Route53 control-plane API
// - ✅ Translate change batches into SDK types
//
// **Forbidden Capabilities** (enforced by code review):
// - ❌ Spawn tasks or threads
// - ❌ Retry failed changes
// - ❌ Decide which hosts are updated (owned by UpdateOrchestrator)
// - ❌ Notify the operator (owned by UpdateOrchestrator)
//
// ## Security Requirements
//
// - AWS credentials NEVER appear in logs
// - Credentials are resolved by the SDK, never read by this crate
//
// ## API Reference
//
// - ChangeResourceRecordSets: https://docs.aws.amazon.com/Route53/latest/APIReference/API_ChangeResourceRecordSets.html

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_config::retry::RetryConfig;
use aws_config::timeout::TimeoutConfig;
use aws_sdk_route53::error::DisplayErrorContext;
use aws_sdk_route53::primitives::DateTimeFormat;
use aws_sdk_route53::types::{
    Change, ChangeAction as SdkChangeAction, ChangeBatch, ResourceRecord, ResourceRecordSet,
    RrType,
};
use r53_ddns_core::change::{ChangeAction, ChangeRequest, RecordChange, RecordType};
use r53_ddns_core::traits::{ChangeResponse, DnsClient};
use r53_ddns_core::{Error, Result};
use std::time::Duration;

/// Provider name used in logs and errors
const PROVIDER_NAME: &str = "route53";

/// Default timeout for a single API operation (30 seconds)
const DEFAULT_OPERATION_TIMEOUT: Duration = Duration::from_secs(30);

/// Route53 DNS client
///
/// # Trust Level: Untrusted
///
/// This client is stateless and single-shot. It submits exactly the batch it
/// is given and reports the outcome.
pub struct Route53Client {
    /// AWS SDK client
    client: aws_sdk_route53::Client,
}

impl std::fmt::Debug for Route53Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Route53Client")
            .field("provider", &PROVIDER_NAME)
            .field("credentials", &"<REDACTED>")
            .finish()
    }
}

impl Route53Client {
    /// Wrap an already-configured SDK client
    pub fn new(client: aws_sdk_route53::Client) -> Self {
        Self { client }
    }

    /// Build a client from the ambient AWS environment
    ///
    /// Credentials and region are resolved by the standard provider chain
    /// (environment variables, shared config files, instance roles). SDK
    /// retries are disabled so that each host sees at most one attempt.
    pub async fn from_env() -> Self {
        let timeouts = TimeoutConfig::builder()
            .operation_timeout(DEFAULT_OPERATION_TIMEOUT)
            .build();

        let sdk_config = aws_config::defaults(BehaviorVersion::latest())
            .retry_config(RetryConfig::disabled())
            .timeout_config(timeouts)
            .load()
            .await;

        tracing::debug!(
            region = ?sdk_config.region(),
            "Loaded AWS configuration"
        );

        Self::new(aws_sdk_route53::Client::new(&sdk_config))
    }
}

#[async_trait]
impl DnsClient for Route53Client {
    async fn change_record_sets(&self, change: &ChangeRequest) -> Result<ChangeResponse> {
        let batch = to_change_batch(change)?;

        tracing::debug!(
            zone_id = %change.zone_id,
            host = %change.hostname,
            "Submitting ChangeResourceRecordSets"
        );

        let output = self
            .client
            .change_resource_record_sets()
            .hosted_zone_id(&change.zone_id)
            .change_batch(batch)
            .send()
            .await
            .map_err(|e| {
                Error::remote_update(
                    PROVIDER_NAME,
                    &change.hostname,
                    DisplayErrorContext(&e).to_string(),
                )
            })?;

        let info = output.change_info().ok_or_else(|| {
            Error::remote_update(PROVIDER_NAME, &change.hostname, "Response missing ChangeInfo")
        })?;

        Ok(ChangeResponse {
            id: info.id().to_string(),
            status: info.status().as_str().to_string(),
            submitted_at: info.submitted_at().fmt(DateTimeFormat::DateTime).ok(),
        })
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER_NAME
    }
}

/// Translate a change batch into the SDK's `ChangeBatch`
pub fn to_change_batch(change: &ChangeRequest) -> Result<ChangeBatch> {
    let mut builder = ChangeBatch::builder().comment(&change.comment);

    for record in &change.changes {
        let sdk_change = Change::builder()
            .action(to_sdk_action(record.action))
            .resource_record_set(to_record_set(record)?)
            .build()
            .map_err(|e| build_error(&change.hostname, e))?;
        builder = builder.changes(sdk_change);
    }

    builder.build().map_err(|e| build_error(&change.hostname, e))
}

/// Translate one record operation into a `ResourceRecordSet`
pub fn to_record_set(record: &RecordChange) -> Result<ResourceRecordSet> {
    let mut builder = ResourceRecordSet::builder()
        .name(&record.name)
        .r#type(to_rr_type(record.record_type))
        .ttl(i64::from(record.ttl));

    for value in &record.values {
        let rr = ResourceRecord::builder()
            .value(value)
            .build()
            .map_err(|e| build_error(&record.name, e))?;
        builder = builder.resource_records(rr);
    }

    builder.build().map_err(|e| build_error(&record.name, e))
}

fn to_sdk_action(action: ChangeAction) -> SdkChangeAction {
    match action {
        ChangeAction::Upsert => SdkChangeAction::Upsert,
    }
}

fn to_rr_type(record_type: RecordType) -> RrType {
    match record_type {
        RecordType::A => RrType::A,
        RecordType::Txt => RrType::Txt,
    }
}

fn build_error(host: &str, e: impl std::fmt::Display) -> Error {
    Error::remote_update(PROVIDER_NAME, host, format!("Invalid change batch: {}", e))
}
