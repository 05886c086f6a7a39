// # r53-ddns-core
//
// Core library for the HTTP-triggered Route53 DDNS updater.
//
// ## Architecture Overview
//
// A router calls the update endpoint whenever its public address changes.
// This library turns that call into an idempotent record change:
// - **request**: Validates the raw hostname/ip/commit parameters
// - **config**: Immutable hostname → zone/TTL/fallback mapping
// - **change**: Builds the A + TXT upsert batch
// - **UpdateOrchestrator**: Resolves the host, submits the change, falls back
//   to additional hosts and notifies the operator
// - **DnsClient** / **Notifier**: Traits implemented by the provider and
//   notification crates
//
// ## Design Principles
//
// 1. **Explicit configuration**: No global state; config is passed in
// 2. **Fire-and-forget**: Outcomes go to logs and notifications, never to the caller
// 3. **Single attempt**: No retries inside a request
// 4. **Isolated notifications**: A failed notification never affects an update

pub mod change;
pub mod config;
pub mod error;
pub mod orchestrator;
pub mod request;
pub mod traits;

// Re-export core types for convenience
pub use change::{ChangeRequest, RecordChange, RecordType};
pub use config::{AppConfig, HostConfig, PushoverConfig};
pub use error::{Error, Result};
pub use orchestrator::{OrchestratorEvent, UpdateOrchestrator};
pub use request::{UpdateRequest, validate};
pub use traits::{ChangeResponse, DnsClient, NoopNotifier, Notifier, NotifyStatus};
