//! Shutdown signal handling
//!
//! Handlers are installed before the listener starts so that a failure to
//! register them is reported as a startup error.

use anyhow::Result;

#[cfg(unix)]
use tokio::signal::unix::{Signal, SignalKind, signal};

/// Registered shutdown signal handlers
#[cfg(unix)]
pub struct ShutdownSignals {
    sigterm: Signal,
    sigint: Signal,
}

#[cfg(unix)]
impl ShutdownSignals {
    /// Register handlers for SIGTERM and SIGINT
    pub fn install() -> Result<Self> {
        let sigterm = signal(SignalKind::terminate())
            .map_err(|e| anyhow::anyhow!("Failed to setup SIGTERM handler: {}", e))?;
        let sigint = signal(SignalKind::interrupt())
            .map_err(|e| anyhow::anyhow!("Failed to setup SIGINT handler: {}", e))?;

        Ok(Self { sigterm, sigint })
    }

    /// Wait for either signal and return its name
    pub async fn recv(mut self) -> &'static str {
        tokio::select! {
            _ = self.sigterm.recv() => "SIGTERM",
            _ = self.sigint.recv() => "SIGINT",
        }
    }
}

/// Registered shutdown signal handlers (CTRL-C only)
///
/// Fallback implementation for non-Unix platforms.
#[cfg(not(unix))]
pub struct ShutdownSignals;

#[cfg(not(unix))]
impl ShutdownSignals {
    pub fn install() -> Result<Self> {
        Ok(Self)
    }

    pub async fn recv(self) -> &'static str {
        match tokio::signal::ctrl_c().await {
            Ok(()) => "SIGINT",
            Err(e) => {
                tracing::error!(error = %e, "Failed to wait for CTRL-C");
                "CTRL-C listener failure"
            }
        }
    }
}
