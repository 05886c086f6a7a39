// # r53-ddnsd - Route53 DDNS Daemon
//
// ⚠️ ARCHITECTURAL CONSTRAINTS ⚠️
//
// - This is a THIN integration layer ONLY
// - DO NOT add business logic, DNS logic, or retry logic here
// - All update logic MUST be in r53-ddns-core
//
// ## Configuration
//
// The configuration file is `config.yaml` in the working directory, or the
// path in `UNIFI_R53_DNS_CONFIG`. Any `UNIFI_R53_DNS_*` variable overrides
// the matching key, `_` separating path segments:
//
// - `UNIFI_R53_DNS_APP_PORT=9090` sets `app.port`
// - `UNIFI_R53_DNS_PUSHOVER_API-TOKEN=...` sets `pushover.api-token`
//
// ### Process
// - `UNIFI_R53_DNS_LOG_LEVEL`: trace, debug, info, warn, error (default: debug)
// - `DEV_MODE`: when present, log human-readable output instead of JSON
//
// ### AWS
// Credentials and region come from the standard AWS environment
// (`AWS_ACCESS_KEY_ID`, `AWS_PROFILE`, `AWS_REGION`, instance roles, ...).
//
// ## Example
//
// ```bash
// export UNIFI_R53_DNS_LOG_LEVEL=info
// export AWS_REGION=us-east-1
//
// r53-ddnsd
// curl 'http://localhost:8080/nic/update?hostname=home.example.com&ip=203.0.113.5'
// ```

use anyhow::{Context, Result};
use r53_ddns_core::{AppConfig, UpdateOrchestrator};
use r53_ddns_notify_pushover::PushoverNotifier;
use r53_ddns_provider_route53::Route53Client;
use r53_ddnsd::logging::{self, LogFormat};
use r53_ddnsd::shutdown::ShutdownSignals;
use r53_ddnsd::{ENV_CONFIG_PATH, ENV_DEV_MODE, ENV_LOG_LEVEL, http};
use std::env;
use std::net::{Ipv4Addr, SocketAddr};
use std::process::ExitCode;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{debug, error, info, warn};

/// Exit codes for different termination scenarios
///
/// These codes follow systemd conventions:
/// - 0: Clean shutdown
/// - 1: Configuration or startup error
/// - 2: Runtime error (unexpected)
#[derive(Debug, Clone, Copy)]
enum DaemonExitCode {
    /// Clean shutdown (normal exit)
    CleanShutdown = 0,
    /// Configuration error or startup failure
    ConfigError = 1,
    /// Runtime error (unexpected failure)
    RuntimeError = 2,
}

impl From<DaemonExitCode> for ExitCode {
    fn from(code: DaemonExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Everything needed to start serving
struct Daemon {
    listener: TcpListener,
    app: axum::Router,
    signals: ShutdownSignals,
}

fn main() -> ExitCode {
    // Initialize tracing
    let raw_level = env::var(ENV_LOG_LEVEL).ok();
    let level = logging::effective_level(raw_level.as_deref());
    let format = LogFormat::from_dev_mode(env::var_os(ENV_DEV_MODE).is_some());

    if let Err(e) = logging::init(format, level) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return DaemonExitCode::ConfigError.into();
    }

    if let Some(raw) = raw_level.as_deref()
        && logging::parse_level(raw).is_none()
    {
        warn!(value = %raw, "Unrecognized {}, using {}", ENV_LOG_LEVEL, level);
    }

    // Load configuration
    let config_path = env::var(ENV_CONFIG_PATH).unwrap_or_else(|_| {
        r53_ddns_core::config::CONFIG_FILE_PATH.to_string()
    });

    let config = match AppConfig::load(&config_path) {
        Ok(config) => config,
        Err(e) => {
            error!(path = %config_path, error = %e, "Unable to load config");
            return DaemonExitCode::ConfigError.into();
        }
    };

    info!(
        path = %config_path,
        records = config.records.len(),
        "Configuration loaded"
    );

    // Enter tokio runtime
    let rt = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return DaemonExitCode::RuntimeError.into();
        }
    };

    let result = rt.block_on(async {
        let daemon = match start(config).await {
            Ok(daemon) => daemon,
            Err(e) => {
                error!("Startup error: {:#}", e);
                return DaemonExitCode::ConfigError;
            }
        };

        if let Err(e) = run(daemon).await {
            error!("Daemon error: {:#}", e);
            DaemonExitCode::RuntimeError
        } else {
            DaemonExitCode::CleanShutdown
        }
    });

    result.into()
}

/// Build the collaborators and bind the listener
async fn start(config: AppConfig) -> Result<Daemon> {
    let port = config.listen_port();

    let client = Route53Client::from_env().await;
    debug!("route53 Client Initialized");

    let notifier = PushoverNotifier::new(config.pushover.clone())
        .context("Failed to build Pushover notifier")?;
    if !notifier.is_configured() {
        info!("Pushover notification not configured.");
    }

    // Events are for embedders and tests; the daemon relies on logs
    let (orchestrator, _events) =
        UpdateOrchestrator::new(Arc::new(client), Arc::new(notifier), Arc::new(config));

    let signals = ShutdownSignals::install()?;

    let addr = SocketAddr::from((Ipv4Addr::UNSPECIFIED, port));
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!(addr = %addr, "Application Initialized");

    Ok(Daemon {
        listener,
        app: http::router(Arc::new(orchestrator)),
        signals,
    })
}

/// Serve until a shutdown signal arrives
async fn run(daemon: Daemon) -> Result<()> {
    let Daemon {
        listener,
        app,
        signals,
    } = daemon;

    let shutdown = async move {
        let signal = signals.recv().await;
        info!("Received shutdown signal: {}", signal);
        info!("Shutting down daemon");
    };

    http::serve(listener, app, shutdown)
        .await
        .context("HTTP server failed")
}
