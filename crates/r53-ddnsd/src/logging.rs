//! Process-wide tracing subscriber setup

use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Level used when no valid override is set
pub const DEFAULT_LOG_LEVEL: Level = Level::DEBUG;

/// Output format of the global subscriber
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable console output on stderr
    Pretty,
    /// One JSON object per line on stdout
    Json,
}

impl LogFormat {
    /// Dev mode selects console output, everything else is JSON
    pub fn from_dev_mode(dev_mode: bool) -> Self {
        if dev_mode {
            LogFormat::Pretty
        } else {
            LogFormat::Json
        }
    }
}

/// Parse a level name, case-insensitively
pub fn parse_level(raw: &str) -> Option<Level> {
    raw.trim().parse::<Level>().ok()
}

/// Resolve the effective level from an optional override
pub fn effective_level(raw: Option<&str>) -> Level {
    raw.and_then(parse_level).unwrap_or(DEFAULT_LOG_LEVEL)
}

/// Install the global subscriber
pub fn init(format: LogFormat, level: Level) -> anyhow::Result<()> {
    match format {
        LogFormat::Pretty => {
            let subscriber = FmtSubscriber::builder()
                .with_max_level(level)
                .with_writer(std::io::stderr)
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
        LogFormat::Json => {
            let subscriber = FmtSubscriber::builder()
                .with_max_level(level)
                .json()
                .with_current_span(true)
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
    }
    Ok(())
}
