//!
//! Logging subsystem: configuration types and subscriber setup.
//!

use serde::Deserialize;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

pub use tracing::{debug, error, event as log, info, warn};

/// Log output format.
#[derive(Debug, Default, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable console output.
    #[default]
    Default,
    /// Newline-delimited JSON, one event per line.
    Json,
}

/// Console logging parameters.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ConsoleLogConfig {
    /// Whether console output is emitted at all.
    pub enabled: bool,
    /// Default directive applied when `RUST_LOG` is unset, e.g. `"debug"` or
    /// `"payout_router=debug,actix_web=info"`.
    pub level: String,
    /// Output format.
    pub log_format: LogFormat,
}

impl Default for ConsoleLogConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            level: "info".to_string(),
            log_format: LogFormat::Default,
        }
    }
}

/// File logging parameters.
#[derive(Debug, Default, Deserialize, Clone)]
#[serde(default)]
pub struct FileLogConfig {
    /// Whether events are additionally written to a rolling log file.
    pub enabled: bool,
    /// Directory the rolling file lives in.
    pub path: String,
    /// File name prefix.
    pub file_name: String,
    /// Default directive applied to the file layer.
    pub level: String,
}

/// Logging configuration.
#[derive(Debug, Default, Deserialize, Clone)]
#[serde(default)]
pub struct Log {
    /// Console sink.
    pub console: ConsoleLogConfig,
    /// File sink.
    pub file: FileLogConfig,
}

/// Guard holding the non-blocking writer workers; logging stops flushing once
/// this is dropped, so the caller keeps it alive for the process lifetime.
#[derive(Debug)]
pub struct TelemetryGuard {
    _log_guards: Vec<WorkerGuard>,
}

fn env_filter(default_directive: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive))
}

/// Set up the logging subsystem from configuration. Must be called once,
/// before any events are emitted.
pub fn setup(config: &Log) -> TelemetryGuard {
    let mut guards = Vec::new();

    let file_layer = if config.file.enabled {
        let appender = tracing_appender::rolling::hourly(&config.file.path, &config.file.file_name);
        let (writer, guard) = tracing_appender::non_blocking(appender);
        guards.push(guard);
        let layer = fmt::layer()
            .with_writer(writer)
            .json()
            .with_filter(env_filter(&config.file.level));
        Some(layer)
    } else {
        None
    };

    let console_layer = if config.console.enabled {
        let (writer, guard) = tracing_appender::non_blocking(std::io::stdout());
        guards.push(guard);
        let layer = match config.console.log_format {
            LogFormat::Default => fmt::layer()
                .with_timer(fmt::time::UtcTime::rfc_3339())
                .with_writer(writer)
                .with_filter(env_filter(&config.console.level))
                .boxed(),
            LogFormat::Json => fmt::layer()
                .json()
                .with_writer(writer)
                .with_filter(env_filter(&config.console.level))
                .boxed(),
        };
        Some(layer)
    } else {
        None
    };

    tracing_subscriber::registry()
        .with(file_layer)
        .with(console_layer)
        .init();

    TelemetryGuard {
        _log_guards: guards,
    }
}
