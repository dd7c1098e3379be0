//! Logging system configuration and initialization
//!
//! Console logging is always enabled; when a log directory is configured a
//! daily-rolling file layer is added on top. The filter is taken from
//! `ISITFILM_LOG`, then `RUST_LOG`, then defaults to `info`.

use anyhow::{Result, anyhow};
use once_cell::sync::OnceCell;
use tracing_appender::{non_blocking, non_blocking::WorkerGuard, rolling};
use tracing_subscriber::{
    EnvFilter, Registry, fmt, layer::SubscriberExt, util::SubscriberInitExt,
};

use crate::infrastructure::config::LoggingConfig;

// Keeps the non-blocking file writer alive for the lifetime of the process.
static LOG_GUARD: OnceCell<WorkerGuard> = OnceCell::new();

/// Initialize the logging system with default configuration (console only).
pub fn init_logging() -> Result<()> {
    init_logging_with_config(&LoggingConfig::default())
}

/// Initialize the logging system from the given configuration.
pub fn init_logging_with_config(config: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_env("ISITFILM_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = Registry::default().with(filter).with(fmt::layer());

    match &config.log_dir {
        Some(dir) => {
            let appender = rolling::daily(dir, "isitfilm.log");
            let (writer, guard) = non_blocking(appender);
            let _ = LOG_GUARD.set(guard);

            registry
                .with(fmt::layer().with_writer(writer).with_ansi(false))
                .try_init()
                .map_err(|e| anyhow!("failed to initialize logging: {e}"))?;
        }
        None => {
            registry
                .try_init()
                .map_err(|e| anyhow!("failed to initialize logging: {e}"))?;
        }
    }

    Ok(())
}
