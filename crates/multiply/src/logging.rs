//! Tracing setup for the request runner.
//!
//! Calculations only emit events; nothing here runs unless the binary (or an
//! embedding application) asks for it.

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LoggingConfig;
use crate::constants::DEFAULT_LOG_FILTER;

/// Pick the filter directive: `RUST_LOG` first, then the configured filter,
/// then the crate default.
pub fn filter_directive(logging: &LoggingConfig) -> String {
    std::env::var(EnvFilter::DEFAULT_ENV)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .or_else(|| logging.filter.clone())
        .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string())
}

/// Install the global subscriber: JSON lines to a daily-rotated file under
/// `log_dir`, compact human-readable lines to stderr.
///
/// The returned [`WorkerGuard`] flushes the file writer on drop, so hold it
/// until the process exits.
pub fn init_tracing(logging: &LoggingConfig) -> Result<WorkerGuard> {
    let directive = filter_directive(logging);
    let env_filter = EnvFilter::try_new(&directive)
        .with_context(|| format!("invalid log filter: {directive}"))?;

    std::fs::create_dir_all(&logging.log_dir)
        .with_context(|| format!("failed to create log dir: {}", logging.log_dir))?;
    let (file_writer, guard) = tracing_appender::non_blocking(tracing_appender::rolling::daily(
        &logging.log_dir,
        &logging.file_prefix,
    ));

    let file_layer = fmt::layer().json().with_ansi(false).with_writer(file_writer);
    let stderr_layer = fmt::layer().compact().with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(stderr_layer)
        .try_init()
        .context("tracing subscriber already installed")?;

    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_filter_prefers_rust_log() {
        std::env::set_var("RUST_LOG", "multiply_calc=trace");
        let logging = LoggingConfig {
            filter: Some("warn".into()),
            ..LoggingConfig::default()
        };
        let directive = filter_directive(&logging);
        std::env::remove_var("RUST_LOG");
        assert_eq!(directive, "multiply_calc=trace");
    }

    #[test]
    #[serial]
    fn test_filter_falls_back_to_config_then_default() {
        std::env::remove_var("RUST_LOG");
        let configured = LoggingConfig {
            filter: Some("multiply_calc=debug".into()),
            ..LoggingConfig::default()
        };
        assert_eq!(filter_directive(&configured), "multiply_calc=debug");
        assert_eq!(filter_directive(&LoggingConfig::default()), DEFAULT_LOG_FILTER);
    }

    #[test]
    #[serial]
    fn test_invalid_filter_is_rejected_before_install() {
        std::env::remove_var("RUST_LOG");
        let dir = tempfile::tempdir().unwrap();
        let logging = LoggingConfig {
            log_dir: dir.path().display().to_string(),
            filter: Some("multiply_calc=notalevel".into()),
            ..LoggingConfig::default()
        };
        let err = init_tracing(&logging).unwrap_err();
        assert!(err.to_string().contains("invalid log filter"));
    }
}
