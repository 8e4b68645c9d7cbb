//! Tracing subscriber setup.
//!
//! Filter precedence: `RUST_LOG`, then `NETGEN_LOG`, then `info`. Logs go to
//! stderr so command output on stdout stays pipeable.

use std::env;

use anyhow::{anyhow, Result};
use clap::ValueEnum;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Environment variable consulted when `RUST_LOG` is unset.
pub const LOG_ENV: &str = "NETGEN_LOG";

const DEFAULT_DIRECTIVE: &str = "info";

/// Console log format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human-readable output for development.
    #[default]
    Pretty,
    /// One JSON object per line for log collectors.
    Json,
}

/// Build the filter from the environment.
///
/// The first of `RUST_LOG` and `NETGEN_LOG` that is set wins; a set but
/// unparsable value is an error rather than a silent fallback.
pub fn env_filter() -> Result<EnvFilter> {
    filter_from(
        env::var(EnvFilter::DEFAULT_ENV).ok(),
        env::var(LOG_ENV).ok(),
    )
}

fn filter_from(rust_log: Option<String>, netgen_log: Option<String>) -> Result<EnvFilter> {
    let chosen = [(EnvFilter::DEFAULT_ENV, rust_log), (LOG_ENV, netgen_log)]
        .into_iter()
        .find_map(|(var, value)| value.filter(|v| !v.trim().is_empty()).map(|v| (var, v)));

    match chosen {
        Some((var, directives)) => EnvFilter::try_new(&directives)
            .map_err(|e| anyhow!("invalid log filter in {}={:?}: {}", var, directives, e)),
        None => Ok(EnvFilter::new(DEFAULT_DIRECTIVE)),
    }
}

/// Install the global subscriber.
pub fn init(format: LogFormat) -> Result<()> {
    let filter = env_filter()?;

    match format {
        LogFormat::Json => {
            let json_layer = tracing_subscriber::fmt::layer()
                .json()
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .with_writer(std::io::stderr);
            tracing_subscriber::registry()
                .with(filter)
                .with(json_layer)
                .try_init()
                .map_err(|e| anyhow!("failed to install tracing subscriber: {}", e))?;
        }
        LogFormat::Pretty => {
            let fmt_layer = tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .with_writer(std::io::stderr);
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt_layer)
                .try_init()
                .map_err(|e| anyhow!("failed to install tracing subscriber: {}", e))?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const BAD: &str = "netgen_core=notalevel";

    #[test]
    fn test_defaults_when_unset_or_blank() {
        assert!(filter_from(None, None).is_ok());
        assert!(filter_from(Some(String::new()), Some("  ".into())).is_ok());
    }

    #[test]
    fn test_rust_log_takes_precedence() {
        // NETGEN_LOG is never parsed once RUST_LOG is set
        assert!(filter_from(Some("debug".into()), Some(BAD.into())).is_ok());
        assert!(filter_from(None, Some("netgen_core=trace".into())).is_ok());
    }

    #[test]
    fn test_invalid_filter_is_reported() {
        let err = filter_from(Some(BAD.into()), Some("info".into())).unwrap_err();
        assert!(err.to_string().contains("RUST_LOG"), "{}", err);

        let err = filter_from(None, Some(BAD.into())).unwrap_err();
        assert!(err.to_string().contains(LOG_ENV), "{}", err);
    }
}
