//! Module for telemetry functionality such as logging

use anyhow::Result;
use tracing::debug;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Sets up logging for the `fixture-guard` binary. The log level is taken from the `RUST_LOG` env
/// variable (default is `info`). The logging format (pretty/json) is set by the `LOG_FORMAT` env
/// variable.
pub fn setup_logging() -> Result<()> {
    let format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string());

    if format == "json" {
        tracing_subscriber::registry()
            .with(env_filter("info"))
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr), // stdout carries manifests and reports
            )
            .try_init()?;
    } else {
        tracing_subscriber::registry()
            .with(env_filter("info"))
            .with(
                tracing_subscriber::fmt::layer()
                    .pretty()
                    .with_writer(std::io::stderr), // stdout carries manifests and reports
            )
            .try_init()?;
    }
    debug!("debug logging enabled");
    Ok(())
}

/// Sets up logging for suites running under `cargo test`, so that it is captured per test.
///
/// Quiet unless `RUST_LOG` asks for more. Safe to call from every test; only the first call
/// installs a subscriber.
pub fn setup_test_logging() {
    let _ = tracing_subscriber::registry()
        .with(env_filter("warn"))
        .with(tracing_subscriber::fmt::layer().with_test_writer())
        .try_init();
}

fn env_filter(default: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into())
}
