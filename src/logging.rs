//! Tracing initialization.
//!
//! Logs go to stderr so stdout carries only the transcript. The filter is
//! read from `TRAVEL_AGENT_LOG`, then `RUST_LOG`, falling back to warnings
//! from this crate only.

use tracing_subscriber::{prelude::*, EnvFilter};

use crate::constants::{DEFAULT_LOG_FILTER, LOG_ENV};

/// Installs the global subscriber. Call once at process startup.
pub fn init() {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true),
        )
        .try_init();
}
