#![forbid(unsafe_code)]

//! Subscriber setup for hosts that do not install their own.
//!
//! Filtering comes from `WAYMARK_LOG`, then `RUST_LOG`, then the default
//! directive passed in. Engine events use the `waymark.tour`,
//! `waymark.tracker`, `waymark.panel` and `waymark.scheduler` targets, so
//! `WAYMARK_LOG=waymark.tour=debug` narrows output to navigation.

use tracing_subscriber::EnvFilter;

use crate::{Error, Result};

/// Environment variable consulted before `RUST_LOG`.
pub const LOG_ENV: &str = "WAYMARK_LOG";

/// Default directive when neither variable is set.
pub const DEFAULT_DIRECTIVE: &str = "warn";

/// Build the filter from the environment, falling back to `default_directive`.
pub fn env_filter(default_directive: &str) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(default_directive))
}

/// Install a global fmt subscriber with [`DEFAULT_DIRECTIVE`].
pub fn init() -> Result<()> {
    init_with_default(DEFAULT_DIRECTIVE)
}

/// Install a global fmt subscriber with a custom fallback directive.
pub fn init_with_default(default_directive: &str) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(default_directive))
        .with_target(true)
        .try_init()
        .map_err(|err| Error::Logging(err.to_string()))
}

/// Install a global subscriber that writes one JSON object per event.
#[cfg(feature = "logging-json")]
pub fn init_json() -> Result<()> {
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(env_filter(DEFAULT_DIRECTIVE))
        .with_current_span(true)
        .try_init()
        .map_err(|err| Error::Logging(err.to_string()))
}
