//! crates/logging/src/tracing_bridge.rs
//! Subscriber installation driven by [`VerbosityConfig`].
//!
//! The binary calls [`init_tracing`] once at startup. Library crates never
//! install a subscriber; they only emit events through the `trace_*!` macros.

use super::config::{LOG_ENV_VAR, VerbosityConfig};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::util::TryInitError;

/// Builds the filter for `config`.
///
/// When [`LOG_ENV_VAR`] is set and parses, it replaces the verbosity-derived
/// directives entirely; an unparsable value falls back to the config.
#[must_use]
pub fn build_filter(config: &VerbosityConfig) -> EnvFilter {
    match std::env::var(LOG_ENV_VAR) {
        Ok(value) if !value.trim().is_empty() => EnvFilter::try_new(&value)
            .unwrap_or_else(|_| EnvFilter::new(config.directives())),
        _ => EnvFilter::new(config.directives()),
    }
}

/// Initialize tracing with the given verbosity configuration.
///
/// Events are written to stderr with their target so subsystem output can be
/// told apart. Returns an error if a global subscriber is already installed.
///
/// # Example
///
/// ```rust,ignore
/// use logging::{VerbosityConfig, init_tracing};
///
/// init_tracing(&VerbosityConfig::from_verbose_level(2))?;
/// tracing::debug!(target: "attrkeep::xattr", "listing attributes");
/// ```
pub fn init_tracing(config: &VerbosityConfig) -> Result<(), TryInitError> {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let fmt = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true);

    tracing_subscriber::registry()
        .with(build_filter(config))
        .with(fmt)
        .try_init()
}
