//! Integration tests for verbosity level mapping.
//!
//! These tests verify that `-v` counts and per-subsystem overrides map to the
//! filter directives the binary installs.

use logging::{Subsystem, VerbosityConfig, level_for_verbosity};
use tracing::level_filters::LevelFilter;

/// Verifies the quiet default still shows warnings (warn-once diagnostics).
#[test]
fn quiet_default_keeps_warnings() {
    let config = VerbosityConfig::from_verbose_level(0);
    assert_eq!(config.base(), LevelFilter::WARN);
    for subsystem in Subsystem::ALL {
        assert_eq!(config.level_for(subsystem), LevelFilter::WARN);
    }
}

/// Verifies each additional `-v` raises the global level by one step.
#[test]
fn each_verbose_flag_raises_level() {
    let levels: Vec<_> = (0..4).map(level_for_verbosity).collect();
    assert_eq!(
        levels,
        vec![
            LevelFilter::WARN,
            LevelFilter::INFO,
            LevelFilter::DEBUG,
            LevelFilter::TRACE
        ]
    );
}

/// Verifies an override only touches its own subsystem.
#[test]
fn override_is_scoped_to_subsystem() {
    let config =
        VerbosityConfig::from_verbose_level(1).with_subsystem(Subsystem::Ea, LevelFilter::TRACE);
    assert_eq!(config.level_for(Subsystem::Ea), LevelFilter::TRACE);
    assert_eq!(config.level_for(Subsystem::Xattr), LevelFilter::INFO);
    assert!(config.directives().contains("attrkeep::ea=trace"));
}

/// Verifies the later override for the same subsystem wins.
#[test]
fn repeated_override_replaces_previous() {
    let config = VerbosityConfig::from_verbose_level(0)
        .with_subsystem(Subsystem::Node, LevelFilter::DEBUG)
        .with_subsystem(Subsystem::Node, LevelFilter::ERROR);
    assert_eq!(config.directives(), "warn,attrkeep::node=error");
}
