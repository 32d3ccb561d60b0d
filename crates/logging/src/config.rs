//! crates/logging/src/config.rs
//! Verbosity configuration combining a global level with per-subsystem overrides.

use super::levels::{Subsystem, level_for_verbosity};
use std::collections::BTreeMap;
use tracing::level_filters::LevelFilter;

/// Environment variable that overrides the verbosity-derived filter.
pub const LOG_ENV_VAR: &str = "ATTRKEEP_LOG";

/// Combined verbosity configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VerbosityConfig {
    base: LevelFilter,
    overrides: BTreeMap<&'static str, LevelFilter>,
}

impl Default for VerbosityConfig {
    fn default() -> Self {
        Self::from_verbose_level(0)
    }
}

impl VerbosityConfig {
    /// Create a new configuration from a `-v` count.
    #[must_use]
    pub fn from_verbose_level(level: u8) -> Self {
        Self {
            base: level_for_verbosity(level),
            overrides: BTreeMap::new(),
        }
    }

    /// Returns the global level.
    #[must_use]
    pub const fn base(&self) -> LevelFilter {
        self.base
    }

    /// Overrides the level for a single subsystem.
    #[must_use]
    pub fn with_subsystem(mut self, subsystem: Subsystem, level: LevelFilter) -> Self {
        self.overrides.insert(subsystem.target(), level);
        self
    }

    /// Returns the effective level for `subsystem`.
    #[must_use]
    pub fn level_for(&self, subsystem: Subsystem) -> LevelFilter {
        self.overrides
            .get(subsystem.target())
            .copied()
            .unwrap_or(self.base)
    }

    /// Renders the configuration as `EnvFilter` directives.
    ///
    /// The global level comes first, followed by `target=level` pairs for each
    /// override, e.g. `warn,attrkeep::xattr=debug`.
    #[must_use]
    pub fn directives(&self) -> String {
        let mut out = level_name(self.base).to_owned();
        for (target, level) in &self.overrides {
            out.push(',');
            out.push_str(target);
            out.push('=');
            out.push_str(level_name(*level));
        }
        out
    }
}

fn level_name(level: LevelFilter) -> &'static str {
    if level == LevelFilter::OFF {
        "off"
    } else if level == LevelFilter::ERROR {
        "error"
    } else if level == LevelFilter::WARN {
        "warn"
    } else if level == LevelFilter::INFO {
        "info"
    } else if level == LevelFilter::DEBUG {
        "debug"
    } else {
        "trace"
    }
}
