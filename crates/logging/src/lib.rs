#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `logging` centralises how the attrkeep workspace talks about itself. The
//! metadata core logs through `tracing` under one target per [`Subsystem`],
//! and the binary turns a `-v` count into a subscriber filter.
//!
//! # Design
//!
//! - [`Subsystem`] fixes the target names (`attrkeep::xattr`, `attrkeep::ea`,
//!   ...). The `trace_*!` macros wrap `tracing` with those targets.
//! - [`VerbosityConfig`] maps a verbosity count and optional per-subsystem
//!   overrides onto `EnvFilter` directives.
//! - With the `tracing` feature, `init_tracing` installs a stderr `fmt`
//!   subscriber. The `ATTRKEEP_LOG` environment variable overrides the
//!   computed directives.
//!
//! # Examples
//!
//! ```
//! use logging::{Subsystem, VerbosityConfig};
//! use tracing::level_filters::LevelFilter;
//!
//! let config = VerbosityConfig::from_verbose_level(1)
//!     .with_subsystem(Subsystem::Crypt, LevelFilter::DEBUG);
//! assert_eq!(config.directives(), "info,attrkeep::crypt=debug");
//! ```

mod config;
mod levels;
#[cfg(feature = "tracing")]
mod tracing_bridge;
mod tracing_macros;

pub use config::{LOG_ENV_VAR, VerbosityConfig};
pub use levels::{Subsystem, level_for_verbosity};
#[cfg(feature = "tracing")]
pub use tracing_bridge::{build_filter, init_tracing};
