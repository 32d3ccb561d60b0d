//! crates/logging/src/levels.rs
//! Subsystem enumeration and the tracing targets they log under.

use tracing::level_filters::LevelFilter;

/// Diagnostic categories emitted by the metadata subsystem.
///
/// Each category maps onto a fixed `tracing` target so filters written against
/// `ATTRKEEP_LOG` keep working across releases.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Subsystem {
    /// POSIX extended attribute capture and restore.
    Xattr,
    /// Windows extended attribute buffers and kernel queries.
    Ea,
    /// Generic attribute dispatch and unknown-type tolerance.
    Generic,
    /// Timestamp conversion and restore.
    Time,
    /// Security descriptor capture and restore.
    Acl,
    /// Encryption flag reconciliation.
    Crypt,
    /// Whole-node capture and restore orchestration.
    Node,
}

impl Subsystem {
    /// Every subsystem, in a stable order.
    pub const ALL: [Self; 7] = [
        Self::Xattr,
        Self::Ea,
        Self::Generic,
        Self::Time,
        Self::Acl,
        Self::Crypt,
        Self::Node,
    ];

    /// Returns the `tracing` target used by this subsystem.
    #[must_use]
    pub const fn target(self) -> &'static str {
        match self {
            Self::Xattr => "attrkeep::xattr",
            Self::Ea => "attrkeep::ea",
            Self::Generic => "attrkeep::generic",
            Self::Time => "attrkeep::time",
            Self::Acl => "attrkeep::acl",
            Self::Crypt => "attrkeep::crypt",
            Self::Node => "attrkeep::node",
        }
    }

    /// Parses a short subsystem name such as `xattr` or `crypt`.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|subsystem| subsystem.short_name().eq_ignore_ascii_case(name))
    }

    /// Returns the short name, i.e. the target without the crate prefix.
    #[must_use]
    pub fn short_name(self) -> &'static str {
        self.target()
            .rsplit_once("::")
            .map_or(self.target(), |(_, short)| short)
    }
}

/// Maps a `-v` count onto a level filter.
///
/// Warnings are always visible; each `-v` unlocks one more level.
#[must_use]
pub const fn level_for_verbosity(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}
