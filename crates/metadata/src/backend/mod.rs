//! Per-platform attribute backends.
//!
//! Exactly one backend is selected at compile time and exported as
//! [`PlatformBackend`]:
//!
//! - Linux, Android, macOS and FreeBSD (with the `xattr` feature): POSIX
//!   extended attributes, no generic attributes.
//! - Windows: NT extended attributes plus file attributes, creation time and
//!   security descriptor as generic attributes.
//! - Everything else: no-op.
//!
//! [`NoopBackend`] is compiled everywhere so callers and tests can opt out of
//! OS metadata explicitly.

mod noop;
#[cfg(all(
    feature = "xattr",
    any(
        target_os = "linux",
        target_os = "android",
        target_os = "macos",
        target_os = "freebsd"
    )
))]
mod posix;
#[cfg(windows)]
mod windows;
mod windows_attrs;

pub use noop::NoopBackend;
#[cfg(all(
    feature = "xattr",
    any(
        target_os = "linux",
        target_os = "android",
        target_os = "macos",
        target_os = "freebsd"
    )
))]
pub use posix::PosixXattrBackend;
#[cfg(windows)]
pub use windows::{NativeFileOps, WindowsBackend};
pub use windows_attrs::{capture_windows_generic, windows_registry};

#[cfg(all(
    feature = "xattr",
    any(
        target_os = "linux",
        target_os = "android",
        target_os = "macos",
        target_os = "freebsd"
    )
))]
pub use posix::PosixXattrBackend as PlatformBackend;
#[cfg(windows)]
pub use windows::WindowsBackend as PlatformBackend;
#[cfg(not(any(
    windows,
    all(
        feature = "xattr",
        any(
            target_os = "linux",
            target_os = "android",
            target_os = "macos",
            target_os = "freebsd"
        )
    )
)))]
pub use noop::NoopBackend as PlatformBackend;

use crate::error::{MetadataError, RestoreError};
use crate::generic::GenericAttributeRegistry;
use crate::node::{ExtendedAttribute, GenericAttribute, NodeType};
use crate::stat::Timespec;
use crate::unknown::UnknownTypeLog;
use std::fmt;
use std::fs;
use std::path::Path;
use std::sync::Arc;

/// Generic attributes captured for one entry.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GenericCapture {
    /// Whether extended attributes should be captured for this entry.
    /// Pseudo-paths (alternate data streams, volume roots) turn it off.
    pub allow_extended: bool,
    /// The captured attributes.
    pub attributes: Vec<GenericAttribute>,
}

impl GenericCapture {
    /// Nothing captured, extended attributes allowed.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            allow_extended: true,
            attributes: Vec::new(),
        }
    }

    /// Nothing captured and extended attributes suppressed.
    #[must_use]
    pub const fn suppressed() -> Self {
        Self {
            allow_extended: false,
            attributes: Vec::new(),
        }
    }
}

/// OS-specific capture and restore of the metadata a [`Node`](crate::Node)
/// carries beyond the portable fields.
pub trait AttributeBackend: Send + Sync + fmt::Debug {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// Reads the extended attributes of `path` (never following symlinks).
    fn fill_extended_attributes(&self, path: &Path)
    -> Result<Vec<ExtendedAttribute>, MetadataError>;

    /// Writes `attrs` to `path`, stopping at the first failure.
    fn restore_extended_attributes(
        &self,
        path: &Path,
        attrs: &[ExtendedAttribute],
    ) -> Result<(), MetadataError>;

    /// Captures the generic attributes of `path` and decides whether its
    /// extended attributes should be captured.
    fn fill_generic_attributes(
        &self,
        path: &Path,
        metadata: &fs::Metadata,
        node_type: NodeType,
    ) -> Result<GenericCapture, MetadataError>;

    /// Handlers for the generic attribute types this backend restores.
    fn registry(&self) -> &GenericAttributeRegistry;

    /// Restores `attrs`, logging unknown types once through `unknown`.
    fn restore_generic_attributes(
        &self,
        path: &Path,
        attrs: &[GenericAttribute],
        unknown: &UnknownTypeLog,
    ) -> Result<(), RestoreError> {
        self.registry().restore_all(path, attrs, unknown)
    }

    /// Sets the times of the symlink at `path` itself.
    fn restore_symlink_timestamps(
        &self,
        path: &Path,
        atime: Timespec,
        mtime: Timespec,
    ) -> Result<(), MetadataError>;
}

/// Returns the backend selected for this platform.
#[must_use]
pub fn platform_backend() -> Arc<dyn AttributeBackend> {
    Arc::new(PlatformBackend::new())
}
