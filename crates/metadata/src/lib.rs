#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `metadata` captures the OS-specific metadata of a filesystem entry into a
//! portable [`Node`] and replays it onto another path later, possibly on a
//! different machine. Besides mode and timestamps a node carries two lists:
//!
//! - [`ExtendedAttribute`]s: POSIX xattrs on Linux, macOS and FreeBSD, NT
//!   extended attributes on Windows.
//! - [`GenericAttribute`]s: opaque values tagged with a
//!   [`GenericAttributeType`]. Windows stores file attributes, creation time
//!   and the security descriptor this way.
//!
//! # Design
//!
//! Platform behaviour sits behind [`AttributeBackend`]; [`PlatformBackend`]
//! names the one selected at compile time. Restoring generic attributes goes
//! through a [`GenericAttributeRegistry`] so a node captured on one platform
//! restores on another: tags the registry does not know are reported once
//! through [`UnknownTypeLog`] and skipped.
//!
//! The Windows logic that decides *what* to do (encryption toggling,
//! read-only handling, value codecs) is written against [`FileStateOps`] and
//! compiles everywhere. Only the system calls live in the `platform` crate.
//!
//! # Invariants
//!
//! - A restore runs every step (extended attributes, generic attributes,
//!   timestamps) even after one fails, and reports all failures in one
//!   [`RestoreError`].
//! - Symlinks are never followed: capture uses `lstat` and timestamps are set
//!   on the link itself.
//! - Pseudo paths (volume roots, alternate data streams) get no extended
//!   attributes on Windows.
//!
//! # Examples
//!
//! ```no_run
//! use metadata::{MetadataOptions, Node, RestoreContext};
//! use std::path::Path;
//!
//! # fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let ctx = RestoreContext::for_platform();
//! let node = Node::capture(Path::new("report.txt"), ctx.backend(), &MetadataOptions::default())?;
//! node.restore_metadata(Path::new("copy.txt"), &ctx)?;
//! # Ok(())
//! # }
//! ```

mod apply;
mod backend;
pub mod ea;
mod error;
mod generic;
mod node;
mod options;
mod outcome;
mod reconcile;
mod security;
mod stat;
mod unknown;

#[cfg(all(
    feature = "xattr",
    any(
        target_os = "linux",
        target_os = "android",
        target_os = "macos",
        target_os = "freebsd"
    )
))]
mod xattr;
mod xattr_stub;

pub use apply::RestoreContext;
#[cfg(all(
    feature = "xattr",
    any(
        target_os = "linux",
        target_os = "android",
        target_os = "macos",
        target_os = "freebsd"
    )
))]
pub use backend::PosixXattrBackend;
#[cfg(windows)]
pub use backend::{NativeFileOps, WindowsBackend};
pub use backend::{
    AttributeBackend, GenericCapture, NoopBackend, PlatformBackend, capture_windows_generic,
    platform_backend, windows_registry,
};
pub use ea::EaEntry;
pub use error::{EaCodecError, MetadataError, RestoreError};
pub use generic::{GenericAttributeHandler, GenericAttributeRegistry};
pub use node::{ExtendedAttribute, GenericAttribute, GenericAttributeType, Node, NodeType};
pub use options::MetadataOptions;
pub use outcome::{XattrOutcome, is_no_data, is_not_supported};
pub use reconcile::{
    EncryptionAction, FILE_ATTRIBUTE_ARCHIVE, FILE_ATTRIBUTE_DIRECTORY, FILE_ATTRIBUTE_ENCRYPTED,
    FILE_ATTRIBUTE_HIDDEN, FILE_ATTRIBUTE_NORMAL, FILE_ATTRIBUTE_READONLY, FILE_ATTRIBUTE_SYSTEM,
    FileStateOps, clear_readonly, decode_creation_time, decode_file_attributes,
    encode_creation_time, encode_file_attributes, is_access_denied, is_readonly,
    reconcile_encryption, restore_creation_time, restore_file_attributes,
};
#[cfg(windows)]
pub use security::security_descriptor_sddl;
pub use security::{
    capture_security_descriptor, decode_security_descriptor, encode_security_descriptor,
    restore_security_descriptor,
};
pub use stat::{FILETIME_UNIX_EPOCH_TICKS, StatT, Timespec, Win32AttributeData};
pub use unknown::UnknownTypeLog;
