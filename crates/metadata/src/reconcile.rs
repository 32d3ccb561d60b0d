//! Windows file attribute and creation time restore.
//!
//! The logic is written against [`FileStateOps`] so it runs (and is tested)
//! on every host; the Windows backend supplies an implementation that calls
//! the Win32 API.

use crate::error::{MetadataError, RestoreError};
use logging::{trace_crypt, trace_time};
use platform::path::{is_alternate_stream, trim_ads};
use std::error::Error;
use std::fmt;
use std::io;
use std::path::Path;

/// `FILE_ATTRIBUTE_READONLY`.
pub const FILE_ATTRIBUTE_READONLY: u32 = 0x0000_0001;
/// `FILE_ATTRIBUTE_HIDDEN`.
pub const FILE_ATTRIBUTE_HIDDEN: u32 = 0x0000_0002;
/// `FILE_ATTRIBUTE_SYSTEM`.
pub const FILE_ATTRIBUTE_SYSTEM: u32 = 0x0000_0004;
/// `FILE_ATTRIBUTE_DIRECTORY`.
pub const FILE_ATTRIBUTE_DIRECTORY: u32 = 0x0000_0010;
/// `FILE_ATTRIBUTE_ARCHIVE`.
pub const FILE_ATTRIBUTE_ARCHIVE: u32 = 0x0000_0020;
/// `FILE_ATTRIBUTE_NORMAL`.
pub const FILE_ATTRIBUTE_NORMAL: u32 = 0x0000_0080;
/// `FILE_ATTRIBUTE_ENCRYPTED`.
pub const FILE_ATTRIBUTE_ENCRYPTED: u32 = 0x0000_4000;

/// File state operations the Windows generic attributes are restored through.
pub trait FileStateOps: Send + Sync {
    /// Reads the `FILE_ATTRIBUTE_*` bits.
    fn attributes(&self, path: &Path) -> io::Result<u32>;
    /// Replaces the settable attribute bits.
    fn set_attributes(&self, path: &Path, attributes: u32) -> io::Result<()>;
    /// Encrypts the entry with EFS.
    fn encrypt(&self, path: &Path) -> io::Result<()>;
    /// Decrypts the entry.
    fn decrypt(&self, path: &Path) -> io::Result<()>;
    /// Sets the creation time in `FILETIME` ticks.
    fn set_creation_time(&self, path: &Path, ticks: u64) -> io::Result<()>;
    /// Reads the self-relative security descriptor.
    fn security_descriptor(&self, path: &Path) -> io::Result<Vec<u8>>;
    /// Applies a self-relative security descriptor.
    fn set_security_descriptor(&self, path: &Path, raw: &[u8]) -> io::Result<()>;
}

/// Reports whether `attributes` has the read-only bit.
#[must_use]
pub const fn is_readonly(attributes: u32) -> bool {
    attributes & FILE_ATTRIBUTE_READONLY != 0
}

/// Clears the read-only bit of `path` if it is set.
///
/// An alternate data stream has no attributes of its own; the bit is cleared
/// on the main file instead.
pub fn clear_readonly<O: FileStateOps + ?Sized>(ops: &O, path: &Path) -> io::Result<()> {
    let text = path.to_string_lossy();
    let target = if is_alternate_stream(&text) {
        Path::new(trim_ads(&text))
    } else {
        path
    };
    let attributes = ops.attributes(target)?;
    if is_readonly(attributes) {
        ops.set_attributes(target, attributes & !FILE_ATTRIBUTE_READONLY)?;
    }
    Ok(())
}

/// Reports whether `err`, or any error it wraps, is an access-denied failure.
#[must_use]
pub fn is_access_denied(err: &(dyn Error + 'static)) -> bool {
    let mut current = Some(err);
    while let Some(err) = current {
        if let Some(io_err) = err.downcast_ref::<io::Error>() {
            if io_err.kind() == io::ErrorKind::PermissionDenied {
                return true;
            }
            if let Some(inner) = io_err.get_ref() {
                if is_access_denied(inner) {
                    return true;
                }
            }
        }
        current = err.source();
    }
    false
}

/// What the encryption reconciler has to do.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EncryptionAction {
    /// Desired and current state agree.
    None,
    /// The entry must be encrypted.
    Encrypt,
    /// The entry must be decrypted.
    Decrypt,
}

impl EncryptionAction {
    /// Compares the encrypted bit of the desired and current attributes.
    #[must_use]
    pub const fn between(desired: u32, current: u32) -> Self {
        let want = desired & FILE_ATTRIBUTE_ENCRYPTED != 0;
        let have = current & FILE_ATTRIBUTE_ENCRYPTED != 0;
        match (want, have) {
            (true, false) => Self::Encrypt,
            (false, true) => Self::Decrypt,
            _ => Self::None,
        }
    }

    const fn context(self) -> &'static str {
        match self {
            Self::None => "reconcile encryption",
            Self::Encrypt => "encrypt file",
            Self::Decrypt => "decrypt file",
        }
    }

    fn run<O: FileStateOps + ?Sized>(self, ops: &O, path: &Path) -> io::Result<()> {
        match self {
            Self::None => Ok(()),
            Self::Encrypt => ops.encrypt(path),
            Self::Decrypt => ops.decrypt(path),
        }
    }
}

impl fmt::Display for EncryptionAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.context())
    }
}

/// Brings the encrypted state of `path` in line with `desired`.
///
/// A read-only entry has that bit cleared first. If the OS denies the
/// change, the system bit is cleared and the change retried exactly once.
/// The caller is expected to re-apply the full desired attribute set
/// afterwards, which restores any bit cleared here.
pub fn reconcile_encryption<O: FileStateOps + ?Sized>(
    ops: &O,
    path: &Path,
    desired: u32,
    current: u32,
) -> Result<EncryptionAction, MetadataError> {
    let action = EncryptionAction::between(desired, current);
    if action == EncryptionAction::None {
        return Ok(action);
    }

    let mut current = current;
    if is_readonly(current) {
        clear_readonly(ops, path)
            .map_err(|err| MetadataError::new("clear read-only attribute", path, err))?;
        current &= !FILE_ATTRIBUTE_READONLY;
    }

    match action.run(ops, path) {
        Ok(()) => Ok(action),
        Err(err) if is_access_denied(&err) => {
            trace_crypt!(
                debug,
                "{} denied on {}; clearing system attribute and retrying",
                action,
                path.display()
            );
            ops.set_attributes(path, current & !FILE_ATTRIBUTE_SYSTEM)
                .map_err(|err| MetadataError::new("clear system attribute", path, err))?;
            action
                .run(ops, path)
                .map_err(|err| MetadataError::new(action.context(), path, err))?;
            Ok(action)
        }
        Err(err) => Err(MetadataError::new(action.context(), path, err)),
    }
}

fn invalid_length(what: &str, expected: usize, actual: usize) -> io::Error {
    io::Error::new(
        io::ErrorKind::InvalidData,
        format!("{what} value must be {expected} bytes, got {actual}"),
    )
}

/// Encodes attribute bits as 4 little-endian bytes.
#[must_use]
pub const fn encode_file_attributes(attributes: u32) -> [u8; 4] {
    attributes.to_le_bytes()
}

/// Decodes attribute bits.
pub fn decode_file_attributes(value: &[u8]) -> io::Result<u32> {
    let bytes: [u8; 4] = value
        .try_into()
        .map_err(|_| invalid_length("file attributes", 4, value.len()))?;
    Ok(u32::from_le_bytes(bytes))
}

/// Encodes `FILETIME` ticks as the low dword followed by the high dword,
/// each little-endian.
#[must_use]
pub fn encode_creation_time(ticks: u64) -> [u8; 8] {
    let low = (ticks as u32).to_le_bytes();
    let high = ((ticks >> 32) as u32).to_le_bytes();
    [
        low[0], low[1], low[2], low[3], high[0], high[1], high[2], high[3],
    ]
}

/// Decodes a creation time produced by [`encode_creation_time`].
pub fn decode_creation_time(value: &[u8]) -> io::Result<u64> {
    if value.len() != 8 {
        return Err(invalid_length("creation time", 8, value.len()));
    }
    let low = u32::from_le_bytes([value[0], value[1], value[2], value[3]]);
    let high = u32::from_le_bytes([value[4], value[5], value[6], value[7]]);
    Ok((u64::from(high) << 32) | u64::from(low))
}

/// Restores a `windows.file_attributes` value.
///
/// Encryption is reconciled first, then the full desired bit set is written
/// regardless of whether reconciliation succeeded. Both failures are
/// reported.
pub fn restore_file_attributes<O: FileStateOps + ?Sized>(
    ops: &O,
    path: &Path,
    value: &[u8],
) -> Result<(), RestoreError> {
    let desired = decode_file_attributes(value)
        .map_err(|err| MetadataError::new("decode file attributes", path, err))?;
    let current = ops
        .attributes(path)
        .map_err(|err| MetadataError::new("read file attributes", path, err))?;

    let mut failures = Vec::new();
    if let Err(err) = reconcile_encryption(ops, path, desired, current) {
        failures.push(err);
    }
    if let Err(err) = ops.set_attributes(path, desired) {
        failures.push(MetadataError::new("set file attributes", path, err));
    }
    RestoreError::check(path, failures)
}

/// Restores a `windows.creation_time` value.
pub fn restore_creation_time<O: FileStateOps + ?Sized>(
    ops: &O,
    path: &Path,
    value: &[u8],
) -> Result<(), RestoreError> {
    let ticks = decode_creation_time(value)
        .map_err(|err| MetadataError::new("decode creation time", path, err))?;
    trace_time!(trace, "setting creation time of {} to {}", path.display(), ticks);
    ops.set_creation_time(path, ticks)
        .map_err(|err| MetadataError::new("set creation time", path, err).into())
}
