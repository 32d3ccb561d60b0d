//! Win32 and NT entry points used by the Windows metadata backend.
//!
//! Every function takes a [`Path`] or a borrowed handle, converts it to the
//! form the API expects and maps failures to [`io::Error`]. Handles are
//! returned as [`OwnedHandle`] so they close on drop.

mod attributes;
mod ea;
mod security;

pub use attributes::{
    decrypt_file, encrypt_file, file_attributes, set_creation_time, set_file_attributes,
};
pub use ea::{open_for_ea_read, open_for_ea_write, query_ea, set_ea};
pub use security::{descriptor_to_sddl, security_descriptor, set_security_descriptor};

use std::io;
use std::os::windows::ffi::OsStrExt;
use std::os::windows::io::{FromRawHandle, OwnedHandle};
use std::path::{Component, Path};
use std::ptr;

use crate::path::extended_length_path;

use windows_sys::Win32::Foundation::{INVALID_HANDLE_VALUE, RtlNtStatusToDosError};
use windows_sys::Win32::Storage::FileSystem::{
    CreateFileW, FILE_FLAG_BACKUP_SEMANTICS, FILE_FLAG_OPEN_REPARSE_POINT, FILE_SHARE_DELETE,
    FILE_SHARE_READ, FILE_SHARE_WRITE, OPEN_EXISTING,
};

/// Converts `path` to a NUL-terminated UTF-16 string.
///
/// Absolute paths without `.` or `..` components are passed in their
/// extended-length form so they are not limited to `MAX_PATH`.
pub(crate) fn to_wide(path: &Path) -> io::Result<Vec<u16>> {
    let plain = path.components().all(|component| {
        matches!(
            component,
            Component::Prefix(_) | Component::RootDir | Component::Normal(_)
        )
    });
    let mut wide: Vec<u16> = match path.to_str() {
        Some(text) if plain && path.is_absolute() => {
            extended_length_path(text).encode_utf16().collect()
        }
        _ => path.as_os_str().encode_wide().collect(),
    };
    if wide.contains(&0) {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "path contains an interior NUL",
        ));
    }
    wide.push(0);
    Ok(wide)
}

/// Maps an `NTSTATUS` to the equivalent Win32 error code.
pub(crate) fn dos_error_for_status(status: i32) -> u32 {
    // SAFETY: pure lookup with no pointer arguments.
    unsafe { RtlNtStatusToDosError(status) }
}

/// Opens an existing entry with `access` rights.
///
/// Backup semantics are always requested because directories cannot be
/// opened without them. Reparse points are opened themselves, so a symlink
/// yields a handle to the link and never to its target.
pub(crate) fn open_existing(path: &Path, access: u32) -> io::Result<OwnedHandle> {
    let wide = to_wide(path)?;
    // SAFETY: `wide` is NUL-terminated and outlives the call; the security
    // attributes and template handle are optional and passed as null.
    let handle = unsafe {
        CreateFileW(
            wide.as_ptr(),
            access,
            FILE_SHARE_READ | FILE_SHARE_WRITE | FILE_SHARE_DELETE,
            ptr::null(),
            OPEN_EXISTING,
            FILE_FLAG_BACKUP_SEMANTICS | FILE_FLAG_OPEN_REPARSE_POINT,
            ptr::null_mut(),
        )
    };
    if handle == INVALID_HANDLE_VALUE {
        return Err(io::Error::last_os_error());
    }
    // SAFETY: `handle` is a valid handle we exclusively own.
    Ok(unsafe { OwnedHandle::from_raw_handle(handle) })
}

/// Turns a Win32 `BOOL` result into an [`io::Result`].
pub(crate) fn check_bool(result: i32) -> io::Result<()> {
    if result == 0 {
        Err(io::Error::last_os_error())
    } else {
        Ok(())
    }
}
