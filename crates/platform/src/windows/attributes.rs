use std::io;
use std::os::windows::io::AsRawHandle;
use std::path::Path;
use std::ptr;

use windows_sys::Win32::Foundation::FILETIME;
use windows_sys::Win32::Storage::FileSystem::{
    DecryptFileW, EncryptFileW, FILE_WRITE_ATTRIBUTES, GetFileAttributesW,
    INVALID_FILE_ATTRIBUTES, SetFileAttributesW, SetFileTime,
};

use super::{check_bool, open_existing, to_wide};

/// Returns the `FILE_ATTRIBUTE_*` bits of `path`.
pub fn file_attributes(path: &Path) -> io::Result<u32> {
    let wide = to_wide(path)?;
    // SAFETY: `wide` is NUL-terminated.
    let attrs = unsafe { GetFileAttributesW(wide.as_ptr()) };
    if attrs == INVALID_FILE_ATTRIBUTES {
        return Err(io::Error::last_os_error());
    }
    Ok(attrs)
}

/// Replaces the settable attribute bits of `path`.
pub fn set_file_attributes(path: &Path, attributes: u32) -> io::Result<()> {
    let wide = to_wide(path)?;
    // SAFETY: `wide` is NUL-terminated.
    check_bool(unsafe { SetFileAttributesW(wide.as_ptr(), attributes) })
}

/// Encrypts `path` with EFS.
pub fn encrypt_file(path: &Path) -> io::Result<()> {
    let wide = to_wide(path)?;
    // SAFETY: `wide` is NUL-terminated.
    check_bool(unsafe { EncryptFileW(wide.as_ptr()) })
}

/// Decrypts an EFS-encrypted `path`.
pub fn decrypt_file(path: &Path) -> io::Result<()> {
    let wide = to_wide(path)?;
    // SAFETY: `wide` is NUL-terminated; the reserved argument must be zero.
    check_bool(unsafe { DecryptFileW(wide.as_ptr(), 0) })
}

/// Sets the creation time of `path` to `ticks` (100 ns units since 1601).
pub fn set_creation_time(path: &Path, ticks: u64) -> io::Result<()> {
    let handle = open_existing(path, FILE_WRITE_ATTRIBUTES)?;
    let created = FILETIME {
        dwLowDateTime: ticks as u32,
        dwHighDateTime: (ticks >> 32) as u32,
    };
    // SAFETY: the handle is open with FILE_WRITE_ATTRIBUTES; null access and
    // write times leave those fields untouched.
    check_bool(unsafe {
        SetFileTime(handle.as_raw_handle(), &created, ptr::null(), ptr::null())
    })
}
