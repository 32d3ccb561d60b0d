use std::io;
use std::mem;
use std::os::windows::io::{AsRawHandle, BorrowedHandle, OwnedHandle};
use std::path::Path;
use std::ptr;

use windows_sys::Wdk::Storage::FileSystem::{NtQueryEaFile, NtSetEaFile};
use windows_sys::Win32::Storage::FileSystem::{FILE_READ_EA, FILE_WRITE_EA};
use windows_sys::Win32::System::IO::IO_STATUS_BLOCK;

use crate::ntstatus::{NtStatusError, QueryStatus, classify};

const STATUS_INVALID_PARAMETER: i32 = 0xC000_000D_u32 as i32;

/// Opens `path` for reading extended attributes.
pub fn open_for_ea_read(path: &Path) -> io::Result<OwnedHandle> {
    super::open_existing(path, FILE_READ_EA)
}

/// Opens `path` for writing extended attributes.
pub fn open_for_ea_write(path: &Path) -> io::Result<OwnedHandle> {
    super::open_existing(path, FILE_WRITE_EA)
}

/// Reads every extended attribute into `buf`, restarting the scan each time.
///
/// The caller interprets the status; on [`QueryStatus::Complete`] the buffer
/// holds a chain of `FILE_FULL_EA_INFORMATION` records.
pub fn query_ea(handle: BorrowedHandle<'_>, buf: &mut [u8]) -> QueryStatus {
    let Ok(len) = u32::try_from(buf.len()) else {
        return QueryStatus::Failed(NtStatusError(STATUS_INVALID_PARAMETER));
    };
    // SAFETY: IO_STATUS_BLOCK is plain data; all-zero is a valid value.
    let mut iosb: IO_STATUS_BLOCK = unsafe { mem::zeroed() };
    // SAFETY: `buf` is valid for `len` writable bytes; the optional EA list
    // and index arguments are null.
    let status = unsafe {
        NtQueryEaFile(
            handle.as_raw_handle(),
            &mut iosb,
            buf.as_mut_ptr().cast(),
            len,
            false,
            ptr::null(),
            0,
            ptr::null(),
            true,
        )
    };
    classify(status)
}

/// Writes an encoded EA buffer in a single call.
pub fn set_ea(handle: BorrowedHandle<'_>, buf: &[u8]) -> io::Result<()> {
    let len = u32::try_from(buf.len())
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "EA buffer too large"))?;
    // SAFETY: as above.
    let mut iosb: IO_STATUS_BLOCK = unsafe { mem::zeroed() };
    // SAFETY: `buf` is valid for `len` readable bytes for the duration of the call.
    let status =
        unsafe { NtSetEaFile(handle.as_raw_handle(), &mut iosb, buf.as_ptr().cast(), len) };
    match classify(status) {
        QueryStatus::Complete => Ok(()),
        QueryStatus::NotSupported => Err(io::Error::new(
            io::ErrorKind::Unsupported,
            "extended attributes are not supported by this volume",
        )),
        QueryStatus::Failed(err) => Err(err.into()),
        QueryStatus::BufferTooSmall | QueryStatus::NoData => Err(NtStatusError(status).into()),
    }
}
