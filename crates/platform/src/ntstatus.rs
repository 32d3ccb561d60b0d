//! NT status classification for the extended attribute query and set calls.
//!
//! The kernel reports EA conditions through `NTSTATUS` values rather than
//! Win32 error codes. The probe loop only needs to know which of a handful
//! of conditions occurred, so the mapping is kept here as integer logic.

use std::fmt;
use std::io;

/// The operation completed.
pub const STATUS_SUCCESS: i32 = 0;
/// Some entries were returned but more did not fit (warning severity).
pub const STATUS_BUFFER_OVERFLOW: i32 = 0x8000_0005_u32 as i32;
/// Not even one entry fitted in the buffer.
pub const STATUS_BUFFER_TOO_SMALL: i32 = 0xC000_0023_u32 as i32;
/// The file has no extended attributes.
pub const STATUS_NO_EAS_ON_FILE: i32 = 0xC000_0052_u32 as i32;
/// The volume does not support extended attributes.
pub const STATUS_EAS_NOT_SUPPORTED: i32 = 0xC000_004F_u32 as i32;

/// Result of an EA query or set call, reduced to what callers act on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QueryStatus {
    /// The buffer holds a complete answer.
    Complete,
    /// The buffer was too small; retry with a larger one.
    BufferTooSmall,
    /// The entry carries no extended attributes.
    NoData,
    /// The filesystem does not support extended attributes.
    NotSupported,
    /// Any other failure.
    Failed(NtStatusError),
}

/// An `NTSTATUS` failure code.
#[derive(Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("NTSTATUS {0:#010x}")]
pub struct NtStatusError(pub i32);

impl fmt::Debug for NtStatusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NtStatusError({:#010x})", self.0)
    }
}

impl NtStatusError {
    /// Returns the raw status value.
    #[must_use]
    pub const fn status(self) -> i32 {
        self.0
    }
}

impl From<NtStatusError> for io::Error {
    #[cfg(windows)]
    fn from(err: NtStatusError) -> Self {
        let code = crate::windows::dos_error_for_status(err.0);
        io::Error::from_raw_os_error(code as i32)
    }

    #[cfg(not(windows))]
    fn from(err: NtStatusError) -> Self {
        io::Error::other(err)
    }
}

/// Classifies a raw `NTSTATUS`.
///
/// Non-negative values (success and informational) are complete. The two
/// buffer statuses ask for a retry. The "no EAs" and "not supported"
/// statuses are reported separately so callers can treat them as empty.
#[must_use]
pub const fn classify(status: i32) -> QueryStatus {
    match status {
        STATUS_BUFFER_OVERFLOW | STATUS_BUFFER_TOO_SMALL => QueryStatus::BufferTooSmall,
        STATUS_NO_EAS_ON_FILE => QueryStatus::NoData,
        STATUS_EAS_NOT_SUPPORTED => QueryStatus::NotSupported,
        s if s >= 0 => QueryStatus::Complete,
        s => QueryStatus::Failed(NtStatusError(s)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_and_informational_are_complete() {
        assert_eq!(classify(STATUS_SUCCESS), QueryStatus::Complete);
        assert_eq!(classify(0x0000_0103), QueryStatus::Complete);
    }

    #[test]
    fn buffer_statuses_request_retry() {
        assert_eq!(classify(STATUS_BUFFER_OVERFLOW), QueryStatus::BufferTooSmall);
        assert_eq!(classify(STATUS_BUFFER_TOO_SMALL), QueryStatus::BufferTooSmall);
    }

    #[test]
    fn no_eas_sentinel_matches_signed_value() {
        assert_eq!(STATUS_NO_EAS_ON_FILE, -1_073_741_742);
        assert_eq!(classify(-1_073_741_742), QueryStatus::NoData);
    }

    #[test]
    fn unsupported_volume_is_distinguished() {
        assert_eq!(classify(STATUS_EAS_NOT_SUPPORTED), QueryStatus::NotSupported);
    }

    #[test]
    fn other_errors_carry_status() {
        let access_denied = 0xC000_0022_u32 as i32;
        assert_eq!(
            classify(access_denied),
            QueryStatus::Failed(NtStatusError(access_denied))
        );
        assert_eq!(NtStatusError(access_denied).to_string(), "NTSTATUS 0xc0000022");
    }
}
