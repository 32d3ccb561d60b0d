use std::io;

/// Classified result of an extended attribute system call.
///
/// Capture and restore treat "not supported" and "no such attribute" as
/// quiet conditions rather than failures, so those are split out of the
/// generic error case.
#[derive(Debug)]
pub enum XattrOutcome<T> {
    /// The call succeeded.
    Ok(T),
    /// The filesystem or platform does not support extended attributes.
    NotSupported,
    /// The requested attribute does not exist (or vanished meanwhile).
    NoData,
    /// Any other failure.
    Error(io::Error),
}

#[cfg(unix)]
const NOT_SUPPORTED_ERRNOS: &[i32] = &[libc::ENOTSUP, libc::EOPNOTSUPP];
#[cfg(not(unix))]
const NOT_SUPPORTED_ERRNOS: &[i32] = &[];

#[cfg(any(target_os = "linux", target_os = "android"))]
const NO_DATA_ERRNOS: &[i32] = &[libc::ENODATA];
#[cfg(any(
    target_os = "macos",
    target_os = "ios",
    target_os = "freebsd",
    target_os = "netbsd",
    target_os = "openbsd",
    target_os = "dragonfly"
))]
const NO_DATA_ERRNOS: &[i32] = &[libc::ENOATTR];
#[cfg(not(any(
    target_os = "linux",
    target_os = "android",
    target_os = "macos",
    target_os = "ios",
    target_os = "freebsd",
    target_os = "netbsd",
    target_os = "openbsd",
    target_os = "dragonfly"
)))]
const NO_DATA_ERRNOS: &[i32] = &[];

/// Reports whether `err` means extended attributes are unavailable.
#[must_use]
pub fn is_not_supported(err: &io::Error) -> bool {
    err.kind() == io::ErrorKind::Unsupported
        || err
            .raw_os_error()
            .is_some_and(|code| NOT_SUPPORTED_ERRNOS.contains(&code))
}

/// Reports whether `err` means the named attribute does not exist.
#[must_use]
pub fn is_no_data(err: &io::Error) -> bool {
    err.raw_os_error()
        .is_some_and(|code| NO_DATA_ERRNOS.contains(&code))
}

impl<T> XattrOutcome<T> {
    /// Classifies an [`io::Error`].
    #[must_use]
    pub fn from_error(err: io::Error) -> Self {
        if is_not_supported(&err) {
            Self::NotSupported
        } else if is_no_data(&err) {
            Self::NoData
        } else {
            Self::Error(err)
        }
    }

    /// Reports whether this is [`XattrOutcome::Ok`].
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        matches!(self, Self::Ok(_))
    }
}

impl<T> From<io::Result<T>> for XattrOutcome<T> {
    fn from(result: io::Result<T>) -> Self {
        match result {
            Ok(value) => Self::Ok(value),
            Err(err) => Self::from_error(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_kind_is_not_supported() {
        let outcome = XattrOutcome::<()>::from_error(io::Error::from(io::ErrorKind::Unsupported));
        assert!(matches!(outcome, XattrOutcome::NotSupported));
    }

    #[cfg(unix)]
    #[test]
    fn errno_classification() {
        let outcome = XattrOutcome::<()>::from_error(io::Error::from_raw_os_error(libc::ENOTSUP));
        assert!(matches!(outcome, XattrOutcome::NotSupported));

        let outcome = XattrOutcome::<()>::from_error(io::Error::from_raw_os_error(libc::EACCES));
        assert!(matches!(outcome, XattrOutcome::Error(_)));
    }

    #[cfg(any(target_os = "linux", target_os = "android"))]
    #[test]
    fn enodata_is_no_data() {
        let outcome = XattrOutcome::<()>::from_error(io::Error::from_raw_os_error(libc::ENODATA));
        assert!(matches!(outcome, XattrOutcome::NoData));
    }

    #[test]
    fn ok_results_pass_through() {
        let outcome: XattrOutcome<u8> = Ok(7).into();
        assert!(outcome.is_ok());
    }
}
