use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

/// Error produced when capturing or restoring a single piece of metadata fails.
#[derive(Debug)]
pub struct MetadataError {
    context: &'static str,
    path: PathBuf,
    source: io::Error,
}

impl MetadataError {
    /// Creates a new [`MetadataError`] from the supplied context, path, and source error.
    pub fn new(context: &'static str, path: &Path, source: io::Error) -> Self {
        Self {
            context,
            path: path.to_path_buf(),
            source,
        }
    }

    /// Returns the operation being performed when the error occurred.
    #[must_use]
    pub const fn context(&self) -> &'static str {
        self.context
    }

    /// Returns the path involved in the failing operation.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the underlying [`io::Error`] that triggered this failure.
    #[must_use]
    pub fn source_error(&self) -> &io::Error {
        &self.source
    }

    /// Returns the [`io::ErrorKind`] of the underlying error.
    #[must_use]
    pub fn kind(&self) -> io::ErrorKind {
        self.source.kind()
    }

    /// Consumes the error and returns its constituent parts.
    #[must_use]
    pub fn into_parts(self) -> (&'static str, PathBuf, io::Error) {
        (self.context, self.path, self.source)
    }
}

impl fmt::Display for MetadataError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "failed to {} '{}': {}",
            self.context,
            self.path.display(),
            self.source
        )
    }
}

impl std::error::Error for MetadataError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

/// Errors raised by the Windows EA buffer codec.
///
/// Encoding validates every entry before writing anything, so a failed encode
/// never yields a partial buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EaCodecError {
    /// A name exceeded the 255-byte limit of the one-byte length field.
    #[error("extended attribute name is {0} bytes, the limit is 255")]
    NameTooLarge(usize),
    /// A value exceeded the 65535-byte limit of the two-byte length field.
    #[error("extended attribute value is {0} bytes, the limit is 65535")]
    ValueTooLarge(usize),
    /// A record header, length or next-offset pointed outside the buffer.
    #[error("invalid extended attribute buffer")]
    InvalidBuffer,
}

impl From<EaCodecError> for io::Error {
    fn from(err: EaCodecError) -> Self {
        Self::new(io::ErrorKind::InvalidData, err)
    }
}

/// Aggregate of every failure seen while restoring one entry's metadata.
///
/// Restore keeps going after an individual attribute fails so the remaining
/// attributes still land; the collected failures are reported together.
#[derive(Debug, thiserror::Error)]
#[error("failed to restore metadata of '{}': {}", .path.display(), summarize(.failures))]
pub struct RestoreError {
    path: PathBuf,
    failures: Vec<MetadataError>,
}

fn summarize(failures: &[MetadataError]) -> String {
    let mut out = String::new();
    for (idx, failure) in failures.iter().enumerate() {
        if idx > 0 {
            out.push_str("; ");
        }
        out.push_str(failure.context());
        out.push_str(": ");
        out.push_str(&failure.source_error().to_string());
    }
    out
}

impl RestoreError {
    /// Returns `Ok(())` when `failures` is empty and an aggregate error otherwise.
    pub fn check(path: &Path, failures: Vec<MetadataError>) -> Result<(), Self> {
        if failures.is_empty() {
            Ok(())
        } else {
            Err(Self {
                path: path.to_path_buf(),
                failures,
            })
        }
    }

    /// Returns the entry whose restore failed.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the individual failures in the order they occurred.
    #[must_use]
    pub fn failures(&self) -> &[MetadataError] {
        &self.failures
    }

    /// Consumes the error and returns the individual failures.
    #[must_use]
    pub fn into_failures(self) -> Vec<MetadataError> {
        self.failures
    }
}

impl From<MetadataError> for RestoreError {
    fn from(err: MetadataError) -> Self {
        Self {
            path: err.path().to_path_buf(),
            failures: vec![err],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metadata_error_display_names_context_and_path() {
        let err = MetadataError::new(
            "write extended attribute",
            Path::new("/tmp/a"),
            io::Error::from(io::ErrorKind::PermissionDenied),
        );
        let text = err.to_string();
        assert!(text.starts_with("failed to write extended attribute '/tmp/a': "));
        assert_eq!(err.kind(), io::ErrorKind::PermissionDenied);
    }

    #[test]
    fn restore_error_check_is_ok_without_failures() {
        assert!(RestoreError::check(Path::new("x"), Vec::new()).is_ok());
    }

    #[test]
    fn restore_error_lists_every_failure() {
        let path = Path::new("entry");
        let failures = vec![
            MetadataError::new("encrypt file", path, io::Error::other("one")),
            MetadataError::new("set file attributes", path, io::Error::other("two")),
        ];
        let err = RestoreError::check(path, failures).expect_err("two failures");
        assert_eq!(err.failures().len(), 2);
        let text = err.to_string();
        assert!(text.contains("encrypt file: one"), "{text}");
        assert!(text.contains("set file attributes: two"), "{text}");
    }

    #[test]
    fn codec_error_converts_to_invalid_data() {
        let err: io::Error = EaCodecError::NameTooLarge(300).into();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
        assert!(err.to_string().contains("300"));
    }
}
