//! Shared fixtures for attrkeep tests.
//!
//! Tests build small scratch trees under a [`TempDir`] and probe whether the
//! filesystem backing it supports user extended attributes before relying on
//! them.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub use tempfile::TempDir;

/// Kind of scratch entry created by [`Fixture::create`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntryKind {
    /// A regular file with a few bytes of content.
    File,
    /// An empty directory.
    Dir,
    /// A symbolic link pointing at a (possibly missing) sibling.
    Symlink,
}

/// A scratch directory that is removed when dropped.
#[derive(Debug)]
pub struct Fixture {
    root: TempDir,
}

impl Fixture {
    /// Creates a fresh scratch directory.
    ///
    /// # Panics
    ///
    /// Panics if the temporary directory cannot be created.
    #[must_use]
    pub fn new() -> Self {
        Self {
            root: tempfile::tempdir().expect("create scratch directory"),
        }
    }

    /// Returns the scratch directory path.
    #[must_use]
    pub fn path(&self) -> &Path {
        self.root.path()
    }

    /// Returns `name` joined onto the scratch directory without creating it.
    #[must_use]
    pub fn join(&self, name: &str) -> PathBuf {
        self.root.path().join(name)
    }

    /// Creates an entry called `name` and returns its path.
    ///
    /// # Panics
    ///
    /// Panics if the entry cannot be created.
    pub fn create(&self, name: &str, kind: EntryKind) -> PathBuf {
        let path = self.join(name);
        create_entry(&path, kind).expect("create fixture entry");
        path
    }
}

impl Default for Fixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Creates a single entry of `kind` at `path`.
pub fn create_entry(path: &Path, kind: EntryKind) -> io::Result<()> {
    match kind {
        EntryKind::File => fs::write(path, b"fixture contents"),
        EntryKind::Dir => fs::create_dir(path),
        EntryKind::Symlink => create_symlink(path),
    }
}

#[cfg(unix)]
fn create_symlink(path: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink("link-target", path)
}

#[cfg(windows)]
fn create_symlink(path: &Path) -> io::Result<()> {
    std::os::windows::fs::symlink_file("link-target", path)
}

#[cfg(not(any(unix, windows)))]
fn create_symlink(_path: &Path) -> io::Result<()> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        "symbolic links are not supported on this platform",
    ))
}

/// Checks whether `path` accepts `user.*` extended attributes.
#[cfg(unix)]
#[must_use]
pub fn xattrs_supported(path: &Path) -> bool {
    match xattr::set(path, "user.test_support", b"test") {
        Ok(()) => {
            let _ = xattr::remove(path, "user.test_support");
            true
        }
        Err(_) => false,
    }
}

/// Extended attributes are never available through this probe off Unix.
#[cfg(not(unix))]
#[must_use]
pub fn xattrs_supported(_path: &Path) -> bool {
    false
}
