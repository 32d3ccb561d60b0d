use super::windows_attrs::{capture_windows_generic, windows_registry};
use super::{AttributeBackend, GenericCapture};
use crate::ea::{self, EaEntry};
use crate::error::MetadataError;
use crate::generic::GenericAttributeRegistry;
use crate::node::{ExtendedAttribute, NodeType};
use crate::reconcile::FileStateOps;
use crate::stat::{Timespec, Win32AttributeData};
use logging::trace_ea;
use platform::windows as win;
use std::fs;
use std::io;
use std::os::windows::io::AsHandle;
use std::path::Path;
use std::sync::Arc;

/// [`FileStateOps`] backed by the Win32 API.
#[derive(Clone, Copy, Debug, Default)]
pub struct NativeFileOps;

impl FileStateOps for NativeFileOps {
    fn attributes(&self, path: &Path) -> io::Result<u32> {
        win::file_attributes(path)
    }

    fn set_attributes(&self, path: &Path, attributes: u32) -> io::Result<()> {
        win::set_file_attributes(path, attributes)
    }

    fn encrypt(&self, path: &Path) -> io::Result<()> {
        win::encrypt_file(path)
    }

    fn decrypt(&self, path: &Path) -> io::Result<()> {
        win::decrypt_file(path)
    }

    fn set_creation_time(&self, path: &Path, ticks: u64) -> io::Result<()> {
        win::set_creation_time(path, ticks)
    }

    fn security_descriptor(&self, path: &Path) -> io::Result<Vec<u8>> {
        win::security_descriptor(path)
    }

    fn set_security_descriptor(&self, path: &Path, raw: &[u8]) -> io::Result<()> {
        win::set_security_descriptor(path, raw)
    }
}

/// Backend using NT extended attributes and the Windows generic attribute
/// types (file attributes, creation time, security descriptor).
#[derive(Debug)]
pub struct WindowsBackend {
    ops: Arc<NativeFileOps>,
    registry: GenericAttributeRegistry,
}

impl WindowsBackend {
    /// Creates the backend.
    #[must_use]
    pub fn new() -> Self {
        let ops = Arc::new(NativeFileOps);
        Self {
            registry: windows_registry(Arc::clone(&ops)),
            ops,
        }
    }
}

impl Default for WindowsBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl AttributeBackend for WindowsBackend {
    fn name(&self) -> &'static str {
        "windows"
    }

    fn fill_extended_attributes(
        &self,
        path: &Path,
    ) -> Result<Vec<ExtendedAttribute>, MetadataError> {
        let handle = win::open_for_ea_read(path).map_err(|error| {
            MetadataError::new("open for extended attribute read", path, error)
        })?;
        let entries = ea::read_with_probe(|buf| win::query_ea(handle.as_handle(), buf))
            .map_err(|error| MetadataError::new("query extended attributes", path, error))?;
        trace_ea!(trace, "read {} EAs from {}", entries.len(), path.display());
        Ok(entries
            .into_iter()
            .map(|entry| ExtendedAttribute::new(entry.name, entry.value))
            .collect())
    }

    fn restore_extended_attributes(
        &self,
        path: &Path,
        attrs: &[ExtendedAttribute],
    ) -> Result<(), MetadataError> {
        if attrs.is_empty() {
            return Ok(());
        }
        let entries: Vec<EaEntry> = attrs
            .iter()
            .map(|attr| EaEntry::new(attr.name.clone(), attr.value.clone()))
            .collect();
        let buf = ea::encode(&entries).map_err(|error| {
            MetadataError::new("encode extended attributes", path, error.into())
        })?;
        let handle = win::open_for_ea_write(path)
            .map_err(|error| MetadataError::new("open for extended attribute write", path, error))?;
        win::set_ea(handle.as_handle(), &buf)
            .map_err(|error| MetadataError::new("write extended attributes", path, error))
    }

    fn fill_generic_attributes(
        &self,
        path: &Path,
        metadata: &fs::Metadata,
        node_type: NodeType,
    ) -> Result<GenericCapture, MetadataError> {
        let data = Win32AttributeData::from_metadata(metadata);
        capture_windows_generic(&*self.ops, path, node_type, &data)
    }

    fn registry(&self) -> &GenericAttributeRegistry {
        &self.registry
    }

    fn restore_symlink_timestamps(
        &self,
        path: &Path,
        atime: Timespec,
        mtime: Timespec,
    ) -> Result<(), MetadataError> {
        filetime::set_symlink_file_times(path, atime.to_file_time(), mtime.to_file_time())
            .map_err(|error| MetadataError::new("set symlink timestamps", path, error))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::GenericAttributeType;
    use crate::unknown::UnknownTypeLog;

    #[test]
    fn extended_attributes_round_trip_on_ntfs() {
        let dir = tempfile::tempdir().expect("tempdir");
        let file = dir.path().join("ea.txt");
        fs::write(&file, b"x").expect("write");
        let backend = WindowsBackend::new();

        let attrs = [ExtendedAttribute::new("USER.ALPHA", b"one".to_vec())];
        if let Err(err) = backend.restore_extended_attributes(&file, &attrs) {
            eprintln!("EAs not supported here ({err}), skipping test");
            return;
        }
        let read = backend.fill_extended_attributes(&file).expect("read");
        assert_eq!(read, attrs);
    }

    #[test]
    fn file_without_eas_reads_empty() {
        let dir = tempfile::tempdir().expect("tempdir");
        let file = dir.path().join("plain.txt");
        fs::write(&file, b"x").expect("write");
        let read = WindowsBackend::new().fill_extended_attributes(&file).expect("read");
        assert!(read.is_empty());
    }

    #[test]
    fn symlink_handles_do_not_reach_the_target() {
        let dir = tempfile::tempdir().expect("tempdir");
        let target = dir.path().join("target.txt");
        let link = dir.path().join("link.txt");
        fs::write(&target, b"x").expect("write");
        if let Err(err) = std::os::windows::fs::symlink_file(&target, &link) {
            eprintln!("symlinks not permitted here ({err}), skipping test");
            return;
        }
        let creation_ticks = |path: &Path| {
            let metadata = fs::symlink_metadata(path).expect("lstat");
            Win32AttributeData::from_metadata(&metadata).creation_ticks
        };
        let before = creation_ticks(&target);

        let ticks = 125_000_000_000_000_000;
        NativeFileOps
            .set_creation_time(&link, ticks)
            .expect("set link creation time");
        assert_eq!(creation_ticks(&link), ticks);
        assert_eq!(creation_ticks(&target), before);

        let backend = WindowsBackend::new();
        let attrs = [ExtendedAttribute::new("USER.LINK", b"on-link".to_vec())];
        if backend.restore_extended_attributes(&link, &attrs).is_ok() {
            let on_target = backend.fill_extended_attributes(&target).expect("read target");
            assert!(on_target.is_empty());
        }
    }

    #[test]
    fn creation_time_and_attributes_restore() {
        let dir = tempfile::tempdir().expect("tempdir");
        let source = dir.path().join("src.txt");
        let target = dir.path().join("dst.txt");
        fs::write(&source, b"x").expect("write");
        fs::write(&target, b"y").expect("write");
        crate::reconcile::FileStateOps::set_attributes(
            &NativeFileOps,
            &source,
            crate::reconcile::FILE_ATTRIBUTE_HIDDEN,
        )
        .expect("hide");

        let backend = WindowsBackend::new();
        let metadata = fs::symlink_metadata(&source).expect("lstat");
        let capture = backend
            .fill_generic_attributes(&source, &metadata, NodeType::File)
            .expect("capture");
        backend
            .restore_generic_attributes(&target, &capture.attributes, &UnknownTypeLog::new())
            .expect("restore");

        let restored = fs::symlink_metadata(&target).expect("lstat");
        let restored_data = Win32AttributeData::from_metadata(&restored);
        assert_eq!(
            restored_data.file_attributes & crate::reconcile::FILE_ATTRIBUTE_HIDDEN,
            crate::reconcile::FILE_ATTRIBUTE_HIDDEN
        );
        assert_eq!(
            restored_data.creation_ticks,
            Win32AttributeData::from_metadata(&metadata).creation_ticks
        );

        let captured_sd = capture
            .attributes
            .iter()
            .find(|a| a.kind == GenericAttributeType::SECURITY_DESCRIPTOR)
            .expect("descriptor captured");
        let restored_sd = crate::security::capture_security_descriptor(&NativeFileOps, &target)
            .expect("reread descriptor");
        assert_eq!(
            crate::security::security_descriptor_sddl(&captured_sd.value).expect("sddl"),
            crate::security::security_descriptor_sddl(&restored_sd.value).expect("sddl")
        );
    }
}
