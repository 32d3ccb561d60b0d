use super::{AttributeBackend, GenericCapture};
use crate::error::MetadataError;
use crate::generic::GenericAttributeRegistry;
use crate::node::{ExtendedAttribute, NodeType};
use crate::stat::Timespec;
use crate::xattr;
use std::fs;
use std::path::Path;

/// Backend using POSIX extended attributes (Linux, Android, macOS, FreeBSD).
///
/// No generic attribute types are understood here; Windows-specific values
/// in a node are reported once as unknown and skipped.
#[derive(Debug, Default)]
pub struct PosixXattrBackend {
    registry: GenericAttributeRegistry,
}

impl PosixXattrBackend {
    /// Creates the backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl AttributeBackend for PosixXattrBackend {
    fn name(&self) -> &'static str {
        "posix-xattr"
    }

    fn fill_extended_attributes(
        &self,
        path: &Path,
    ) -> Result<Vec<ExtendedAttribute>, MetadataError> {
        xattr::fill_extended_attributes(path)
    }

    fn restore_extended_attributes(
        &self,
        path: &Path,
        attrs: &[ExtendedAttribute],
    ) -> Result<(), MetadataError> {
        xattr::restore_extended_attributes(path, attrs)
    }

    fn fill_generic_attributes(
        &self,
        _path: &Path,
        _metadata: &fs::Metadata,
        _node_type: NodeType,
    ) -> Result<GenericCapture, MetadataError> {
        Ok(GenericCapture::empty())
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
