use super::{AttributeBackend, GenericCapture};
use crate::error::MetadataError;
use crate::generic::GenericAttributeRegistry;
use crate::node::{ExtendedAttribute, NodeType};
use crate::stat::Timespec;
use crate::xattr_stub;
use std::fs;
use std::path::Path;

/// Backend for platforms without extended or generic attribute support.
///
/// Capture yields no extended or generic attributes; restore skips extended
/// attributes, records every generic type as unknown, and leaves symlink
/// times alone.
#[derive(Debug, Default)]
pub struct NoopBackend {
    registry: GenericAttributeRegistry,
}

impl NoopBackend {
    /// Creates the backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl AttributeBackend for NoopBackend {
    fn name(&self) -> &'static str {
        "noop"
    }

    fn fill_extended_attributes(
        &self,
        path: &Path,
    ) -> Result<Vec<ExtendedAttribute>, MetadataError> {
        xattr_stub::fill_extended_attributes(path)
    }

    fn restore_extended_attributes(
        &self,
        path: &Path,
        attrs: &[ExtendedAttribute],
    ) -> Result<(), MetadataError> {
        xattr_stub::restore_extended_attributes(path, attrs)
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
        _path: &Path,
        _atime: Timespec,
        _mtime: Timespec,
    ) -> Result<(), MetadataError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{GenericAttribute, GenericAttributeType};
    use crate::unknown::UnknownTypeLog;

    #[test]
    fn everything_is_skipped() {
        let backend = NoopBackend::new();
        let path = Path::new("does-not-exist");
        assert!(backend.fill_extended_attributes(path).expect("fill").is_empty());
        backend
            .restore_extended_attributes(path, &[ExtendedAttribute::new("user.a", vec![1])])
            .expect("skipped");
        backend
            .restore_symlink_timestamps(path, Timespec::default(), Timespec::default())
            .expect("skipped");
    }

    #[test]
    fn generic_types_are_all_unknown() {
        let backend = NoopBackend::new();
        let unknown = UnknownTypeLog::new();
        let attrs = [GenericAttribute::new(
            GenericAttributeType::CREATION_TIME,
            vec![0; 8],
        )];
        backend
            .restore_generic_attributes(Path::new("x"), &attrs, &unknown)
            .expect("tolerated");
        assert!(unknown.contains(&GenericAttributeType::CREATION_TIME));
    }
}
