//! Generic attribute capture and restore wiring for Windows.
//!
//! Both halves are generic over [`FileStateOps`] so the same code backs the
//! real Windows backend and the mock-driven tests on other hosts.

use super::GenericCapture;
use crate::error::MetadataError;
use crate::generic::GenericAttributeRegistry;
use crate::node::{GenericAttribute, GenericAttributeType, NodeType};
use crate::reconcile::{
    FileStateOps, encode_creation_time, encode_file_attributes, restore_creation_time,
    restore_file_attributes,
};
use crate::security::{capture_security_descriptor, restore_security_descriptor};
use crate::stat::Win32AttributeData;
use logging::{trace_acl, trace_time};
use std::path::Path;
use std::sync::Arc;

/// Builds the registry for the three Windows generic attribute types.
pub fn windows_registry<O: FileStateOps + 'static>(ops: Arc<O>) -> GenericAttributeRegistry {
    let attributes_ops = Arc::clone(&ops);
    let creation_ops = Arc::clone(&ops);
    GenericAttributeRegistry::new()
        .with(
            GenericAttributeType::FILE_ATTRIBUTES,
            move |path: &Path, value: &[u8]| restore_file_attributes(&*attributes_ops, path, value),
        )
        .with(
            GenericAttributeType::CREATION_TIME,
            move |path: &Path, value: &[u8]| restore_creation_time(&*creation_ops, path, value),
        )
        .with(
            GenericAttributeType::SECURITY_DESCRIPTOR,
            move |path: &Path, value: &[u8]| restore_security_descriptor(&*ops, path, value),
        )
}

/// Captures file attributes, creation time and (for files and directories)
/// the security descriptor of `path`.
///
/// Pseudo-paths such as alternate data streams and volume roots carry no
/// generic attributes and suppress extended attribute capture.
pub fn capture_windows_generic<O: FileStateOps + ?Sized>(
    ops: &O,
    path: &Path,
    node_type: NodeType,
    data: &Win32AttributeData,
) -> Result<GenericCapture, MetadataError> {
    if platform::path::is_pseudo_path(&path.to_string_lossy()) {
        return Ok(GenericCapture::suppressed());
    }

    let mut attributes = vec![GenericAttribute::new(
        GenericAttributeType::FILE_ATTRIBUTES,
        encode_file_attributes(data.file_attributes).to_vec(),
    )];

    if data.creation_ticks == 0 {
        trace_time!(debug, "no creation time reported for {}", path.display());
    } else {
        attributes.push(GenericAttribute::new(
            GenericAttributeType::CREATION_TIME,
            encode_creation_time(data.creation_ticks).to_vec(),
        ));
    }

    if matches!(node_type, NodeType::File | NodeType::Dir) {
        match capture_security_descriptor(ops, path) {
            Ok(attr) => attributes.push(attr),
            Err(err) => {
                trace_acl!(debug, "{}", err);
            }
        }
    }

    Ok(GenericCapture {
        allow_extended: true,
        attributes,
    })
}
