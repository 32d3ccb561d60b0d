//! Windows security descriptor capture and restore.
//!
//! The self-relative descriptor (owner, group and DACL) is stored as standard
//! base64 text so the generic attribute value stays printable.

use crate::error::{MetadataError, RestoreError};
use crate::node::{GenericAttribute, GenericAttributeType};
use crate::reconcile::FileStateOps;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use logging::trace_acl;
use std::io;
use std::path::Path;

/// Encodes raw descriptor bytes as a `windows.security_descriptor` value.
#[must_use]
pub fn encode_security_descriptor(raw: &[u8]) -> Vec<u8> {
    STANDARD.encode(raw).into_bytes()
}

/// Decodes a `windows.security_descriptor` value back to raw bytes.
pub fn decode_security_descriptor(value: &[u8]) -> io::Result<Vec<u8>> {
    STANDARD
        .decode(value)
        .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))
}

/// Reads the descriptor of `path` as a generic attribute.
pub fn capture_security_descriptor<O: FileStateOps + ?Sized>(
    ops: &O,
    path: &Path,
) -> Result<GenericAttribute, MetadataError> {
    let raw = ops
        .security_descriptor(path)
        .map_err(|err| MetadataError::new("read security descriptor", path, err))?;
    trace_acl!(trace, "captured {} descriptor bytes from {}", raw.len(), path.display());
    Ok(GenericAttribute::new(
        GenericAttributeType::SECURITY_DESCRIPTOR,
        encode_security_descriptor(&raw),
    ))
}

/// Applies a `windows.security_descriptor` value to `path`.
pub fn restore_security_descriptor<O: FileStateOps + ?Sized>(
    ops: &O,
    path: &Path,
    value: &[u8],
) -> Result<(), RestoreError> {
    let raw = decode_security_descriptor(value)
        .map_err(|err| MetadataError::new("decode security descriptor", path, err))?;
    ops.set_security_descriptor(path, &raw)
        .map_err(|err| MetadataError::new("set security descriptor", path, err).into())
}

/// Renders a `windows.security_descriptor` value as SDDL.
#[cfg(windows)]
pub fn security_descriptor_sddl(value: &[u8]) -> io::Result<String> {
    platform::windows::descriptor_to_sddl(&decode_security_descriptor(value)?)
}
