//! No-op extended attribute handling for platforms without xattr support.
//!
//! AIX, NetBSD, OpenBSD, Solaris and illumos (and any build with the `xattr`
//! feature disabled) capture no extended attributes and silently skip them
//! on restore, so a node captured elsewhere still restores its other
//! metadata.

use crate::error::MetadataError;
use crate::node::ExtendedAttribute;
use logging::trace_xattr;
use std::path::Path;
use std::sync::Once;

/// Emits a one-time note that extended attributes are being skipped.
fn note_xattr_unsupported() {
    static NOTE_ONCE: Once = Once::new();
    NOTE_ONCE.call_once(|| {
        trace_xattr!(
            debug,
            "extended attributes are not supported on this platform; skipping them"
        );
    });
}

/// Captures nothing.
pub fn fill_extended_attributes(_path: &Path) -> Result<Vec<ExtendedAttribute>, MetadataError> {
    Ok(Vec::new())
}

/// Discards `attrs`.
pub fn restore_extended_attributes(
    _path: &Path,
    attrs: &[ExtendedAttribute],
) -> Result<(), MetadataError> {
    if !attrs.is_empty() {
        note_xattr_unsupported();
    }
    Ok(())
}
