use crate::error::MetadataError;
use crate::node::ExtendedAttribute;
use crate::outcome::XattrOutcome;
use logging::trace_xattr;
use std::path::Path;

/// Reads every extended attribute of `path` without following symlinks.
///
/// A filesystem without xattr support yields an empty list. An attribute
/// that cannot be read is skipped with a warning rather than failing the
/// whole entry; one that disappears between list and get is skipped quietly.
pub fn fill_extended_attributes(path: &Path) -> Result<Vec<ExtendedAttribute>, MetadataError> {
    let names = match XattrOutcome::from(xattr::list(path)) {
        XattrOutcome::Ok(names) => names,
        XattrOutcome::NotSupported | XattrOutcome::NoData => {
            trace_xattr!(debug, "extended attributes unsupported on {}", path.display());
            return Ok(Vec::new());
        }
        XattrOutcome::Error(error) => {
            return Err(MetadataError::new("list extended attributes", path, error));
        }
    };

    let mut attrs = Vec::new();
    for name in names {
        let Some(text) = name.to_str() else {
            trace_xattr!(
                warn,
                "skipping non-UTF-8 extended attribute {:?} on {}",
                name,
                path.display()
            );
            continue;
        };
        match XattrOutcome::from(xattr::get(path, &name)) {
            XattrOutcome::Ok(Some(value)) => attrs.push(ExtendedAttribute::new(text, value)),
            XattrOutcome::Ok(None) | XattrOutcome::NoData => {
                trace_xattr!(debug, "extended attribute {} vanished from {}", text, path.display());
            }
            XattrOutcome::NotSupported => {}
            XattrOutcome::Error(error) => {
                trace_xattr!(
                    warn,
                    "can not obtain extended attribute {} for {}: {}",
                    text,
                    path.display(),
                    error
                );
            }
        }
    }
    trace_xattr!(trace, "read {} extended attributes from {}", attrs.len(), path.display());
    Ok(attrs)
}

/// Writes `attrs` to `path` in order without following symlinks, stopping
/// at the first failure.
///
/// An attribute the filesystem refuses as unsupported (an unknown namespace,
/// or no xattr support at all) is skipped, as is one reported missing by
/// network filesystems; the remaining attributes are still written.
pub fn restore_extended_attributes(
    path: &Path,
    attrs: &[ExtendedAttribute],
) -> Result<(), MetadataError> {
    for attr in attrs {
        match XattrOutcome::from(xattr::set(path, &attr.name, &attr.value)) {
            XattrOutcome::Ok(()) => {}
            XattrOutcome::NotSupported | XattrOutcome::NoData => {
                trace_xattr!(
                    debug,
                    "extended attribute {} not supported on {}; skipped",
                    attr.name,
                    path.display()
                );
            }
            XattrOutcome::Error(error) => {
                return Err(MetadataError::new("write extended attribute", path, error));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;
    use test_support::xattrs_supported;

    #[test]
    fn file_without_user_attributes_lists_none() {
        let dir = tempdir().expect("create temp dir");
        let file = dir.path().join("test.txt");
        fs::write(&file, "test content").expect("write file");

        if !xattrs_supported(&file) {
            eprintln!("xattrs not supported, skipping test");
            return;
        }

        let attrs = fill_extended_attributes(&file).expect("list attrs");
        assert!(attrs.iter().all(|a| !a.name.starts_with("user.")));
    }

    #[test]
    fn write_and_read_attribute_roundtrip() {
        let dir = tempdir().expect("create temp dir");
        let file = dir.path().join("test.txt");
        fs::write(&file, "test content").expect("write file");

        if !xattrs_supported(&file) {
            eprintln!("xattrs not supported, skipping test");
            return;
        }

        let attrs = [
            ExtendedAttribute::new("user.foo", b"bar".to_vec()),
            ExtendedAttribute::new("user.empty", Vec::new()),
        ];
        restore_extended_attributes(&file, &attrs).expect("write attrs");

        let read = fill_extended_attributes(&file).expect("read attrs");
        let foo = read.iter().find(|a| a.name == "user.foo").expect("user.foo present");
        assert_eq!(foo.value, b"bar");
        assert!(read.iter().any(|a| a.name == "user.empty" && a.value.is_empty()));
    }

    #[test]
    fn unsupported_namespace_does_not_stop_later_attributes() {
        let dir = tempdir().expect("create temp dir");
        let file = dir.path().join("f");
        fs::write(&file, b"x").expect("write file");

        if !xattrs_supported(&file) {
            eprintln!("xattrs not supported, skipping test");
            return;
        }

        let attrs = [
            ExtendedAttribute::new("bogus.ns", b"1".to_vec()),
            ExtendedAttribute::new("user.foo", b"bar".to_vec()),
        ];
        restore_extended_attributes(&file, &attrs).expect("unsupported name is skipped");
        assert_eq!(
            xattr::get(&file, "user.foo").expect("read user.foo"),
            Some(b"bar".to_vec())
        );
    }

    #[test]
    fn restore_of_empty_list_is_noop() {
        let dir = tempdir().expect("create temp dir");
        let file = dir.path().join("f");
        fs::write(&file, b"x").expect("write file");
        restore_extended_attributes(&file, &[]).expect("nothing to write");
    }

    #[test]
    fn missing_path_is_an_error() {
        let dir = tempdir().expect("create temp dir");
        let missing = dir.path().join("missing");
        let err = fill_extended_attributes(&missing).expect_err("no such file");
        assert_eq!(err.context(), "list extended attributes");
        assert_eq!(err.kind(), std::io::ErrorKind::NotFound);
    }

    #[test]
    fn restore_onto_missing_path_fails() {
        let dir = tempdir().expect("create temp dir");
        let missing = dir.path().join("missing");
        let attrs = [ExtendedAttribute::new("user.foo", b"bar".to_vec())];
        let err = restore_extended_attributes(&missing, &attrs).expect_err("no such file");
        assert_eq!(err.context(), "write extended attribute");
    }
}
