//! Windows path rules expressed as string operations.
//!
//! These helpers never touch the filesystem and accept both `\` and `/` as
//! separators, so they behave the same on every host.

const VERBATIM_PREFIX: &str = r"\\?\";
const NT_PREFIX: &str = r"\??\";
const VERBATIM_UNC_PREFIX: &str = r"\\?\UNC\";

fn is_separator(c: char) -> bool {
    c == '\\' || c == '/'
}

fn strip_verbatim(path: &str) -> (&str, bool) {
    if let Some(rest) = path.strip_prefix(VERBATIM_UNC_PREFIX) {
        return (rest, true);
    }
    if let Some(rest) = path.strip_prefix(VERBATIM_PREFIX) {
        return (rest, false);
    }
    (path, false)
}

fn is_drive_designator(s: &str) -> bool {
    let bytes = s.as_bytes();
    bytes.len() == 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
}

/// Returns true when `path` names a volume root: `C:\`, `\`, `\\server\share`
/// or their `\\?\` forms.
#[must_use]
pub fn is_volume_root(path: &str) -> bool {
    let (rest, verbatim_unc) = strip_verbatim(path);
    let unc = verbatim_unc || (rest.len() >= 2 && rest.chars().take(2).all(is_separator));
    let components: Vec<&str> = rest.split(is_separator).filter(|c| !c.is_empty()).collect();

    if unc {
        return components.len() <= 2;
    }
    match components.as_slice() {
        [] => rest.starts_with(is_separator),
        [drive] => is_drive_designator(drive) && rest.len() > drive.len(),
        _ => false,
    }
}

/// Returns true when the final component of `path` addresses an alternate
/// data stream (`file.txt:stream`).
#[must_use]
pub fn is_alternate_stream(path: &str) -> bool {
    let (rest, _) = strip_verbatim(path);
    let trimmed = rest.trim_end_matches(is_separator);
    let start = trimmed.rfind(is_separator).map_or(0, |i| i + 1);
    let name = &trimmed[start..];
    if start == 0 && is_drive_designator(name) {
        return false;
    }
    let name = if start == 0 && name.len() > 2 && is_drive_designator(&name[..2]) {
        &name[2..]
    } else {
        name
    };
    name.contains(':')
}

/// Returns true for entries that are not ordinary files or directories as far
/// as metadata capture is concerned: alternate data streams and volume roots.
#[must_use]
pub fn is_pseudo_path(path: &str) -> bool {
    is_alternate_stream(path) || is_volume_root(path)
}

/// Strips the stream suffix from an alternate data stream path, returning the
/// path of the main file. Other paths are returned unchanged.
#[must_use]
pub fn trim_ads(path: &str) -> &str {
    if !is_alternate_stream(path) {
        return path;
    }
    let start = path.rfind(is_separator).map_or(0, |i| i + 1);
    let skip = if start == 0 && path.len() > 2 && is_drive_designator(&path[..2]) {
        2
    } else {
        0
    };
    match path[start + skip..].find(':') {
        Some(idx) => &path[..start + skip + idx],
        None => path,
    }
}

/// Converts an absolute path into its extended-length form.
///
/// `C:\dir` becomes `\\?\C:\dir` and `\\server\share` becomes
/// `\\?\UNC\server\share`. Forward slashes are rewritten since the verbatim
/// form disables separator normalisation. Paths already carrying a `\\?\` or
/// `\??\` prefix are returned as-is.
#[must_use]
pub fn extended_length_path(abs: &str) -> String {
    if abs.starts_with(VERBATIM_PREFIX) || abs.starts_with(NT_PREFIX) {
        return abs.to_owned();
    }
    let normalized = abs.replace('/', "\\");
    match normalized.strip_prefix(r"\\") {
        Some(unc) => format!("{VERBATIM_UNC_PREFIX}{unc}"),
        None => format!("{VERBATIM_PREFIX}{normalized}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stream_names_are_pseudo() {
        assert!(is_pseudo_path(r"C:\data\report.txt:Zone.Identifier"));
        assert!(is_pseudo_path("report.txt:stream"));
        assert!(!is_pseudo_path(r"C:\data\report.txt"));
    }

    #[test]
    fn volume_roots_are_pseudo() {
        assert!(is_pseudo_path(r"C:\"));
        assert!(is_pseudo_path("C:/"));
        assert!(is_pseudo_path(r"\\?\D:\"));
        assert!(is_pseudo_path(r"\\server\share\"));
        assert!(is_pseudo_path(r"\"));
        assert!(!is_pseudo_path(r"C:\Users"));
        assert!(!is_pseudo_path(r"\\server\share\dir"));
    }

    #[test]
    fn drive_relative_name_is_not_a_stream() {
        assert!(!is_alternate_stream("C:notes.txt"));
        assert!(is_alternate_stream("C:notes.txt:meta"));
    }

    #[test]
    fn trim_ads_returns_main_file() {
        assert_eq!(trim_ads(r"C:\dir\file.txt:stream:$DATA"), r"C:\dir\file.txt");
        assert_eq!(trim_ads("file:s"), "file");
        assert_eq!(trim_ads(r"C:\dir\file.txt"), r"C:\dir\file.txt");
        assert_eq!(trim_ads(r"C:\"), r"C:\");
    }

    #[test]
    fn extended_length_forms() {
        assert_eq!(extended_length_path(r"C:\dir\f"), r"\\?\C:\dir\f");
        assert_eq!(extended_length_path("C:/dir/f"), r"\\?\C:\dir\f");
        assert_eq!(
            extended_length_path(r"\\server\share\f"),
            r"\\?\UNC\server\share\f"
        );
        assert_eq!(extended_length_path(r"\\?\C:\dir"), r"\\?\C:\dir");
        assert_eq!(extended_length_path(r"\??\C:\dir"), r"\??\C:\dir");
    }
}
