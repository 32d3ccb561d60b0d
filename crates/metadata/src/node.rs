//! The backup record for one filesystem entry.
//!
//! A [`Node`] is what the pipeline serialises: name, type, mode, times and
//! two attribute lists. Extended attributes are raw name/value pairs read
//! from the OS. Generic attributes are typed, opaque blobs keyed by a
//! namespaced tag such as `windows.creation_time`; a platform restores the
//! tags it understands and skips the rest.

use crate::stat::Timespec;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use std::fs;

/// Kind of filesystem entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
    /// Regular file.
    File,
    /// Directory.
    Dir,
    /// Symbolic link.
    Symlink,
    /// Block device.
    Dev,
    /// Character device.
    Chardev,
    /// Named pipe.
    Fifo,
    /// Unix domain socket.
    Socket,
    /// Anything else the OS reports.
    Irregular,
}

impl NodeType {
    /// Classifies an `lstat` file type.
    #[must_use]
    pub fn from_file_type(file_type: fs::FileType) -> Self {
        if file_type.is_symlink() {
            return Self::Symlink;
        }
        if file_type.is_dir() {
            return Self::Dir;
        }
        if file_type.is_file() {
            return Self::File;
        }
        #[cfg(unix)]
        {
            use std::os::unix::fs::FileTypeExt;
            if file_type.is_block_device() {
                return Self::Dev;
            }
            if file_type.is_char_device() {
                return Self::Chardev;
            }
            if file_type.is_fifo() {
                return Self::Fifo;
            }
            if file_type.is_socket() {
                return Self::Socket;
            }
        }
        Self::Irregular
    }

    /// Returns the serialised name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Dir => "dir",
            Self::Symlink => "symlink",
            Self::Dev => "dev",
            Self::Chardev => "chardev",
            Self::Fifo => "fifo",
            Self::Socket => "socket",
            Self::Irregular => "irregular",
        }
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A raw extended attribute.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtendedAttribute {
    /// Attribute name as reported by the OS.
    pub name: String,
    /// Attribute value.
    #[serde(with = "base64_bytes")]
    pub value: Vec<u8>,
}

impl ExtendedAttribute {
    /// Creates an attribute.
    pub fn new(name: impl Into<String>, value: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// Namespaced tag identifying a generic attribute's meaning and encoding.
///
/// Tags are open-ended: values the current platform does not know survive
/// (de)serialisation unchanged.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GenericAttributeType(Cow<'static, str>);

impl GenericAttributeType {
    /// Windows `FILE_ATTRIBUTE_*` bits, 4 bytes little-endian.
    pub const FILE_ATTRIBUTES: Self = Self(Cow::Borrowed("windows.file_attributes"));
    /// Windows creation time, 8 bytes: low then high `FILETIME` dword, both little-endian.
    pub const CREATION_TIME: Self = Self(Cow::Borrowed("windows.creation_time"));
    /// Windows self-relative security descriptor, standard base64 text.
    pub const SECURITY_DESCRIPTOR: Self = Self(Cow::Borrowed("windows.security_descriptor"));

    /// Creates a tag from any string.
    pub fn new(tag: impl Into<String>) -> Self {
        Self(Cow::Owned(tag.into()))
    }

    /// Returns the tag text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GenericAttributeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for GenericAttributeType {
    fn from(tag: &str) -> Self {
        Self::new(tag)
    }
}

/// A typed, opaque attribute value.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenericAttribute {
    /// Tag describing how to interpret `value`.
    #[serde(rename = "type")]
    pub kind: GenericAttributeType,
    /// Encoded value.
    #[serde(with = "base64_bytes")]
    pub value: Vec<u8>,
}

impl GenericAttribute {
    /// Creates an attribute.
    pub fn new(kind: GenericAttributeType, value: Vec<u8>) -> Self {
        Self {
            kind,
            value,
        }
    }
}

/// Metadata record for one filesystem entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    /// Final path component.
    pub name: String,
    /// Entry kind.
    #[serde(rename = "type")]
    pub node_type: NodeType,
    /// Permission bits (synthesised on platforms without a Unix mode).
    pub mode: u32,
    /// Last modification time.
    pub mtime: Timespec,
    /// Last access time.
    pub atime: Timespec,
    /// Last status change time.
    pub ctime: Timespec,
    /// Raw extended attributes.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extended_attributes: Vec<ExtendedAttribute>,
    /// Typed platform attributes.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub generic_attributes: Vec<GenericAttribute>,
}

impl Node {
    /// Creates an empty node of `node_type`.
    pub fn new(name: impl Into<String>, node_type: NodeType) -> Self {
        Self {
            name: name.into(),
            node_type,
            mode: 0,
            mtime: Timespec::default(),
            atime: Timespec::default(),
            ctime: Timespec::default(),
            extended_attributes: Vec::new(),
            generic_attributes: Vec::new(),
        }
    }

    /// Returns the value of the first generic attribute tagged `kind`.
    #[must_use]
    pub fn generic_attribute(&self, kind: &GenericAttributeType) -> Option<&[u8]> {
        self.generic_attributes
            .iter()
            .find(|attr| attr.kind == *kind)
            .map(|attr| attr.value.as_slice())
    }

    /// Returns the value of the extended attribute called `name`.
    ///
    /// Windows EA names are case-insensitive; elsewhere names match exactly.
    #[must_use]
    pub fn extended_attribute(&self, name: &str) -> Option<&[u8]> {
        self.extended_attributes
            .iter()
            .find(|attr| names_match(&attr.name, name))
            .map(|attr| attr.value.as_slice())
    }
}

#[cfg(windows)]
fn names_match(stored: &str, wanted: &str) -> bool {
    stored.eq_ignore_ascii_case(wanted)
}

#[cfg(not(windows))]
fn names_match(stored: &str, wanted: &str) -> bool {
    stored == wanted
}

mod base64_bytes {
    use base64::Engine;
    use base64::engine::general_purpose::STANDARD;
    use serde::{Deserialize, Deserializer, Serializer};

    pub(super) fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Vec<u8>, D::Error> {
        let text = String::deserialize(deserializer)?;
        STANDARD
            .decode(text.as_bytes())
            .map_err(serde::de::Error::custom)
    }
}
