//! Windows extended attribute buffers.
//!
//! The NT EA calls exchange a chain of `FILE_FULL_EA_INFORMATION` records:
//!
//! ```text
//! offset 0  u32  next entry offset (0 on the last record)
//! offset 4  u8   flags
//! offset 5  u8   name length (excluding the NUL)
//! offset 6  u16  value length
//! offset 8       name bytes, NUL, value bytes, zero padding to 4 bytes
//! ```
//!
//! All integers are little-endian. The codec is plain byte manipulation and
//! runs on every platform; only the kernel calls feeding [`read_with_probe`]
//! are Windows specific.

use crate::error::EaCodecError;
use logging::trace_ea;
use platform::ntstatus::QueryStatus;
use std::io;

/// Size of the fixed record header.
pub const EA_HEADER_LEN: usize = 8;
/// First buffer size tried by [`read_with_probe`].
pub const INITIAL_QUERY_BUFFER: usize = 1024;
/// Largest name the one-byte length field can describe.
pub const MAX_NAME_LEN: usize = u8::MAX as usize;
/// Largest value the two-byte length field can describe.
pub const MAX_VALUE_LEN: usize = u16::MAX as usize;

/// One decoded EA record.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EaEntry {
    /// Attribute name.
    pub name: String,
    /// `FILE_NEED_EA` and friends; zero for ordinary attributes.
    pub flags: u8,
    /// Attribute value.
    pub value: Vec<u8>,
}

impl EaEntry {
    /// Creates an entry with no flags.
    pub fn new(name: impl Into<String>, value: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            flags: 0,
            value,
        }
    }

    fn record_len(&self) -> usize {
        EA_HEADER_LEN + self.name.len() + 1 + self.value.len()
    }
}

const fn padded(len: usize) -> usize {
    (len + 3) & !3
}

/// Encodes `entries` into one contiguous buffer.
///
/// Every entry is validated before anything is written; an oversized name
/// or value fails the whole call. Each record, the last included, is
/// zero-padded to a 4-byte boundary; only the last has a next offset of 0.
pub fn encode(entries: &[EaEntry]) -> Result<Vec<u8>, EaCodecError> {
    let mut total = 0;
    for entry in entries {
        if entry.name.len() > MAX_NAME_LEN {
            return Err(EaCodecError::NameTooLarge(entry.name.len()));
        }
        if entry.value.len() > MAX_VALUE_LEN {
            return Err(EaCodecError::ValueTooLarge(entry.value.len()));
        }
        total += padded(entry.record_len());
    }

    let mut buf = Vec::with_capacity(total);
    for (idx, entry) in entries.iter().enumerate() {
        let record = entry.record_len();
        let is_last = idx + 1 == entries.len();
        let next = if is_last { 0 } else { padded(record) as u32 };

        buf.extend_from_slice(&next.to_le_bytes());
        buf.push(entry.flags);
        buf.push(entry.name.len() as u8);
        buf.extend_from_slice(&(entry.value.len() as u16).to_le_bytes());
        buf.extend_from_slice(entry.name.as_bytes());
        buf.push(0);
        buf.extend_from_slice(&entry.value);
        buf.resize(buf.len() + padded(record) - record, 0);
    }
    Ok(buf)
}

/// Decodes a record chain. An empty buffer holds no entries.
///
/// Records whose name is not valid UTF-8 are skipped with a warning.
pub fn decode(buf: &[u8]) -> Result<Vec<EaEntry>, EaCodecError> {
    let mut entries = Vec::new();
    let mut rest = buf;
    while !rest.is_empty() {
        if rest.len() < EA_HEADER_LEN {
            return Err(EaCodecError::InvalidBuffer);
        }
        let next = u32::from_le_bytes([rest[0], rest[1], rest[2], rest[3]]) as usize;
        let flags = rest[4];
        let name_len = usize::from(rest[5]);
        let value_len = usize::from(u16::from_le_bytes([rest[6], rest[7]]));

        let value_start = EA_HEADER_LEN + name_len + 1;
        if value_start + value_len > rest.len() || next > rest.len() {
            return Err(EaCodecError::InvalidBuffer);
        }
        let name = &rest[EA_HEADER_LEN..EA_HEADER_LEN + name_len];
        match std::str::from_utf8(name) {
            Ok(name) => entries.push(EaEntry {
                name: name.to_owned(),
                flags,
                value: rest[value_start..value_start + value_len].to_vec(),
            }),
            Err(_) => {
                trace_ea!(warn, "skipping EA with non-UTF-8 name \"{}\"", name.escape_ascii());
            }
        }

        if next == 0 {
            break;
        }
        rest = &rest[next..];
    }
    Ok(entries)
}

/// Runs an EA query, doubling the buffer until the answer fits.
///
/// `query` fills the buffer it is handed and reports how the kernel
/// responded. "No EAs" and "not supported" both yield an empty list.
pub fn read_with_probe<F>(mut query: F) -> io::Result<Vec<EaEntry>>
where
    F: FnMut(&mut [u8]) -> QueryStatus,
{
    let mut len = INITIAL_QUERY_BUFFER;
    loop {
        let mut buf = vec![0u8; len];
        match query(&mut buf) {
            QueryStatus::Complete => return decode(&buf).map_err(io::Error::from),
            QueryStatus::NoData | QueryStatus::NotSupported => return Ok(Vec::new()),
            QueryStatus::Failed(status) => return Err(status.into()),
            QueryStatus::BufferTooSmall => {
                len = len.checked_mul(2).ok_or_else(|| {
                    io::Error::new(io::ErrorKind::OutOfMemory, "EA buffer size overflow")
                })?;
                trace_ea!(trace, "growing EA query buffer to {} bytes", len);
            }
        }
    }
}
