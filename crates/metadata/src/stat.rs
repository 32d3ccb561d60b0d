//! Canonical timestamp and `stat` views shared by every platform.
//!
//! Each OS reports times in its own shape (seconds plus a narrow or wide
//! nanosecond field, or 100 ns ticks since 1601). Capture funnels all of them
//! into [`Timespec`] and [`StatT`] so the rest of the crate never sees the
//! platform layout.

use serde::{Deserialize, Serialize};
use std::fs;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

const NANOS_PER_SEC: i64 = 1_000_000_000;

/// Seconds between 1601-01-01 and 1970-01-01, in 100 ns ticks.
pub const FILETIME_UNIX_EPOCH_TICKS: i64 = 116_444_736_000_000_000;
const TICKS_PER_SEC: i64 = 10_000_000;

/// A point in time as whole seconds since the Unix epoch plus nanoseconds.
///
/// `nsec` is always in `0..1_000_000_000`; times before the epoch carry a
/// negative `sec` and a positive `nsec`.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Timespec {
    /// Seconds since the Unix epoch.
    pub sec: i64,
    /// Nanoseconds within the second.
    pub nsec: i64,
}

impl Timespec {
    /// Builds a normalised timestamp. `nsec` may be any integer width; values
    /// outside one second carry into `sec`.
    #[must_use]
    pub fn new(sec: i64, nsec: impl Into<i64>) -> Self {
        let nsec = nsec.into();
        Self {
            sec: sec + nsec.div_euclid(NANOS_PER_SEC),
            nsec: nsec.rem_euclid(NANOS_PER_SEC),
        }
    }

    /// Converts Windows `FILETIME` ticks (100 ns since 1601-01-01).
    #[must_use]
    pub fn from_filetime_ticks(ticks: u64) -> Self {
        let since_epoch = i128::from(ticks) - i128::from(FILETIME_UNIX_EPOCH_TICKS);
        let ticks_per_sec = i128::from(TICKS_PER_SEC);
        Self {
            sec: since_epoch.div_euclid(ticks_per_sec) as i64,
            nsec: (since_epoch.rem_euclid(ticks_per_sec) * 100) as i64,
        }
    }

    /// Converts back to `FILETIME` ticks, saturating at the representable range.
    #[must_use]
    pub fn to_filetime_ticks(self) -> u64 {
        let ticks = i128::from(self.sec) * i128::from(TICKS_PER_SEC)
            + i128::from(self.nsec / 100)
            + i128::from(FILETIME_UNIX_EPOCH_TICKS);
        ticks.clamp(0, i128::from(u64::MAX)) as u64
    }

    /// Converts a [`SystemTime`].
    #[must_use]
    pub fn from_system_time(time: SystemTime) -> Self {
        match time.duration_since(UNIX_EPOCH) {
            Ok(after) => Self::new(after.as_secs() as i64, i64::from(after.subsec_nanos())),
            Err(before) => {
                let before: Duration = before.duration();
                Self::new(
                    -(before.as_secs() as i64),
                    -i64::from(before.subsec_nanos()),
                )
            }
        }
    }

    /// Returns the `filetime` representation used when setting times.
    #[must_use]
    pub fn to_file_time(self) -> filetime::FileTime {
        filetime::FileTime::from_unix_time(self.sec, self.nsec as u32)
    }
}

/// Raw `WIN32_FILE_ATTRIBUTE_DATA` fields as reported by Windows.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Win32AttributeData {
    /// `FILE_ATTRIBUTE_*` bits.
    pub file_attributes: u32,
    /// Creation time in `FILETIME` ticks.
    pub creation_ticks: u64,
    /// Last access time in `FILETIME` ticks.
    pub access_ticks: u64,
    /// Last write time in `FILETIME` ticks.
    pub write_ticks: u64,
    /// High 32 bits of the file size.
    pub size_high: u32,
    /// Low 32 bits of the file size.
    pub size_low: u32,
}

/// Platform-neutral view of `stat` data.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StatT {
    dev: u64,
    ino: u64,
    nlink: u64,
    uid: u32,
    gid: u32,
    rdev: u64,
    size: u64,
    atim: Timespec,
    mtim: Timespec,
    ctim: Timespec,
}

impl StatT {
    /// Builds the view from `lstat` metadata.
    #[cfg(unix)]
    #[must_use]
    pub fn from_metadata(metadata: &fs::Metadata) -> Self {
        use std::os::unix::fs::MetadataExt;

        Self {
            dev: metadata.dev(),
            ino: metadata.ino(),
            nlink: metadata.nlink(),
            uid: metadata.uid(),
            gid: metadata.gid(),
            rdev: metadata.rdev(),
            size: metadata.size(),
            atim: Timespec::new(metadata.atime(), metadata.atime_nsec()),
            mtim: Timespec::new(metadata.mtime(), metadata.mtime_nsec()),
            ctim: Timespec::new(metadata.ctime(), metadata.ctime_nsec()),
        }
    }

    /// Builds the view from `lstat` metadata.
    #[cfg(windows)]
    #[must_use]
    pub fn from_metadata(metadata: &fs::Metadata) -> Self {
        Self::from_win32(&Win32AttributeData::from_metadata(metadata))
    }

    /// Builds the view from `lstat` metadata.
    #[cfg(not(any(unix, windows)))]
    #[must_use]
    pub fn from_metadata(metadata: &fs::Metadata) -> Self {
        let mtim = metadata
            .modified()
            .map(Timespec::from_system_time)
            .unwrap_or_default();
        let atim = metadata
            .accessed()
            .map(Timespec::from_system_time)
            .unwrap_or(mtim);
        Self {
            size: metadata.len(),
            atim,
            mtim,
            ctim: mtim,
            ..Self::default()
        }
    }

    /// Builds the view from Windows attribute data.
    ///
    /// Windows has no device, inode, link count or ownership ids in this
    /// structure; they are reported as zero. There is no change time either,
    /// so `ctim` mirrors the last write time.
    #[must_use]
    pub fn from_win32(data: &Win32AttributeData) -> Self {
        let mtim = Timespec::from_filetime_ticks(data.write_ticks);
        Self {
            size: (u64::from(data.size_high) << 32) | u64::from(data.size_low),
            atim: Timespec::from_filetime_ticks(data.access_ticks),
            mtim,
            ctim: mtim,
            ..Self::default()
        }
    }

    /// Device id.
    #[must_use]
    pub const fn dev(&self) -> u64 {
        self.dev
    }

    /// Inode number.
    #[must_use]
    pub const fn ino(&self) -> u64 {
        self.ino
    }

    /// Hard link count.
    #[must_use]
    pub const fn nlink(&self) -> u64 {
        self.nlink
    }

    /// Owner user id.
    #[must_use]
    pub const fn uid(&self) -> u32 {
        self.uid
    }

    /// Owner group id.
    #[must_use]
    pub const fn gid(&self) -> u32 {
        self.gid
    }

    /// Device id for special files.
    #[must_use]
    pub const fn rdev(&self) -> u64 {
        self.rdev
    }

    /// Size in bytes.
    #[must_use]
    pub const fn size(&self) -> u64 {
        self.size
    }

    /// Last access time.
    #[must_use]
    pub const fn atim(&self) -> Timespec {
        self.atim
    }

    /// Last modification time.
    #[must_use]
    pub const fn mtim(&self) -> Timespec {
        self.mtim
    }

    /// Last status change time.
    #[must_use]
    pub const fn ctim(&self) -> Timespec {
        self.ctim
    }
}

#[cfg(windows)]
impl Win32AttributeData {
    /// Extracts the attribute data from `lstat` metadata.
    #[must_use]
    pub fn from_metadata(metadata: &fs::Metadata) -> Self {
        use std::os::windows::fs::MetadataExt;

        let size = metadata.file_size();
        Self {
            file_attributes: metadata.file_attributes(),
            creation_ticks: metadata.creation_time(),
            access_ticks: metadata.last_access_time(),
            write_ticks: metadata.last_write_time(),
            size_high: (size >> 32) as u32,
            size_low: size as u32,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_normalises_nanoseconds() {
        assert_eq!(Timespec::new(5, 1_500_000_000_i64), Timespec { sec: 6, nsec: 500_000_000 });
        assert_eq!(Timespec::new(0, -1_i64), Timespec { sec: -1, nsec: 999_999_999 });
    }

    #[test]
    fn narrow_nanoseconds_widen_without_loss() {
        let narrow: i32 = 999_999_999;
        assert_eq!(Timespec::new(7, narrow), Timespec { sec: 7, nsec: 999_999_999 });
    }

    #[test]
    fn filetime_epoch_maps_to_unix_zero() {
        let ticks = FILETIME_UNIX_EPOCH_TICKS as u64;
        assert_eq!(Timespec::from_filetime_ticks(ticks), Timespec::default());
        assert_eq!(
            Timespec::from_filetime_ticks(ticks + 10_000_001),
            Timespec { sec: 1, nsec: 100 }
        );
    }

    #[test]
    fn filetime_before_unix_epoch_is_negative() {
        let ticks = FILETIME_UNIX_EPOCH_TICKS as u64 - 5;
        assert_eq!(
            Timespec::from_filetime_ticks(ticks),
            Timespec { sec: -1, nsec: 999_999_500 }
        );
    }

    #[test]
    fn filetime_ticks_round_trip_at_tick_precision() {
        let ts = Timespec::new(1_700_000_000, 123_456_700_i64);
        assert_eq!(Timespec::from_filetime_ticks(ts.to_filetime_ticks()), ts);
    }

    #[test]
    fn system_time_before_epoch() {
        let time = UNIX_EPOCH - Duration::from_millis(1500);
        assert_eq!(
            Timespec::from_system_time(time),
            Timespec { sec: -2, nsec: 500_000_000 }
        );
    }

    #[test]
    fn win32_view_combines_size_halves_and_zeroes_ids() {
        let data = Win32AttributeData {
            file_attributes: 0x20,
            creation_ticks: 0,
            access_ticks: FILETIME_UNIX_EPOCH_TICKS as u64 + 20_000_000,
            write_ticks: FILETIME_UNIX_EPOCH_TICKS as u64 + 10_000_000,
            size_high: 1,
            size_low: 2,
        };
        let stat = StatT::from_win32(&data);
        assert_eq!(stat.size(), (1 << 32) | 2);
        assert_eq!(stat.dev(), 0);
        assert_eq!(stat.ino(), 0);
        assert_eq!(stat.nlink(), 0);
        assert_eq!(stat.uid(), 0);
        assert_eq!(stat.gid(), 0);
        assert_eq!(stat.rdev(), 0);
        assert_eq!(stat.atim(), Timespec { sec: 2, nsec: 0 });
        assert_eq!(stat.mtim(), Timespec { sec: 1, nsec: 0 });
        assert_eq!(stat.ctim(), stat.mtim());
    }

    #[cfg(unix)]
    #[test]
    fn unix_view_reflects_lstat() {
        use std::os::unix::fs::MetadataExt;

        let dir = tempfile::tempdir().expect("tempdir");
        let file = dir.path().join("f");
        std::fs::write(&file, b"hello").expect("write");
        let metadata = std::fs::symlink_metadata(&file).expect("lstat");
        let stat = StatT::from_metadata(&metadata);
        assert_eq!(stat.size(), 5);
        assert_eq!(stat.ino(), metadata.ino());
        assert_eq!(stat.mtim().sec, metadata.mtime());
    }
}
