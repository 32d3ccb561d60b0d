use std::ffi::c_void;
use std::io;
use std::path::Path;
use std::ptr;
use std::slice;

use windows_sys::Win32::Foundation::{ERROR_SUCCESS, LocalFree};
use windows_sys::Win32::Security::Authorization::{
    ConvertSecurityDescriptorToStringSecurityDescriptorW, GetNamedSecurityInfoW, SDDL_REVISION_1,
    SE_FILE_OBJECT, SetNamedSecurityInfoW,
};
use windows_sys::Win32::Security::{
    DACL_SECURITY_INFORMATION, GROUP_SECURITY_INFORMATION, GetSecurityDescriptorControl,
    GetSecurityDescriptorDacl, GetSecurityDescriptorGroup, GetSecurityDescriptorLength,
    GetSecurityDescriptorOwner, IsValidSecurityDescriptor, OWNER_SECURITY_INFORMATION,
    PROTECTED_DACL_SECURITY_INFORMATION, UNPROTECTED_DACL_SECURITY_INFORMATION,
};

use super::{check_bool, to_wide};

const SE_DACL_PROTECTED: u16 = 0x1000;
const MIN_DESCRIPTOR_LEN: usize = 20;

/// Memory returned by an API that must be released with `LocalFree`.
struct LocalBuffer(*mut c_void);

impl Drop for LocalBuffer {
    fn drop(&mut self) {
        if !self.0.is_null() {
            // SAFETY: the pointer came from a LocalAlloc-based API.
            unsafe {
                LocalFree(self.0);
            }
        }
    }
}

/// A self-relative descriptor copied into pointer-aligned storage.
struct AlignedDescriptor(Vec<u64>);

impl AlignedDescriptor {
    fn new(raw: &[u8]) -> io::Result<Self> {
        if raw.len() < MIN_DESCRIPTOR_LEN {
            return Err(invalid_descriptor());
        }
        let mut words = vec![0u64; raw.len().div_ceil(8)];
        // SAFETY: `words` spans at least `raw.len()` bytes.
        unsafe {
            ptr::copy_nonoverlapping(raw.as_ptr(), words.as_mut_ptr().cast::<u8>(), raw.len());
        }
        let descriptor = Self(words);
        // SAFETY: the pointer refers to initialised memory owned by `descriptor`.
        if unsafe { IsValidSecurityDescriptor(descriptor.as_ptr()) } == 0 {
            return Err(invalid_descriptor());
        }
        Ok(descriptor)
    }

    fn as_ptr(&self) -> *mut c_void {
        self.0.as_ptr().cast_mut().cast()
    }
}

fn invalid_descriptor() -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, "invalid security descriptor")
}

fn win32_result(code: u32) -> io::Result<()> {
    if code == ERROR_SUCCESS {
        Ok(())
    } else {
        Err(io::Error::from_raw_os_error(code as i32))
    }
}

/// Returns the self-relative security descriptor (owner, group and DACL)
/// of `path`.
pub fn security_descriptor(path: &Path) -> io::Result<Vec<u8>> {
    let wide = to_wide(path)?;
    let mut descriptor = ptr::null_mut();
    // SAFETY: `wide` is NUL-terminated; only the descriptor out-pointer is
    // requested and it is released by `LocalBuffer`.
    let code = unsafe {
        GetNamedSecurityInfoW(
            wide.as_ptr(),
            SE_FILE_OBJECT,
            OWNER_SECURITY_INFORMATION | GROUP_SECURITY_INFORMATION | DACL_SECURITY_INFORMATION,
            ptr::null_mut(),
            ptr::null_mut(),
            ptr::null_mut(),
            ptr::null_mut(),
            &mut descriptor,
        )
    };
    win32_result(code)?;
    let guard = LocalBuffer(descriptor);
    // SAFETY: the descriptor is valid until `guard` drops.
    let len = unsafe { GetSecurityDescriptorLength(guard.0) } as usize;
    // SAFETY: a self-relative descriptor is `len` contiguous bytes.
    let bytes = unsafe { slice::from_raw_parts(guard.0.cast::<u8>(), len) };
    Ok(bytes.to_vec())
}

/// Applies the owner, group and DACL present in `raw` to `path`.
pub fn set_security_descriptor(path: &Path, raw: &[u8]) -> io::Result<()> {
    let descriptor = AlignedDescriptor::new(raw)?;
    let sd = descriptor.as_ptr();

    let mut owner = ptr::null_mut();
    let mut group = ptr::null_mut();
    let mut dacl = ptr::null_mut();
    let mut defaulted = 0;
    let mut dacl_present = 0;
    let mut control = 0u16;
    let mut revision = 0u32;
    // SAFETY: `sd` is a validated descriptor; every out-pointer is a local.
    unsafe {
        check_bool(GetSecurityDescriptorOwner(sd, &mut owner, &mut defaulted))?;
        check_bool(GetSecurityDescriptorGroup(sd, &mut group, &mut defaulted))?;
        check_bool(GetSecurityDescriptorDacl(
            sd,
            &mut dacl_present,
            &mut dacl,
            &mut defaulted,
        ))?;
        check_bool(GetSecurityDescriptorControl(sd, &mut control, &mut revision))?;
    }

    let mut info = 0;
    if !owner.is_null() {
        info |= OWNER_SECURITY_INFORMATION;
    }
    if !group.is_null() {
        info |= GROUP_SECURITY_INFORMATION;
    }
    if dacl_present != 0 {
        info |= DACL_SECURITY_INFORMATION;
        info |= if control & SE_DACL_PROTECTED != 0 {
            PROTECTED_DACL_SECURITY_INFORMATION
        } else {
            UNPROTECTED_DACL_SECURITY_INFORMATION
        };
    }
    if info == 0 {
        return Ok(());
    }

    let mut wide = to_wide(path)?;
    // SAFETY: the owner, group and DACL pointers point into `descriptor`,
    // which outlives the call.
    let code = unsafe {
        SetNamedSecurityInfoW(
            wide.as_mut_ptr(),
            SE_FILE_OBJECT,
            info,
            owner,
            group,
            dacl,
            ptr::null(),
        )
    };
    win32_result(code)
}

/// Renders a self-relative descriptor as an SDDL string.
pub fn descriptor_to_sddl(raw: &[u8]) -> io::Result<String> {
    let descriptor = AlignedDescriptor::new(raw)?;
    let mut sddl = ptr::null_mut();
    let mut len = 0u32;
    // SAFETY: `descriptor` is valid; the string is released by `LocalBuffer`.
    check_bool(unsafe {
        ConvertSecurityDescriptorToStringSecurityDescriptorW(
            descriptor.as_ptr(),
            SDDL_REVISION_1,
            OWNER_SECURITY_INFORMATION | GROUP_SECURITY_INFORMATION | DACL_SECURITY_INFORMATION,
            &mut sddl,
            &mut len,
        )
    })?;
    let guard = LocalBuffer(sddl.cast());
    // SAFETY: `len` counts UTF-16 units including the terminator.
    let units = unsafe { slice::from_raw_parts(sddl.cast_const(), len as usize) };
    let text = String::from_utf16_lossy(units);
    drop(guard);
    Ok(text.trim_end_matches('\0').to_owned())
}
