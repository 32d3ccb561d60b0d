#![deny(missing_docs)]

//! # Overview
//!
//! `platform` isolates the operating system calls the attrkeep workspace
//! needs behind safe functions. Everything `unsafe` lives here so the
//! metadata crate can keep `#![deny(unsafe_code)]`.
//!
//! # Design
//!
//! - [`ntstatus`] classifies NT status codes returned by the EA kernel calls.
//!   It is plain integer logic and compiles on every target.
//! - [`path`] holds the Windows path rules (alternate data streams, drive
//!   roots, extended-length prefixes) as string functions, again portable.
//! - `windows` (Windows only) wraps the Win32 and NT entry points: EA
//!   query/set, file attributes, EFS, creation time and security
//!   descriptors. Handles are owned through [`std::os::windows::io::OwnedHandle`].

pub mod ntstatus;
pub mod path;

#[cfg(windows)]
pub mod windows;
