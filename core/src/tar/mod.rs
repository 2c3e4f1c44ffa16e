//! tar/mod.rs
//! Reader for the tar subset used as the bootloader package container.
//!
//! Notes:
//! - Only plain ustar/v7 headers are understood; no long names, no PAX/GNU records.
//! - Each header's checksum is verified before any of its fields are trusted.
//! - A header whose checksum field starts with NUL ends the archive.
//! - Lookups return `Lookup::Absent` for a missing entry so callers can tell
//!   "not there" apart from "corrupt".

pub mod types;
pub mod decode;
pub mod archive;

pub use types::*;
pub use decode::*;
pub use archive::*;
