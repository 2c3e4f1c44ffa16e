//! tar/types.rs
//! Entry types, parsed headers, lookup results and errors.

use num_enum::FromPrimitive;
use thiserror::Error;

use crate::types::ErrorKind;
use crate::utils::fmt_bytes;

/// Header typeflag byte.
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, FromPrimitive)]
pub enum EntryType {
    Regular   = b'0',
    HardLink  = b'1',
    Symlink   = b'2',
    CharDev   = b'3',
    BlockDev  = b'4',
    Directory = b'5',
    Fifo      = b'6',
    #[num_enum(catch_all)]
    Other(u8),
}

impl EntryType {
    /// Old-style archives leave the typeflag NUL for regular files.
    pub fn from_flag(flag: u8) -> Self {
        match flag {
            0 => EntryType::Regular,
            other => EntryType::from_primitive(other),
        }
    }

    #[inline]
    pub fn is_regular(self) -> bool {
        self == EntryType::Regular
    }
}

/// Fields of one verified 512-byte header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TarHeader<'a> {
    /// Raw name bytes, up to the first NUL.
    pub name: &'a [u8],
    pub size: usize,
    pub entry_type: EntryType,
    pub checksum: u32,
}

impl<'a> TarHeader<'a> {
    pub fn name_lossy(&self) -> String {
        String::from_utf8_lossy(self.name).into_owned()
    }
}

/// A regular entry located inside an archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TarEntry<'a> {
    pub header: TarHeader<'a>,
    /// Offset of the header block from the start of the archive.
    pub header_offset: usize,
    pub data: &'a [u8],
}

/// Result of looking an entry up by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup<'a> {
    Found(&'a [u8]),
    Absent,
}

impl<'a> Lookup<'a> {
    pub fn found(self) -> Option<&'a [u8]> {
        match self {
            Lookup::Found(data) => Some(data),
            Lookup::Absent => None,
        }
    }

    #[inline]
    pub fn is_absent(&self) -> bool {
        matches!(self, Lookup::Absent)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TarError {
    #[error("truncated header at offset {offset}: {have} of 512 bytes")]
    TruncatedHeader { offset: usize, have: usize },

    #[error("header at offset {offset}: checksum mismatch (stored {stored:o}, computed {computed:o})")]
    ChecksumMismatch { offset: usize, stored: u32, computed: u32 },

    #[error("header at offset {offset}: invalid octal digit in {}", fmt_bytes(.field))]
    InvalidOctal { offset: usize, field: Vec<u8> },

    #[error("entry '{name}' ({size} bytes at offset {offset}) extends past end of archive ({archive_len} bytes)")]
    EntryOutOfBounds { name: String, offset: usize, size: usize, archive_len: usize },

    #[error("entry '{name}' is not a regular file ({entry_type:?})")]
    NotARegularFile { name: String, entry_type: EntryType },

    #[error("entry '{name}' not found in archive")]
    EntryNotFound { name: String },
}

impl TarError {
    pub fn kind(&self) -> ErrorKind {
        use TarError::*;
        match self {
            TruncatedHeader { .. }
            | ChecksumMismatch { .. }
            | InvalidOctal { .. }
            | EntryOutOfBounds { .. } => ErrorKind::ArchiveCorrupt,
            NotARegularFile { .. } => ErrorKind::UnsupportedEntryType,
            EntryNotFound { .. } => ErrorKind::EntryNotFound,
        }
    }
}
