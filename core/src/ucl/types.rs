//! ucl/types.rs
//! Container header, block table entries and error types.

use thiserror::Error;

use crate::types::ErrorKind;
use crate::utils::fmt_bytes;

/// Fixed 18-byte UCL header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UclHeader {
    pub magic: [u8; 8],
    pub flags: u32,
    pub method: u8,
    pub level: u8,
    pub block_size: u32,
}

/// One entry of the block table, with the payload location inside the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockRef {
    pub out_len: u32,
    pub in_len: u32,
    pub offset: usize,
}

impl BlockRef {
    /// A block whose payload is as long as its output is stored verbatim.
    #[inline]
    pub fn is_stored(&self) -> bool {
        self.in_len == self.out_len
    }

    #[inline]
    pub fn payload<'a>(&self, src: &'a [u8]) -> &'a [u8] {
        &src[self.offset..self.offset + self.in_len as usize]
    }
}

/// Per-unpack counters, folded into telemetry by the package loader.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UnpackStats {
    pub blocks_stored: u64,
    pub blocks_compressed: u64,
    pub bytes_in: u64,
    pub bytes_out: u64,
}

/// Bitstream-level failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("input overrun at byte {pos}")]
    InputOverrun { pos: usize },

    #[error("lookbehind overrun: distance {distance} with {produced} bytes produced")]
    LookbehindOverrun { distance: u32, produced: usize },

    #[error("output overrun: stream produces more than {limit} bytes")]
    OutputOverrun { limit: usize },
}

impl DecodeError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DecodeError::InputOverrun { .. } => ErrorKind::TruncatedInput,
            DecodeError::LookbehindOverrun { .. } | DecodeError::OutputOverrun { .. } => ErrorKind::CorruptStream,
        }
    }
}

/// Container-level failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UclError {
    #[error("truncated container at byte {offset}: need {need} bytes, have {have}")]
    Truncated { offset: usize, need: usize, have: usize },

    #[error("invalid magic: {}", fmt_bytes(.have))]
    BadMagic { have: [u8; 8] },

    #[error("unsupported method 0x{method:02x}")]
    UnsupportedMethod { method: u8 },

    #[error("invalid block size {block_size}")]
    InvalidBlockSize { block_size: u32 },

    #[error("block {block}: invalid lengths (out {out_len}, in {in_len}, block size {block_size})")]
    InvalidBlockLengths { block: usize, out_len: u32, in_len: u32, block_size: u32 },

    #[error("block {block}: {source}")]
    Decode { block: usize, #[source] source: DecodeError },

    #[error("block {block}: decompressed {actual} bytes, expected {expected}")]
    OutputLengthMismatch { block: usize, expected: usize, actual: usize },
}

impl UclError {
    pub fn kind(&self) -> ErrorKind {
        use UclError::*;
        match self {
            Truncated { .. } => ErrorKind::TruncatedInput,
            BadMagic { .. }
            | UnsupportedMethod { .. }
            | InvalidBlockSize { .. }
            | InvalidBlockLengths { .. } => ErrorKind::MalformedContainer,
            Decode { source, .. } => source.kind(),
            OutputLengthMismatch { .. } => ErrorKind::CorruptStream,
        }
    }
}
