//! ucl/decode.rs
//!
//! NRV2E bitstream decoder.
//!
//! Design notes:
//! - Bits are consumed MSB-first from a one-byte buffer that is refilled from the
//!   same cursor literal bytes are read from, so bits and bytes interleave.
//! - All decoder state (bit cursor, last match offset, output) lives in a
//!   `DecodeContext` owned by a single call.
//! - Match copies run byte by byte: source and destination may overlap, which is
//!   how runs are expanded.

use crate::constants::UCL_MAX_BLOCK_SIZE;
use crate::ucl::types::DecodeError;

/// Largest offset code accepted while it is being assembled.
const MAX_OFFSET_CODE: u32 = 0x00FF_FFFF + 3;
/// Offset value that terminates the stream.
const END_OF_STREAM: u32 = 0xFFFF_FFFF;
/// Matches further back than this get one extra byte.
const FAR_OFFSET: u32 = 0x500;

struct BitReader<'a> {
    src: &'a [u8],
    pos: usize,
    buf: u8,
    left: u8,
}

impl<'a> BitReader<'a> {
    fn new(src: &'a [u8]) -> Self {
        Self { src, pos: 0, buf: 0, left: 0 }
    }

    #[inline]
    fn byte(&mut self) -> Result<u8, DecodeError> {
        let b = *self.src.get(self.pos).ok_or(DecodeError::InputOverrun { pos: self.pos })?;
        self.pos += 1;
        Ok(b)
    }

    #[inline]
    fn bit(&mut self) -> Result<u32, DecodeError> {
        if self.left == 0 {
            self.buf = self.byte()?;
            self.left = 8;
        }
        self.left -= 1;
        Ok(u32::from((self.buf >> self.left) & 1))
    }
}

struct DecodeContext<'a> {
    bits: BitReader<'a>,
    last_m_off: u32,
    dst: Vec<u8>,
    limit: usize,
}

impl<'a> DecodeContext<'a> {
    fn new(src: &'a [u8], limit: usize) -> Self {
        Self {
            bits: BitReader::new(src),
            last_m_off: 1,
            dst: Vec::new(),
            limit,
        }
    }

    #[inline]
    fn push_literal(&mut self, b: u8) -> Result<(), DecodeError> {
        if self.dst.len() >= self.limit {
            return Err(DecodeError::OutputOverrun { limit: self.limit });
        }
        self.dst.push(b);
        Ok(())
    }

    /// Interleaved gamma code used for match offsets.
    fn offset_code(&mut self) -> Result<u32, DecodeError> {
        let mut m_off: u32 = 1;
        loop {
            m_off = m_off * 2 + self.bits.bit()?;
            if m_off > MAX_OFFSET_CODE {
                return Err(DecodeError::LookbehindOverrun { distance: m_off, produced: self.dst.len() });
            }
            if self.bits.bit()? == 1 {
                return Ok(m_off);
            }
            m_off = (m_off - 1) * 2 + self.bits.bit()?;
        }
    }

    /// Plain gamma code used for long match lengths.
    fn length_code(&mut self) -> Result<u32, DecodeError> {
        let mut m_len: u32 = 1;
        loop {
            let bit = self.bits.bit()?;
            m_len = match m_len.checked_mul(2) {
                Some(v) if v as usize <= self.limit => v | bit,
                _ => return Err(DecodeError::OutputOverrun { limit: self.limit }),
            };
            if m_len as usize > self.limit {
                return Err(DecodeError::OutputOverrun { limit: self.limit });
            }
            if self.bits.bit()? == 1 {
                return Ok(m_len);
            }
        }
    }

    /// Decode until the end-of-stream marker.
    fn run(&mut self) -> Result<(), DecodeError> {
        loop {
            while self.bits.bit()? == 1 {
                let b = self.bits.byte()?;
                self.push_literal(b)?;
            }

            let code = self.offset_code()?;
            let (m_off, short_len) = if code == 2 {
                (self.last_m_off, self.bits.bit()?)
            } else {
                let raw = (code - 3) * 256 + u32::from(self.bits.byte()?);
                if raw == END_OF_STREAM {
                    return Ok(());
                }
                let off = (raw >> 1) + 1;
                self.last_m_off = off;
                (off, (raw ^ 0xFFFF_FFFF) & 1)
            };

            let mut m_len = if short_len != 0 {
                1 + self.bits.bit()?
            } else if self.bits.bit()? == 1 {
                3 + self.bits.bit()?
            } else {
                self.length_code()?.saturating_add(3)
            };
            if m_off > FAR_OFFSET {
                m_len = m_len.saturating_add(1);
            }

            self.copy_match(m_off, m_len)?;
        }
    }

    /// Copy `m_len + 1` bytes starting `m_off` bytes back from the end.
    fn copy_match(&mut self, m_off: u32, m_len: u32) -> Result<(), DecodeError> {
        let produced = self.dst.len();
        if m_off as usize > produced {
            return Err(DecodeError::LookbehindOverrun { distance: m_off, produced });
        }
        let count = m_len as usize + 1;
        if produced + count > self.limit {
            return Err(DecodeError::OutputOverrun { limit: self.limit });
        }

        let mut pos = produced - m_off as usize;
        for _ in 0..count {
            let b = self.dst[pos];
            self.dst.push(b);
            pos += 1;
        }
        Ok(())
    }
}

/// Decompress one NRV2E stream, bounded by the largest legal block size.
pub fn decompress(src: &[u8]) -> Result<Vec<u8>, DecodeError> {
    decompress_bounded(src, UCL_MAX_BLOCK_SIZE as usize)
}

/// Decompress one NRV2E stream, failing once more than `limit` bytes would be produced.
pub fn decompress_bounded(src: &[u8], limit: usize) -> Result<Vec<u8>, DecodeError> {
    let mut ctx = DecodeContext::new(src, limit);
    ctx.run()?;
    log::trace!("nrv2e: {} -> {} bytes", ctx.bits.pos, ctx.dst.len());
    Ok(ctx.dst)
}
