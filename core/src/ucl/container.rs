//! ucl/container.rs
//!
//! UCL container unpacking.
//!
//! Layout (all integers big-endian):
//! - 0..8   magic
//! - 8..12  flags (ignored)
//! - 12     method, must be NRV2E
//! - 13     level (ignored)
//! - 14..18 block size, 1 KiB ..= 8 MiB
//! - then `(out_len, in_len, payload[in_len])` blocks until `out_len == 0`

use byteorder::{BigEndian, ByteOrder};

use crate::constants::{UCL_HEADER_LEN, UCL_MAGIC, UCL_MAX_BLOCK_SIZE, UCL_METHOD_NRV2E, UCL_MIN_BLOCK_SIZE};
use crate::ucl::decode::decompress_bounded;
use crate::ucl::types::{BlockRef, UclError, UclHeader, UnpackStats};

/// Parse and validate the fixed 18-byte header.
pub fn parse_header(src: &[u8]) -> Result<UclHeader, UclError> {
    if src.len() < UCL_HEADER_LEN {
        return Err(UclError::Truncated { offset: 0, need: UCL_HEADER_LEN, have: src.len() });
    }

    let mut magic = [0u8; 8];
    magic.copy_from_slice(&src[0..8]);
    if magic != UCL_MAGIC {
        return Err(UclError::BadMagic { have: magic });
    }

    let header = UclHeader {
        magic,
        flags: BigEndian::read_u32(&src[8..12]),
        method: src[12],
        level: src[13],
        block_size: BigEndian::read_u32(&src[14..18]),
    };

    if header.method != UCL_METHOD_NRV2E {
        return Err(UclError::UnsupportedMethod { method: header.method });
    }
    if !(UCL_MIN_BLOCK_SIZE..=UCL_MAX_BLOCK_SIZE).contains(&header.block_size) {
        return Err(UclError::InvalidBlockSize { block_size: header.block_size });
    }

    Ok(header)
}

#[inline]
fn read_be32(src: &[u8], offset: usize) -> Result<u32, UclError> {
    match src.get(offset..offset + 4) {
        Some(b) => Ok(BigEndian::read_u32(b)),
        None => Err(UclError::Truncated { offset, need: 4, have: src.len().saturating_sub(offset) }),
    }
}

/// Walk the block table without decoding anything.
///
/// Every length invariant (`0 < in_len <= out_len <= block_size`) and every
/// payload bound is checked here, so a bad block anywhere in the container
/// fails before the first block is decoded.
pub fn scan_blocks(src: &[u8], header: &UclHeader) -> Result<Vec<BlockRef>, UclError> {
    let mut blocks = Vec::new();
    let mut offset = UCL_HEADER_LEN;

    loop {
        let out_len = read_be32(src, offset)?;
        offset += 4;
        if out_len == 0 {
            break;
        }

        let in_len = read_be32(src, offset)?;
        offset += 4;
        if in_len == 0 || in_len > out_len || out_len > header.block_size {
            return Err(UclError::InvalidBlockLengths {
                block: blocks.len(),
                out_len,
                in_len,
                block_size: header.block_size,
            });
        }

        let have = src.len() - offset;
        if have < in_len as usize {
            return Err(UclError::Truncated { offset, need: in_len as usize, have });
        }

        blocks.push(BlockRef { out_len, in_len, offset });
        offset += in_len as usize;
    }

    Ok(blocks)
}

/// Unpack a whole container into one buffer.
pub fn unpack(src: &[u8]) -> Result<Vec<u8>, UclError> {
    unpack_with_stats(src).map(|(out, _)| out)
}

/// Unpack a whole container, also reporting block and byte counts.
pub fn unpack_with_stats(src: &[u8]) -> Result<(Vec<u8>, UnpackStats), UclError> {
    let header = parse_header(src)?;
    let blocks = scan_blocks(src, &header)?;

    let mut out = Vec::new();
    let mut stats = UnpackStats::default();

    for (i, block) in blocks.iter().enumerate() {
        let payload = block.payload(src);
        stats.bytes_in += u64::from(block.in_len);

        if block.is_stored() {
            out.extend_from_slice(payload);
            stats.blocks_stored += 1;
        } else {
            let decoded = decompress_bounded(payload, header.block_size as usize)
                .map_err(|source| UclError::Decode { block: i, source })?;
            if decoded.len() != block.out_len as usize {
                return Err(UclError::OutputLengthMismatch {
                    block: i,
                    expected: block.out_len as usize,
                    actual: decoded.len(),
                });
            }
            out.extend_from_slice(&decoded);
            stats.blocks_compressed += 1;
        }
        log::debug!("ucl: block {} ({} -> {} bytes, stored: {})", i, block.in_len, block.out_len, block.is_stored());
    }

    stats.bytes_out = out.len() as u64;
    Ok((out, stats))
}
