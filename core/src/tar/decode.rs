//! tar/decode.rs
//!
//! Header block decoding.
//!
//! Design notes:
//! - The checksum is the unsigned sum of all 512 header bytes, with the 8-byte
//!   checksum field counted as ASCII spaces.
//! - Octal fields may be padded with leading spaces and end at the first NUL or
//!   space; any other non-octal byte is an error.
//! - End of archive is signalled by a NUL first checksum byte, not by the two
//!   zero blocks the full tar format uses. Package generators rely on this.

use crate::constants::tar_layout::{
    BLOCK_SIZE, CHKSUM_LEN, CHKSUM_OFFSET, NAME_LEN, NAME_OFFSET, SIZE_LEN, SIZE_OFFSET, TYPEFLAG_OFFSET,
};
use crate::tar::types::{EntryType, TarError, TarHeader};
use crate::utils::until_nul;

/// Parse an octal ASCII field.
///
/// `offset` is the header offset, only used for error context.
pub fn parse_octal(field: &[u8], offset: usize) -> Result<u64, TarError> {
    let digits = match field.iter().position(|&c| c != b' ') {
        Some(start) => &field[start..],
        None => return Ok(0),
    };

    let mut n: u64 = 0;
    for &c in digits {
        if c == 0 || c == b' ' {
            break;
        }
        if !(b'0'..=b'7').contains(&c) {
            return Err(TarError::InvalidOctal { offset, field: field.to_vec() });
        }
        // 12 octal digits fit in 36 bits, so this cannot overflow for real fields.
        n = n.checked_mul(8).and_then(|v| v.checked_add(u64::from(c - b'0')))
            .ok_or_else(|| TarError::InvalidOctal { offset, field: field.to_vec() })?;
    }
    Ok(n)
}

/// Sum of the header bytes with the checksum field read as spaces.
pub fn header_checksum(block: &[u8]) -> u32 {
    let chksum = CHKSUM_OFFSET..CHKSUM_OFFSET + CHKSUM_LEN;
    block[..BLOCK_SIZE]
        .iter()
        .enumerate()
        .map(|(i, &b)| if chksum.contains(&i) { u32::from(b' ') } else { u32::from(b) })
        .sum()
}

/// Decode the header block at `offset`.
///
/// Returns `Ok(None)` at end of archive: either the cursor sits exactly at the
/// end of the buffer or the header's checksum field starts with NUL.
pub fn parse_header(archive: &[u8], offset: usize) -> Result<Option<TarHeader<'_>>, TarError> {
    let have = archive.len().saturating_sub(offset);
    if have == 0 {
        return Ok(None);
    }
    if have < BLOCK_SIZE {
        return Err(TarError::TruncatedHeader { offset, have });
    }
    let block = &archive[offset..offset + BLOCK_SIZE];

    if block[CHKSUM_OFFSET] == 0 {
        return Ok(None);
    }

    let stored = parse_octal(&block[CHKSUM_OFFSET..CHKSUM_OFFSET + CHKSUM_LEN], offset)?;
    let computed = header_checksum(block);
    if stored != u64::from(computed) {
        return Err(TarError::ChecksumMismatch {
            offset,
            stored: u32::try_from(stored).unwrap_or(u32::MAX),
            computed,
        });
    }

    let name = until_nul(&block[NAME_OFFSET..NAME_OFFSET + NAME_LEN]);
    let size = parse_octal(&block[SIZE_OFFSET..SIZE_OFFSET + SIZE_LEN], offset)?;
    let size = usize::try_from(size).map_err(|_| TarError::EntryOutOfBounds {
        name: String::from_utf8_lossy(name).into_owned(),
        offset,
        size: usize::MAX,
        archive_len: archive.len(),
    })?;

    Ok(Some(TarHeader {
        name,
        size,
        entry_type: EntryType::from_flag(block[TYPEFLAG_OFFSET]),
        checksum: computed,
    }))
}
