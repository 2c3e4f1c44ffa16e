use std::fmt;
use num_enum::TryFromPrimitive;

/// CRC32 (IEEE) of an image, used for package summaries.
pub fn compute_crc32(data: &[u8]) -> u32 {
    use crc32fast::Hasher;
    let mut hasher = Hasher::new();
    hasher.update(data);
    hasher.finalize()
}

pub fn enum_name_or_hex<T>(raw: T::Primitive) -> String
where
    T: TryFromPrimitive + fmt::Debug,
    T::Primitive: fmt::LowerHex,
{
    match T::try_from_primitive(raw) {
        Ok(variant) => format!("{:?}", variant),
        Err(_) => format!("0x{:x}", raw),
    }
}

/// Printable ASCII is shown quoted, anything else as hex.
pub fn fmt_bytes(b: &[u8]) -> String {
    if !b.is_empty() && b.iter().all(|&c| c.is_ascii_graphic() || c == b' ') {
        format!("b\"{}\"", String::from_utf8_lossy(b))
    } else {
        format!("0x{}", hex::encode(b))
    }
}

/// Round `n` up to the next multiple of `block` (which must be non-zero).
#[inline]
pub fn round_up(n: usize, block: usize) -> Option<usize> {
    match n % block {
        0 => Some(n),
        rem => n.checked_add(block - rem),
    }
}

/// Slice up to (not including) the first NUL, or the whole slice.
#[inline]
pub fn until_nul(b: &[u8]) -> &[u8] {
    match b.iter().position(|&c| c == 0) {
        Some(end) => &b[..end],
        None => b,
    }
}
