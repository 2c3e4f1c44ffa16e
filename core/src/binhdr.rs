//! binhdr.rs
//!
//! Embedded binary header lookup.
//!
//! Bootloader images may carry a small table near their start:
//!
//! ```text
//! "BEGINHDR"  then  (label: [u8; 4], value: u32 LE)*  then  "ENDH"
//! ```
//!
//! The marker is searched at 4-byte aligned offsets from 8 within the first
//! 128 bytes; records are read from the 256 bytes following it.

use byteorder::{ByteOrder, LittleEndian};

use crate::constants::binhdr::{
    BEGIN, END, LOAD, RECORD_LEN, RECORD_WINDOW, SEARCH_ALIGN, SEARCH_START, SEARCH_WINDOW,
};

/// Offset just past the `BEGINHDR` marker, if the image has one.
fn records_start(image: &[u8]) -> Option<usize> {
    let limit = image.len().min(SEARCH_WINDOW).saturating_sub(BEGIN.len() - 1);
    (SEARCH_START..limit)
        .step_by(SEARCH_ALIGN)
        .find(|&off| image[off..off + BEGIN.len()] == BEGIN)
        .map(|off| off + BEGIN.len())
}

/// Value of the first record labelled `label`, or `None` when the image has no
/// header, the header ends first, or the record window runs out.
pub fn find(image: &[u8], label: &[u8; 4]) -> Option<u32> {
    let start = records_start(image)?;
    let end = image.len().min(start + RECORD_WINDOW);

    let mut off = start;
    while off + RECORD_LEN <= end {
        let record = &image[off..off + RECORD_LEN];
        if record[..4] == END {
            return None;
        }
        if &record[..4] == label {
            return Some(LittleEndian::read_u32(&record[4..8]));
        }
        off += RECORD_LEN;
    }
    None
}

/// Load address advertised by an image's `LOAD` record.
#[inline]
pub fn load_address(image: &[u8]) -> Option<u32> {
    find(image, &LOAD)
}
