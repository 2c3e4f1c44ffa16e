//! Fixture builders shared by the integration tests: tar archives, UCL
//! containers, an NRV2E bitstream writer and boot images with a binary header.

#![allow(dead_code)]

use jzboot_core::constants::{UCL_MAGIC, UCL_METHOD_NRV2E};

// -----------------------------------------------------------------------------
// Tar
// -----------------------------------------------------------------------------

pub const TAR_BLOCK: usize = 512;

fn put_field(block: &mut [u8], offset: usize, value: &[u8]) {
    block[offset..offset + value.len()].copy_from_slice(value);
}

/// One ustar header block with a valid checksum.
pub fn tar_header(name: &str, size: usize, typeflag: u8) -> Vec<u8> {
    let mut block = vec![0u8; TAR_BLOCK];
    put_field(&mut block, 0, name.as_bytes());
    put_field(&mut block, 100, b"0000644\0");
    put_field(&mut block, 108, b"0000000\0");
    put_field(&mut block, 116, b"0000000\0");
    put_field(&mut block, 124, format!("{:011o}\0", size).as_bytes());
    put_field(&mut block, 136, format!("{:011o}\0", 0).as_bytes());
    block[156] = typeflag;
    put_field(&mut block, 257, b"ustar\0");
    put_field(&mut block, 263, b"00");

    put_field(&mut block, 148, b"        ");
    let sum: u32 = block.iter().map(|&b| u32::from(b)).sum();
    put_field(&mut block, 148, format!("{:06o}\0 ", sum).as_bytes());
    block
}

#[derive(Default)]
pub struct TarBuilder {
    buf: Vec<u8>,
}

impl TarBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn file(self, name: &str, data: &[u8]) -> Self {
        self.entry(name, data, b'0')
    }

    pub fn entry(mut self, name: &str, data: &[u8], typeflag: u8) -> Self {
        self.buf.extend_from_slice(&tar_header(name, data.len(), typeflag));
        self.buf.extend_from_slice(data);
        let pad = (TAR_BLOCK - data.len() % TAR_BLOCK) % TAR_BLOCK;
        self.buf.resize(self.buf.len() + pad, 0);
        self
    }

    /// Append the two zero blocks that end a conventional archive.
    pub fn finish(mut self) -> Vec<u8> {
        self.buf.resize(self.buf.len() + 2 * TAR_BLOCK, 0);
        self.buf
    }

    /// Archive that simply stops after the last entry.
    pub fn finish_bare(self) -> Vec<u8> {
        self.buf
    }
}

// -----------------------------------------------------------------------------
// UCL container
// -----------------------------------------------------------------------------

pub const TEST_BLOCK_SIZE: u32 = 256 * 1024;

pub fn ucl_header(method: u8, block_size: u32) -> Vec<u8> {
    let mut out = UCL_MAGIC.to_vec();
    out.extend_from_slice(&0u32.to_be_bytes());
    out.push(method);
    out.push(10);
    out.extend_from_slice(&block_size.to_be_bytes());
    out
}

/// Container from `(out_len, payload)` pairs, terminated by a zero block.
pub fn ucl_container(block_size: u32, blocks: &[(u32, Vec<u8>)]) -> Vec<u8> {
    let mut out = ucl_header(UCL_METHOD_NRV2E, block_size);
    for (out_len, payload) in blocks {
        out.extend_from_slice(&out_len.to_be_bytes());
        out.extend_from_slice(&(payload.len() as u32).to_be_bytes());
        out.extend_from_slice(payload);
    }
    out.extend_from_slice(&0u32.to_be_bytes());
    out
}

/// Container holding `data` as stored blocks of at most `block_size` bytes.
pub fn stored_container(data: &[u8], block_size: u32) -> Vec<u8> {
    let blocks: Vec<(u32, Vec<u8>)> = data
        .chunks(block_size as usize)
        .map(|chunk| (chunk.len() as u32, chunk.to_vec()))
        .collect();
    ucl_container(block_size, &blocks)
}

// -----------------------------------------------------------------------------
// NRV2E writer
// -----------------------------------------------------------------------------

/// Emits an NRV2E bitstream by hand. Bits go MSB-first into a flag byte that is
/// reserved in the output at the point the decoder will fetch it.
#[derive(Default)]
pub struct Nrv2eWriter {
    out: Vec<u8>,
    bit_byte: usize,
    bits_used: u8,
    started: bool,
}

impl Nrv2eWriter {
    pub fn new() -> Self {
        Self::default()
    }

    fn bit(&mut self, b: u32) {
        if !self.started || self.bits_used == 8 {
            self.out.push(0);
            self.bit_byte = self.out.len() - 1;
            self.bits_used = 0;
            self.started = true;
        }
        if b & 1 == 1 {
            self.out[self.bit_byte] |= 0x80 >> self.bits_used;
        }
        self.bits_used += 1;
    }

    fn byte(&mut self, b: u8) {
        self.out.push(b);
    }

    /// Interleaved gamma code (offset codes), `v >= 2`.
    fn gamma(&mut self, v: u32) {
        let mut digits = Vec::new();
        let mut m = v;
        while m > 3 {
            digits.push(m % 4);
            m = m / 4 + 1;
        }
        self.bit(m - 2);
        for d in digits.into_iter().rev() {
            self.bit(0);
            self.bit(d >> 1);
            self.bit(d & 1);
        }
        self.bit(1);
    }

    /// Plain gamma code (long match lengths), `v >= 2`.
    fn gamma2(&mut self, v: u32) {
        let width = 32 - v.leading_zeros();
        for i in (0..width - 1).rev() {
            self.bit((v >> i) & 1);
            self.bit(u32::from(i == 0));
        }
    }

    fn length(&mut self, code: u32) {
        if code >= 3 {
            if code <= 4 {
                self.bit(1);
                self.bit(code - 3);
            } else {
                self.bit(0);
                self.gamma2(code - 3);
            }
        }
    }

    pub fn literal(&mut self, b: u8) -> &mut Self {
        self.bit(1);
        self.byte(b);
        self
    }

    pub fn literals(&mut self, bytes: &[u8]) -> &mut Self {
        for &b in bytes {
            self.literal(b);
        }
        self
    }

    /// Copy `n` bytes from `off` bytes back.
    pub fn copy(&mut self, off: u32, n: u32) -> &mut Self {
        let far = u32::from(off > 0x500);
        let code = n - 1 - far;
        assert!(code >= 1, "match too short for offset {}", off);
        let low = if code <= 2 { 0 } else { 1 };
        let raw = ((off - 1) << 1) | low;

        self.bit(0);
        self.gamma((raw >> 8) + 3);
        self.byte((raw & 0xFF) as u8);
        if code <= 2 {
            self.bit(code - 1);
        } else {
            self.length(code);
        }
        self
    }

    /// Copy `n` bytes reusing the previous match offset (`off` is that offset).
    pub fn copy_last(&mut self, off: u32, n: u32) -> &mut Self {
        let far = u32::from(off > 0x500);
        let code = n - 1 - far;
        assert!(code >= 1, "match too short for offset {}", off);

        self.bit(0);
        self.gamma(2);
        if code <= 2 {
            self.bit(1);
            self.bit(code - 1);
        } else {
            self.bit(0);
            self.length(code);
        }
        self
    }

    /// Raw offset code, for streams that are meant to be rejected.
    pub fn raw_match(&mut self, code: u32, low_byte: u8) -> &mut Self {
        self.bit(0);
        self.gamma(code);
        self.byte(low_byte);
        self
    }

    pub fn end(&mut self) -> &mut Self {
        self.bit(0);
        self.gamma(0x00FF_FFFF + 3);
        self.byte(0xFF);
        self
    }

    pub fn finish(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.out)
    }
}

/// `head` followed by a run of `run` copies of its last byte, as a stream.
pub fn run_stream(head: &[u8], run: u32) -> Vec<u8> {
    Nrv2eWriter::new().literals(head).copy(1, run).end().finish()
}

// -----------------------------------------------------------------------------
// Boot images
// -----------------------------------------------------------------------------

/// Image of `len` bytes whose binary header advertises `load` (if any).
pub fn boot_image(load: Option<u32>, len: usize) -> Vec<u8> {
    let mut image = vec![0u8; 8];
    image.extend_from_slice(b"BEGINHDR");
    image.extend_from_slice(b"VERS");
    image.extend_from_slice(&7u32.to_le_bytes());
    if let Some(addr) = load {
        image.extend_from_slice(b"LOAD");
        image.extend_from_slice(&addr.to_le_bytes());
    }
    image.extend_from_slice(b"ENDH");
    image.extend_from_slice(&0u32.to_le_bytes());
    let mut fill = 0u8;
    while image.len() < len {
        image.push(fill);
        fill = fill.wrapping_add(13);
    }
    image
}

/// Package archive with the given bootloader entry name.
pub fn package_archive(suffix: &str, version: &[u8], spl: &[u8], boot_entry: &str, boot_ucl: &[u8]) -> Vec<u8> {
    TarBuilder::new()
        .file("bootloader-info.txt", version)
        .file(&format!("spl.{}", suffix), spl)
        .file(boot_entry, boot_ucl)
        .finish()
}
