//! Wire-level constants shared by the package, UCL and USB layers.
//!
//! Everything here is fixed by the on-disk formats or by the boot ROM of the
//! X1000 family; none of it is negotiated at runtime.

use std::time::Duration;

/// UCL container magic (`\0\xe9UCL\xff\x01\x1a`).
pub const UCL_MAGIC: [u8; 8] = [0x00, 0xE9, 0x55, 0x43, 0x4C, 0xFF, 0x01, 0x1A];
/// The only supported UCL method (NRV2E, 8-bit bit buffer).
pub const UCL_METHOD_NRV2E: u8 = 0x2E;
/// Fixed UCL header length: magic, flags, method, level, block size.
pub const UCL_HEADER_LEN: usize = 18;
pub const UCL_MIN_BLOCK_SIZE: u32 = 1024;
pub const UCL_MAX_BLOCK_SIZE: u32 = 8 * 1024 * 1024;

/// Tar geometry.
pub mod tar_layout {
    pub const BLOCK_SIZE: usize = 512;
    pub const NAME_OFFSET: usize = 0;
    pub const NAME_LEN: usize = 100;
    pub const SIZE_OFFSET: usize = 124;
    pub const SIZE_LEN: usize = 12;
    pub const CHKSUM_OFFSET: usize = 148;
    pub const CHKSUM_LEN: usize = 8;
    pub const TYPEFLAG_OFFSET: usize = 156;
}

/// Embedded binary header markers.
pub mod binhdr {
    pub const BEGIN: [u8; 8] = *b"BEGINHDR";
    pub const END: [u8; 4] = *b"ENDH";
    pub const LOAD: [u8; 4] = *b"LOAD";
    /// Bytes searched for the `BEGINHDR` marker.
    pub const SEARCH_WINDOW: usize = 128;
    /// First candidate offset for the marker; candidates step by 4.
    pub const SEARCH_START: usize = 8;
    pub const SEARCH_ALIGN: usize = 4;
    /// Bytes scanned for records after the marker.
    pub const RECORD_WINDOW: usize = 256;
    pub const RECORD_LEN: usize = 8;
}

/// Ingenic boot ROM vendor requests and addresses.
pub mod usb {
    use super::Duration;

    pub const VENDOR_ID: u16 = 0xA108;
    pub const PRODUCT_ID: u16 = 0x1000;
    pub const INTERFACE: u8 = 0;
    pub const BULK_OUT_ENDPOINT: u8 = 0x01;

    /// bmRequestType: host-to-device, vendor, device recipient.
    pub const REQUEST_TYPE_VENDOR_OUT: u8 = 0x40;

    pub const SPL_LOAD_ADDR: u32 = 0xF400_1000;
    /// SPL entry point; the first 0x800 bytes hold its header and stack.
    pub const SPL_EXEC_ADDR: u32 = 0xF400_1800;
    pub const BOOTLOADER_LOAD_ADDR: u32 = 0x8000_4000;

    /// Time the SPL needs to bring its own USB stack up.
    pub const SETTLE_DELAY: Duration = Duration::from_millis(500);
}

/// Entry names inside a bootloader package.
pub mod entries {
    pub const VERSION: &str = "bootloader-info.txt";
    pub const SPL_PREFIX: &str = "spl.";
    pub const BOOTLOADER: &str = "bootloader2.ucl";
    pub const BOOTLOADER_LEGACY: &str = "bootloader.ucl";
}
