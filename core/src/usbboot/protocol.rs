//! usbboot/protocol.rs
//! Vendor request codes, control setup packing and boot addresses.

use std::time::Duration;
use num_enum::TryFromPrimitive;

use crate::constants::usb;

/// Boot ROM vendor requests. All are host-to-device with an empty data phase.
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, TryFromPrimitive)]
pub enum VendorRequest {
    SetDataAddress = 1,
    SetDataLength  = 2,
    FlushCaches    = 3,
    ProgramStart1  = 4,
    ProgramStart2  = 5,
}

impl VendorRequest {
    pub fn name(self) -> &'static str {
        match self {
            VendorRequest::SetDataAddress => "SET_DATA_ADDRESS",
            VendorRequest::SetDataLength  => "SET_DATA_LENGTH",
            VendorRequest::FlushCaches    => "FLUSH_CACHES",
            VendorRequest::ProgramStart1  => "PROGRAM_START1",
            VendorRequest::ProgramStart2  => "PROGRAM_START2",
        }
    }
}

/// Setup stage of a zero-length vendor control transfer.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ControlSetup {
    pub request_type: u8,
    pub request: u8,
    pub value: u16,
    pub index: u16,
}

impl ControlSetup {
    /// Pack a 32-bit argument as `value = arg >> 16`, `index = arg & 0xffff`.
    pub fn vendor(request: VendorRequest, arg: u32) -> Self {
        Self {
            request_type: usb::REQUEST_TYPE_VENDOR_OUT,
            request: request as u8,
            value: (arg >> 16) as u16,
            index: (arg & 0xFFFF) as u16,
        }
    }

    /// The 32-bit argument carried in `value:index`.
    pub fn argument(&self) -> u32 {
        (u32::from(self.value) << 16) | u32::from(self.index)
    }
}

/// Addresses, endpoints and timing for one boot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BootConfig {
    pub interface: u8,
    pub bulk_endpoint: u8,
    pub spl_load_addr: u32,
    pub spl_exec_addr: u32,
    /// Stage-2 address used when the image carries no `LOAD` record.
    pub default_load_addr: u32,
    pub settle_delay: Duration,
}

impl Default for BootConfig {
    fn default() -> Self {
        Self {
            interface: usb::INTERFACE,
            bulk_endpoint: usb::BULK_OUT_ENDPOINT,
            spl_load_addr: usb::SPL_LOAD_ADDR,
            spl_exec_addr: usb::SPL_EXEC_ADDR,
            default_load_addr: usb::BOOTLOADER_LOAD_ADDR,
            settle_delay: usb::SETTLE_DELAY,
        }
    }
}

impl BootConfig {
    pub fn with_settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = delay;
        self
    }
}
