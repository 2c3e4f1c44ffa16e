//! usbboot/transport.rs
//! The device capability the sequencer drives, and its error type.

use thiserror::Error;

use crate::types::ErrorKind;
use crate::usbboot::protocol::{ControlSetup, VendorRequest};
use crate::utils::enum_name_or_hex;

/// An asynchronous handle to one USB device.
///
/// Implementations perform each call to completion before returning; the
/// sequencer never issues a second call while one is pending.
#[allow(async_fn_in_trait)]
pub trait UsbDevice {
    async fn open(&mut self) -> Result<(), UsbError>;

    async fn claim_interface(&mut self, interface: u8) -> Result<(), UsbError>;

    /// Zero-length host-to-device control transfer.
    async fn control_out(&mut self, setup: ControlSetup) -> Result<(), UsbError>;

    async fn bulk_out(&mut self, endpoint: u8, data: &[u8]) -> Result<(), UsbError>;

    async fn close(&mut self) -> Result<(), UsbError>;
}

/// Transport failures, carried through unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UsbError {
    #[error("no device {vendor_id:04x}:{product_id:04x} found")]
    NoDevice { vendor_id: u16, product_id: u16 },

    #[error("open failed: {0}")]
    Open(String),

    #[error("claim interface {interface} failed: {msg}")]
    Claim { interface: u8, msg: String },

    #[error("control request {} failed: {msg}", enum_name_or_hex::<VendorRequest>(*.request))]
    Control { request: u8, msg: String },

    #[error("bulk transfer to endpoint {endpoint} failed: {msg}")]
    Bulk { endpoint: u8, msg: String },

    #[error("close failed: {0}")]
    Close(String),

    #[error("device not open")]
    NotOpen,

    #[error("boot step out of order: in state {actual}, expected {expected}")]
    OutOfOrder { expected: String, actual: String },
}

impl UsbError {
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::DeviceTransferFailed
    }
}
