//! usbboot/sequencer.rs
//!
//! The two-stage upload/execute sequence.
//!
//! ```text
//! Idle -> Stage1Sent -> Stage1Started -> (settle) -> Stage2Sent -> Stage2Started
//!   \__________\______________\______________________\______> Failed
//! ```
//!
//! Each `send` is SET_DATA_ADDRESS, SET_DATA_LENGTH, then one bulk transfer.
//! Execution requests are only issued after the preceding transfer completed.

use std::fmt;

use crate::binhdr;
use crate::usbboot::protocol::{BootConfig, ControlSetup, VendorRequest};
use crate::usbboot::transport::{UsbDevice, UsbError};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BootState {
    Idle,
    Stage1Sent,
    Stage1Started,
    Stage2Sent,
    Stage2Started,
    Failed,
}

impl fmt::Display for BootState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BootState::Idle          => "idle",
            BootState::Stage1Sent    => "stage1-sent",
            BootState::Stage1Started => "stage1-started",
            BootState::Stage2Sent    => "stage2-sent",
            BootState::Stage2Started => "stage2-started",
            BootState::Failed        => "failed",
        };
        f.write_str(name)
    }
}

/// Address the main bootloader is loaded and started at.
pub fn stage2_address(image: &[u8], config: &BootConfig) -> u32 {
    match binhdr::load_address(image) {
        Some(addr) => addr,
        None => config.default_load_addr,
    }
}

/// Drives the vendor requests over a borrowed, already-claimed device.
pub struct Sequencer<'d, D: UsbDevice> {
    device: &'d mut D,
    config: &'d BootConfig,
    state: BootState,
}

impl<'d, D: UsbDevice> Sequencer<'d, D> {
    pub fn new(device: &'d mut D, config: &'d BootConfig) -> Self {
        Self { device, config, state: BootState::Idle }
    }

    pub fn state(&self) -> BootState {
        self.state
    }

    fn advance(&mut self, next: BootState) {
        log::info!("usbboot: {} -> {}", self.state, next);
        self.state = next;
    }

    fn check<T>(&mut self, result: Result<T, UsbError>) -> Result<T, UsbError> {
        if result.is_err() {
            self.advance(BootState::Failed);
        }
        result
    }

    fn expect_state(&mut self, expected: BootState) -> Result<(), UsbError> {
        if self.state != expected {
            let err = UsbError::OutOfOrder { expected: expected.to_string(), actual: self.state.to_string() };
            self.advance(BootState::Failed);
            return Err(err);
        }
        Ok(())
    }

    async fn vendor_request(&mut self, request: VendorRequest, arg: u32) -> Result<(), UsbError> {
        log::debug!("usbboot: {} 0x{:08x}", request.name(), arg);
        self.device.control_out(ControlSetup::vendor(request, arg)).await
    }

    /// SET_DATA_ADDRESS, SET_DATA_LENGTH, bulk transfer.
    pub async fn send(&mut self, address: u32, data: &[u8]) -> Result<(), UsbError> {
        let len = u32::try_from(data.len()).map_err(|_| UsbError::Bulk {
            endpoint: self.config.bulk_endpoint,
            msg: format!("payload of {} bytes does not fit a 32-bit length", data.len()),
        })?;
        self.vendor_request(VendorRequest::SetDataAddress, address).await?;
        self.vendor_request(VendorRequest::SetDataLength, len).await?;
        log::debug!("usbboot: bulk {} bytes to endpoint {}", data.len(), self.config.bulk_endpoint);
        self.device.bulk_out(self.config.bulk_endpoint, data).await
    }

    /// Upload the SPL to on-chip memory and start it.
    pub async fn run_stage1(&mut self, spl: &[u8]) -> Result<(), UsbError> {
        self.expect_state(BootState::Idle)?;

        let (load, exec) = (self.config.spl_load_addr, self.config.spl_exec_addr);
        let sent = self.send(load, spl).await;
        self.check(sent)?;
        self.advance(BootState::Stage1Sent);

        let started = self.vendor_request(VendorRequest::ProgramStart1, exec).await;
        self.check(started)?;
        self.advance(BootState::Stage1Started);
        Ok(())
    }

    /// Upload the main bootloader, flush caches and jump to it.
    /// Returns the address it was loaded at.
    pub async fn run_stage2(&mut self, image: &[u8]) -> Result<u32, UsbError> {
        self.expect_state(BootState::Stage1Started)?;

        let addr = stage2_address(image, self.config);
        log::info!("usbboot: stage2 load address 0x{:08x}", addr);

        let sent = self.send(addr, image).await;
        self.check(sent)?;
        self.advance(BootState::Stage2Sent);

        let flushed = self.vendor_request(VendorRequest::FlushCaches, 0).await;
        self.check(flushed)?;
        let started = self.vendor_request(VendorRequest::ProgramStart2, addr).await;
        self.check(started)?;
        self.advance(BootState::Stage2Started);
        Ok(addr)
    }
}
