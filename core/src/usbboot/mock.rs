//! usbboot/mock.rs
//! Recording test doubles for `UsbDevice` and `Timer`.
//!
//! Both doubles append to a shared `OpLog`, so a test sees the device calls and
//! the settle delay in one ordered list.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use num_enum::TryFromPrimitive;

use crate::usbboot::protocol::{ControlSetup, VendorRequest};
use crate::usbboot::timer::Timer;
use crate::usbboot::transport::{UsbDevice, UsbError};

/// One recorded operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Op {
    Open,
    ClaimInterface(u8),
    Control(ControlSetup),
    Bulk { endpoint: u8, len: usize },
    Delay(Duration),
    Close,
}

impl Op {
    /// Protocol-level label: vendor request name, `BULK_TRANSFER`, `DELAY`, ...
    pub fn label(&self) -> &'static str {
        match self {
            Op::Open => "OPEN",
            Op::ClaimInterface(_) => "CLAIM_INTERFACE",
            Op::Control(setup) => VendorRequest::try_from_primitive(setup.request)
                .map(VendorRequest::name)
                .unwrap_or("UNKNOWN_REQUEST"),
            Op::Bulk { .. } => "BULK_TRANSFER",
            Op::Delay(_) => "DELAY",
            Op::Close => "CLOSE",
        }
    }
}

/// Shared, ordered operation log.
#[derive(Debug, Clone, Default)]
pub struct OpLog(Arc<Mutex<Vec<Op>>>);

impl OpLog {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Op>> {
        self.0.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn push(&self, op: Op) {
        self.lock().push(op);
    }

    pub fn ops(&self) -> Vec<Op> {
        self.lock().clone()
    }

    pub fn labels(&self) -> Vec<&'static str> {
        self.lock().iter().map(Op::label).collect()
    }

    pub fn count(&self, label: &str) -> usize {
        self.lock().iter().filter(|op| op.label() == label).count()
    }
}

/// Scripted device. Every call is recorded before its outcome is decided.
#[derive(Debug)]
pub struct MockDevice {
    log: OpLog,
    /// Zero-based index (among non-close device calls) of the call that fails.
    fail_at: Option<usize>,
    fail_close: bool,
    calls: usize,
    open: bool,
    uploads: Vec<Vec<u8>>,
}

impl MockDevice {
    pub fn new(log: OpLog) -> Self {
        Self { log, fail_at: None, fail_close: false, calls: 0, open: false, uploads: Vec::new() }
    }

    /// Fail the `k`-th device call (open and claim count; close does not).
    pub fn failing_at(mut self, k: usize) -> Self {
        self.fail_at = Some(k);
        self
    }

    pub fn failing_close(mut self) -> Self {
        self.fail_close = true;
        self
    }

    /// Payloads of every bulk transfer, in order.
    pub fn uploads(&self) -> &[Vec<u8>] {
        &self.uploads
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    fn record(&mut self, op: Op) -> Result<(), String> {
        self.log.push(op.clone());
        let index = self.calls;
        self.calls += 1;
        if self.fail_at == Some(index) {
            return Err(format!("injected failure at call {} ({})", index, op.label()));
        }
        Ok(())
    }
}

impl UsbDevice for MockDevice {
    async fn open(&mut self) -> Result<(), UsbError> {
        self.record(Op::Open).map_err(UsbError::Open)?;
        self.open = true;
        Ok(())
    }

    async fn claim_interface(&mut self, interface: u8) -> Result<(), UsbError> {
        if !self.open {
            return Err(UsbError::NotOpen);
        }
        self.record(Op::ClaimInterface(interface))
            .map_err(|msg| UsbError::Claim { interface, msg })
    }

    async fn control_out(&mut self, setup: ControlSetup) -> Result<(), UsbError> {
        if !self.open {
            return Err(UsbError::NotOpen);
        }
        self.record(Op::Control(setup))
            .map_err(|msg| UsbError::Control { request: setup.request, msg })
    }

    async fn bulk_out(&mut self, endpoint: u8, data: &[u8]) -> Result<(), UsbError> {
        if !self.open {
            return Err(UsbError::NotOpen);
        }
        self.record(Op::Bulk { endpoint, len: data.len() })
            .map_err(|msg| UsbError::Bulk { endpoint, msg })?;
        self.uploads.push(data.to_vec());
        Ok(())
    }

    async fn close(&mut self) -> Result<(), UsbError> {
        self.log.push(Op::Close);
        self.open = false;
        if self.fail_close {
            return Err(UsbError::Close("injected close failure".into()));
        }
        Ok(())
    }
}

/// Timer that records the requested delay and returns immediately.
#[derive(Debug, Clone)]
pub struct MockTimer {
    log: OpLog,
}

impl MockTimer {
    pub fn new(log: OpLog) -> Self {
        Self { log }
    }
}

impl Timer for MockTimer {
    async fn sleep(&self, duration: Duration) {
        self.log.push(Op::Delay(duration));
    }
}
