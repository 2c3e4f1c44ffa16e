//! usbboot/session.rs
//!
//! One boot session: open, claim, stage 1, settle, stage 2, close.
//!
//! Design notes:
//! - The device is closed exactly once on every path after a successful open.
//! - On failure the close is best effort; its own error is logged and the
//!   original error is returned.
//! - The session owns its device and timer and is consumed by `run`.

use std::time::Instant;

use crate::package::BootPackage;
use crate::telemetry::{Stage, TelemetryCounters, TelemetrySnapshot, TelemetryTimer};
use crate::types::BootError;
use crate::usbboot::protocol::BootConfig;
use crate::usbboot::sequencer::{BootState, Sequencer};
use crate::usbboot::timer::Timer;
use crate::usbboot::transport::{UsbDevice, UsbError};

/// Outcome of a successful session.
#[derive(Debug, Clone)]
pub struct BootReport {
    pub state: BootState,
    pub stage2_address: u32,
    pub telemetry: TelemetrySnapshot,
}

pub struct BootSession<D: UsbDevice, T: Timer> {
    device: D,
    timer: T,
    config: BootConfig,
}

impl<D: UsbDevice, T: Timer> BootSession<D, T> {
    pub fn new(device: D, timer: T) -> Self {
        Self::with_config(device, timer, BootConfig::default())
    }

    pub fn with_config(device: D, timer: T, config: BootConfig) -> Self {
        Self { device, timer, config }
    }

    /// Boot `package`, returning the device handle alongside the result so
    /// callers (and tests) can inspect it afterwards.
    pub async fn run_returning_device(mut self, package: &BootPackage) -> (D, Result<BootReport, BootError>) {
        let result = self.run_inner(package).await;
        (self.device, result)
    }

    /// Boot `package`.
    pub async fn run(self, package: &BootPackage) -> Result<BootReport, BootError> {
        self.run_returning_device(package).await.1
    }

    async fn run_inner(&mut self, package: &BootPackage) -> Result<BootReport, BootError> {
        log::info!("usbboot: opening device");
        self.device.open().await?;

        let outcome = self.boot(package).await;
        match outcome {
            Ok(report) => {
                log::info!("usbboot: closing device");
                self.device.close().await?;
                Ok(report)
            }
            Err(err) => {
                log::error!("usbboot: {}", err);
                if let Err(close_err) = self.device.close().await {
                    log::warn!("usbboot: close after failure also failed: {}", close_err);
                }
                Err(err.into())
            }
        }
    }

    async fn boot(&mut self, package: &BootPackage) -> Result<BootReport, UsbError> {
        let mut timer = TelemetryTimer::new();
        let mut counters = TelemetryCounters::default();

        log::info!("usbboot: claiming interface {}", self.config.interface);
        self.device.claim_interface(self.config.interface).await?;

        let mut seq = Sequencer::new(&mut self.device, &self.config);

        log::info!("usbboot: loading stage1 (SPL, {} bytes)", package.spl_image().len());
        let t = Instant::now();
        seq.run_stage1(package.spl_image()).await?;
        timer.add_stage_time(Stage::Upload, t.elapsed());
        counters.add_upload(package.spl_image().len());

        log::info!("usbboot: waiting {:?} for SPL to come up", self.config.settle_delay);
        let t = Instant::now();
        self.timer.sleep(self.config.settle_delay).await;
        timer.add_stage_time(Stage::Settle, t.elapsed());

        log::info!("usbboot: loading stage2 (bootloader, {} bytes)", package.boot_image().len());
        let t = Instant::now();
        let stage2_address = seq.run_stage2(package.boot_image()).await?;
        timer.add_stage_time(Stage::Upload, t.elapsed());
        counters.add_upload(package.boot_image().len());

        timer.finish();
        Ok(BootReport {
            state: seq.state(),
            stage2_address,
            telemetry: TelemetrySnapshot::from(&counters, &timer),
        })
    }
}
