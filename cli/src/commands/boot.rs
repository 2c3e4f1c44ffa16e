//! `jzboot boot`: upload and start a package on a device in USB boot mode.

use std::path::Path;
use std::time::Duration;

use jzboot_core::usbboot::{BootConfig, BootSession, ThreadTimer};

use super::load_package;
use crate::usb::NusbDevice;

pub fn execute(path: &Path, target: &str, settle_ms: Option<u64>) -> anyhow::Result<()> {
    let (pkg, _) = load_package(path, target)?;
    let t = pkg.target();
    println!("Hold {} on the {} while plugging it in.", t.boot_button, t.description);

    let mut config = BootConfig::default();
    if let Some(ms) = settle_ms {
        config = config.with_settle_delay(Duration::from_millis(ms));
    }

    let device = NusbDevice::new(t.vendor_id, t.product_id);
    let session = BootSession::with_config(device, ThreadTimer, config);
    let report = pollster::block_on(session.run(&pkg))?;

    println!(
        "Booted {} version {} (bootloader at 0x{:08x}, {} bytes uploaded)",
        t.name,
        pkg.version(),
        report.stage2_address,
        report.telemetry.counters.bytes_uploaded
    );
    Ok(())
}
