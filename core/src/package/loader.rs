//! package/loader.rs
//!
//! Archive bytes -> `BootPackage`.
//!
//! Steps, each one a hard failure:
//! 1. `bootloader-info.txt`: first line is the version string.
//! 2. `spl.<suffix>`: the target's first-stage loader, kept as is.
//! 3. `bootloader2.ucl`, or `bootloader.ucl` when the newer name is absent:
//!    the main bootloader, UCL-compressed.
//! 4. Unpack the bootloader and assemble the package.

use std::time::Instant;

use crate::constants::entries;
use crate::package::target::Target;
use crate::package::types::{BootPackage, PackageError};
use crate::tar::{Lookup, TarArchive};
use crate::telemetry::{Stage, TelemetryCounters, TelemetrySnapshot, TelemetryTimer};
use crate::types::BootError;
use crate::ucl;

/// Content of `text` up to the first CR or LF.
pub fn first_line(text: &[u8]) -> String {
    let end = text.iter().position(|&c| c == b'\n' || c == b'\r').unwrap_or(text.len());
    String::from_utf8_lossy(&text[..end]).into_owned()
}

/// Locate the compressed bootloader, preferring the newer container name.
fn find_bootloader<'a>(archive: &TarArchive<'a>) -> Result<(&'static str, &'a [u8]), BootError> {
    if let Lookup::Found(data) = archive.find(entries::BOOTLOADER)? {
        return Ok((entries::BOOTLOADER, data));
    }
    log::debug!("package: '{}' absent, falling back to '{}'", entries::BOOTLOADER, entries::BOOTLOADER_LEGACY);
    let data = archive.extract(entries::BOOTLOADER_LEGACY)?;
    Ok((entries::BOOTLOADER_LEGACY, data))
}

/// Load a package for `target`.
pub fn load(archive: &[u8], target: &Target) -> Result<BootPackage, BootError> {
    load_with_telemetry(archive, target).map(|(package, _)| package)
}

/// Load a package for `target`, also reporting stage timings and byte counts.
pub fn load_with_telemetry(archive: &[u8], target: &Target) -> Result<(BootPackage, TelemetrySnapshot), BootError> {
    let mut timer = TelemetryTimer::new();
    let mut counters = TelemetryCounters::default();
    let tar = TarArchive::new(archive);
    counters.bytes_archive = archive.len() as u64;

    let t = Instant::now();
    let version = first_line(tar.extract(entries::VERSION)?);
    counters.add_entry();
    let spl_image = tar.extract(&target.spl_entry())?.to_vec();
    counters.add_entry();
    let (entry, compressed) = find_bootloader(&tar)?;
    counters.add_entry();
    timer.add_stage_time(Stage::Extract, t.elapsed());

    let t = Instant::now();
    let (boot_image, stats) = ucl::unpack_with_stats(compressed)
        .map_err(|source| PackageError::Unpack { entry: entry.to_owned(), source })?;
    counters.add_unpack(&stats);
    timer.add_stage_time(Stage::Decompress, t.elapsed());

    log::info!(
        "package: {} version '{}': spl {} bytes, bootloader {} -> {} bytes ({})",
        target.name, version, spl_image.len(), compressed.len(), boot_image.len(), entry
    );

    timer.finish();
    let package = BootPackage::new(*target, version, spl_image, boot_image);
    Ok((package, TelemetrySnapshot::from(&counters, &timer)))
}
