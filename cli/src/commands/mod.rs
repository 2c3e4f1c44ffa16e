//! Subcommand implementations. Each exposes `execute(...) -> anyhow::Result<()>`.

pub mod inspect;
pub mod list;
pub mod targets;
pub mod unpack;
#[cfg(feature = "usb")]
pub mod boot;

use std::path::Path;

use anyhow::Context;
use jzboot_core::package::{self, BootPackage, Target};
use jzboot_core::telemetry::TelemetrySnapshot;

pub(crate) fn read_package(path: &Path) -> anyhow::Result<Vec<u8>> {
    std::fs::read(path).with_context(|| format!("cannot read package {}", path.display()))
}

/// Resolve `target` and load the package at `path` for it.
pub(crate) fn load_package(path: &Path, target: &str) -> anyhow::Result<(BootPackage, TelemetrySnapshot)> {
    let target: &Target = Target::by_name(target)?;
    let archive = read_package(path)?;
    let loaded = package::load_with_telemetry(&archive, target)
        .with_context(|| format!("cannot load {} for {}", path.display(), target))?;
    Ok(loaded)
}
