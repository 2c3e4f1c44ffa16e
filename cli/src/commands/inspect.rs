//! `jzboot inspect`: load a package and report what would be booted.

use std::path::Path;

use serde::Serialize;

use jzboot_core::package::PackageSummary;
use jzboot_core::telemetry::{Stage, TelemetrySnapshot};

use super::load_package;

#[derive(Serialize)]
struct InspectReport<'a> {
    package: &'a PackageSummary,
    telemetry: &'a TelemetrySnapshot,
}

pub fn execute(path: &Path, target: &str, json: bool) -> anyhow::Result<()> {
    let (pkg, telemetry) = load_package(path, target)?;
    let summary = pkg.summary();

    if json {
        let report = InspectReport { package: &summary, telemetry: &telemetry };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("Target:       {}", pkg.target());
    println!("Version:      {}", summary.version);
    println!("SPL:          {} bytes, crc32 {:08x}", summary.spl_size, summary.spl_crc32);
    println!("Bootloader:   {} bytes, crc32 {:08x}", summary.boot_size, summary.boot_crc32);
    match summary.boot_load_address {
        Some(addr) => println!("Load address: 0x{:08x}", addr),
        None => println!("Load address: default"),
    }
    println!(
        "Unpacked:     {} stored + {} compressed blocks, ratio {:.3}",
        telemetry.counters.blocks_stored, telemetry.counters.blocks_compressed, telemetry.compression_ratio
    );
    for stage in [Stage::Extract, Stage::Decompress] {
        println!("  {:<11} {:.3} ms", stage.to_string(), telemetry.stage_times.get_ms(stage));
    }
    Ok(())
}
