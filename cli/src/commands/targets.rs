//! `jzboot targets`: supported players.

use jzboot_core::package::TARGETS;

pub fn execute() -> anyhow::Result<()> {
    println!("{:<6} {:<14} {:<12} {:<22} usb", "name", "player", "boot button", "package file");
    for t in TARGETS {
        println!(
            "{:<6} {:<14} {:<12} {:<22} {:04x}:{:04x}",
            t.name,
            t.description,
            t.boot_button,
            t.package_file_name(),
            t.vendor_id,
            t.product_id
        );
    }
    Ok(())
}
