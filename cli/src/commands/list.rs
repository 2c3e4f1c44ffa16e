//! `jzboot list`: entries of a package archive, in archive order.

use std::path::Path;

use jzboot_core::tar::TarArchive;

use super::read_package;

pub fn execute(path: &Path) -> anyhow::Result<()> {
    let archive = read_package(path)?;
    let tar = TarArchive::new(&archive);

    for entry in tar.entries() {
        let entry = entry?;
        println!(
            "{:>8} {:>10}  {:?}  {}",
            entry.header_offset,
            entry.header.size,
            entry.header.entry_type,
            entry.header.name_lossy()
        );
    }
    Ok(())
}
