//! `jzboot unpack`: write the package images to disk.

use std::fs;
use std::path::Path;

use anyhow::Context;

use super::load_package;

pub fn execute(path: &Path, target: &str, output: &Path) -> anyhow::Result<()> {
    let (pkg, _) = load_package(path, target)?;
    fs::create_dir_all(output).with_context(|| format!("cannot create {}", output.display()))?;

    let files: [(&str, &[u8]); 3] = [
        ("spl.bin", pkg.spl_image()),
        ("bootloader.bin", pkg.boot_image()),
        ("version.txt", pkg.version().as_bytes()),
    ];
    for (name, data) in files {
        let dest = output.join(name);
        fs::write(&dest, data).with_context(|| format!("cannot write {}", dest.display()))?;
        log::info!("wrote {} ({} bytes)", dest.display(), data.len());
    }
    println!("Unpacked {} version {} to {}", pkg.target().name, pkg.version(), output.display());
    Ok(())
}
