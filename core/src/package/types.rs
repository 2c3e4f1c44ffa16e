//! package/types.rs
//! The loaded package and its summary.

use serde::Serialize;
use thiserror::Error;

use crate::binhdr;
use crate::package::target::Target;
use crate::types::ErrorKind;
use crate::ucl::UclError;
use crate::utils::compute_crc32;

/// A validated, ready-to-boot package.
///
/// Built once by the loader and never mutated; reloading produces a new value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootPackage {
    target: Target,
    version: String,
    spl_image: Vec<u8>,
    boot_image: Vec<u8>,
}

impl BootPackage {
    pub fn new(target: Target, version: String, spl_image: Vec<u8>, boot_image: Vec<u8>) -> Self {
        Self { target, version, spl_image, boot_image }
    }

    pub fn target(&self) -> &Target {
        &self.target
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// First-stage loader, uploaded verbatim.
    pub fn spl_image(&self) -> &[u8] {
        &self.spl_image
    }

    /// Decompressed main bootloader.
    pub fn boot_image(&self) -> &[u8] {
        &self.boot_image
    }

    pub fn summary(&self) -> PackageSummary {
        PackageSummary {
            target: self.target.name.to_owned(),
            version: self.version.clone(),
            spl_size: self.spl_image.len(),
            spl_crc32: compute_crc32(&self.spl_image),
            boot_size: self.boot_image.len(),
            boot_crc32: compute_crc32(&self.boot_image),
            boot_load_address: binhdr::load_address(&self.boot_image),
        }
    }
}

/// Serializable description of a loaded package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageSummary {
    pub target: String,
    pub version: String,
    pub spl_size: usize,
    pub spl_crc32: u32,
    pub boot_size: usize,
    pub boot_crc32: u32,
    /// `None` when the image carries no `LOAD` record.
    pub boot_load_address: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PackageError {
    #[error("unknown target '{name}'")]
    UnknownTarget { name: String },

    #[error("cannot unpack '{entry}': {source}")]
    Unpack { entry: String, #[source] source: UclError },
}

impl PackageError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PackageError::UnknownTarget { .. } => ErrorKind::InvalidTarget,
            PackageError::Unpack { source, .. } => source.kind(),
        }
    }
}
