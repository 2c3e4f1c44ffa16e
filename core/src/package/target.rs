//! package/target.rs
//! Supported players.

use std::fmt;

use crate::constants::{entries, usb};
use crate::package::types::PackageError;

/// A player model the loader knows how to boot.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Target {
    /// Short name, also the package file extension (`bootloader.<name>`).
    pub name: &'static str,
    pub description: &'static str,
    /// Suffix of the target's SPL entry (`spl.<suffix>`).
    pub file_suffix: &'static str,
    /// Button held while plugging in to enter USB boot mode.
    pub boot_button: &'static str,
    pub vendor_id: u16,
    pub product_id: u16,
}

pub const TARGETS: &[Target] = &[
    Target {
        name: "m3k",
        description: "FiiO M3K",
        file_suffix: "m3k",
        boot_button: "Volume Down",
        vendor_id: usb::VENDOR_ID,
        product_id: usb::PRODUCT_ID,
    },
    Target {
        name: "q1",
        description: "Shanling Q1",
        file_suffix: "q1",
        boot_button: "Play",
        vendor_id: usb::VENDOR_ID,
        product_id: usb::PRODUCT_ID,
    },
];

impl Target {
    pub fn by_name(name: &str) -> Result<&'static Target, PackageError> {
        TARGETS
            .iter()
            .find(|t| t.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| PackageError::UnknownTarget { name: name.to_owned() })
    }

    pub fn spl_entry(&self) -> String {
        format!("{}{}", entries::SPL_PREFIX, self.file_suffix)
    }

    pub fn package_file_name(&self) -> String {
        format!("bootloader.{}", self.name)
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.description)
    }
}
