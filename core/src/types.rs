//! types.rs
//! Crate-wide error type and the error taxonomy shared by every layer.

use std::fmt;

use thiserror::Error;

use crate::package::PackageError;
use crate::tar::TarError;
use crate::ucl::UclError;
use crate::usbboot::UsbError;

/// Coarse classification of every failure the crate can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// UCL container header or block table is invalid.
    MalformedContainer,
    /// Input ended before a structure was complete.
    TruncatedInput,
    /// The compressed bitstream is inconsistent.
    CorruptStream,
    /// Tar header checksum or field is invalid, or an entry runs past the end.
    ArchiveCorrupt,
    EntryNotFound,
    UnsupportedEntryType,
    DeviceTransferFailed,
    InvalidTarget,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::MalformedContainer   => "malformed container",
            ErrorKind::TruncatedInput       => "truncated input",
            ErrorKind::CorruptStream        => "corrupt stream",
            ErrorKind::ArchiveCorrupt       => "archive corrupt",
            ErrorKind::EntryNotFound        => "entry not found",
            ErrorKind::UnsupportedEntryType => "unsupported entry type",
            ErrorKind::DeviceTransferFailed => "device transfer failed",
            ErrorKind::InvalidTarget        => "invalid target",
        };
        f.write_str(name)
    }
}

/// Unified error covering decompression, archive, USB and package failures.
/// `From` impls let `?` cross layer boundaries.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BootError {
    #[error("ucl: {0}")]
    Ucl(#[from] UclError),

    #[error("tar: {0}")]
    Tar(#[from] TarError),

    #[error("usb: {0}")]
    Usb(#[from] UsbError),

    #[error("package: {0}")]
    Package(#[from] PackageError),
}

impl BootError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            BootError::Ucl(e) => e.kind(),
            BootError::Tar(e) => e.kind(),
            BootError::Usb(e) => e.kind(),
            BootError::Package(e) => e.kind(),
        }
    }
}
