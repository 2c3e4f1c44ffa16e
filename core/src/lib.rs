//! jzboot-core
//!
//! Loads X1000 bootloader packages and boots them over the Ingenic USB boot
//! protocol. Pure Rust, no USB backend: callers supply a `UsbDevice`.

#![forbid(unsafe_code)]

// Shared and top level
pub mod constants;
pub mod types;
pub mod utils;

// Formats
pub mod ucl;
pub mod tar;
pub mod binhdr;

// Boot pipeline
pub mod package;
pub mod usbboot;
pub mod telemetry;

// -----------------------------------------------------------------------------
// Prelude (Rust users)
// -----------------------------------------------------------------------------
pub mod prelude {
    pub use crate::package::{load, load_with_telemetry, BootPackage, PackageSummary, Target, TARGETS};
    pub use crate::telemetry::{Stage, TelemetrySnapshot};
    pub use crate::types::{BootError, ErrorKind};
    pub use crate::usbboot::{BootConfig, BootReport, BootSession, BootState, ThreadTimer, Timer, UsbDevice, UsbError};
}
