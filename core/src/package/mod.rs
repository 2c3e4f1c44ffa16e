//! package/mod.rs
//! Bootloader packages: supported targets and the loader that turns a
//! package archive into a ready-to-boot `BootPackage`.

pub mod target;
pub mod types;
pub mod loader;

pub use target::*;
pub use types::*;
pub use loader::*;
