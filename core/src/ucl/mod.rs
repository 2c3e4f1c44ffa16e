//! ucl/mod.rs
//! UCL container unpacking and the NRV2E bitstream decoder.
//!
//! Notes:
//! - Only method 0x2E (NRV2E) is accepted; anything else is rejected up front.
//! - Every block header is validated before any block is decoded.
//! - The decoder never reads before the start of its output and never grows
//!   past the container's block size.

pub mod types;
pub mod decode;
pub mod container;

pub use types::*;
pub use decode::*;
pub use container::*;
