//! usbboot/mod.rs
//! Ingenic X1000 USB boot: vendor requests, the two-stage sequencer and the
//! device session that wraps it.
//!
//! Notes:
//! - The device is reached through the `UsbDevice` trait; the host supplies it.
//! - Requests are strictly sequential: one transfer in flight, one session open.
//! - Between the stages the host waits a fixed settle delay. Nothing on the wire
//!   tells us the SPL is ready.

pub mod protocol;
pub mod transport;
pub mod timer;
pub mod sequencer;
pub mod session;
pub mod mock;

pub use protocol::*;
pub use transport::*;
pub use timer::*;
pub use sequencer::*;
pub use session::*;
