//! telemetry/counters.rs
//! Mutable counters collected while loading a package or booting a device.
//! Converted into an immutable `TelemetrySnapshot` at the end.

use std::ops::AddAssign;

use serde::{Deserialize, Serialize};

use crate::ucl::UnpackStats;

#[derive(Default, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelemetryCounters {
    pub entries_read: u64,
    pub blocks_stored: u64,
    pub blocks_compressed: u64,
    pub bytes_archive: u64,
    pub bytes_compressed: u64,
    pub bytes_decompressed: u64,
    pub bytes_uploaded: u64,
}

impl TelemetryCounters {
    pub fn add_entry(&mut self) {
        self.entries_read += 1;
    }

    /// Record one unpacked UCL container.
    pub fn add_unpack(&mut self, stats: &UnpackStats) {
        self.blocks_stored += stats.blocks_stored;
        self.blocks_compressed += stats.blocks_compressed;
        self.bytes_compressed += stats.bytes_in;
        self.bytes_decompressed += stats.bytes_out;
    }

    /// Record one bulk upload of `len` bytes.
    pub fn add_upload(&mut self, len: usize) {
        self.bytes_uploaded += len as u64;
    }

    pub fn merge(&mut self, other: &TelemetryCounters) {
        self.entries_read += other.entries_read;
        self.blocks_stored += other.blocks_stored;
        self.blocks_compressed += other.blocks_compressed;
        self.bytes_archive += other.bytes_archive;
        self.bytes_compressed += other.bytes_compressed;
        self.bytes_decompressed += other.bytes_decompressed;
        self.bytes_uploaded += other.bytes_uploaded;
    }
}

impl AddAssign for TelemetryCounters {
    fn add_assign(&mut self, rhs: Self) {
        self.merge(&rhs);
    }
}
