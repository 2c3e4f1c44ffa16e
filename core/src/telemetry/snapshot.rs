//! telemetry/snapshot.rs
//! Immutable telemetry snapshot, serializable for `--json` output.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::telemetry::counters::TelemetryCounters;
use crate::telemetry::timers::{Stage, StageTimes, TelemetryTimer};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetrySnapshot {
    pub counters: TelemetryCounters,
    /// `bytes_compressed / bytes_decompressed`, 0.0 when nothing was unpacked.
    pub compression_ratio: f64,
    pub elapsed: Duration,
    pub stage_times: StageTimes,
}

impl TelemetrySnapshot {
    pub fn from(counters: &TelemetryCounters, timer: &TelemetryTimer) -> Self {
        let compression_ratio = if counters.bytes_decompressed > 0 {
            counters.bytes_compressed as f64 / counters.bytes_decompressed as f64
        } else {
            0.0
        };

        Self {
            counters: counters.clone(),
            compression_ratio,
            elapsed: timer.elapsed(),
            stage_times: timer.stage_times.clone(),
        }
    }

    pub fn total_stage_time(&self) -> Duration {
        self.stage_times.total()
    }

    /// Every stage in `expected` was recorded.
    pub fn has_all_stages(&self, expected: &[Stage]) -> bool {
        expected.iter().all(|s| self.stage_times.contains(*s))
    }

    /// Stage times never add up to more than the wall-clock total.
    pub fn sanity_check(&self) -> bool {
        self.total_stage_time() <= self.elapsed
    }
}
