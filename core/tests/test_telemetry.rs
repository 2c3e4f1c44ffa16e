#[cfg(test)]
mod telemetry_snapshot_tests {
    use std::time::Duration;

    use jzboot_core::telemetry::{Stage, StageTimes, TelemetryCounters, TelemetrySnapshot, TelemetryTimer};
    use jzboot_core::ucl::UnpackStats;

    fn make_counters() -> TelemetryCounters {
        TelemetryCounters {
            entries_read: 3,
            blocks_stored: 1,
            blocks_compressed: 4,
            bytes_archive: 4096,
            bytes_compressed: 800,
            bytes_decompressed: 2000,
            bytes_uploaded: 0,
        }
    }

    fn make_timer() -> TelemetryTimer {
        let mut timer = TelemetryTimer::new();
        std::thread::sleep(Duration::from_millis(20)); // ensure elapsed > stage times
        timer.add_stage_time(Stage::Extract, Duration::from_millis(5));
        timer.add_stage_time(Stage::Decompress, Duration::from_millis(10));
        timer.finish();
        timer
    }

    #[test]
    fn compression_ratio_is_in_over_out() {
        let snapshot = TelemetrySnapshot::from(&make_counters(), &make_timer());
        assert!((snapshot.compression_ratio - 0.4).abs() < 1e-9);
    }

    #[test]
    fn compression_ratio_zero_without_output() {
        let snapshot = TelemetrySnapshot::from(&TelemetryCounters::default(), &make_timer());
        assert_eq!(snapshot.compression_ratio, 0.0);
    }

    #[test]
    fn stage_times_accumulate() {
        let mut times = StageTimes::default();
        times.add(Stage::Upload, Duration::from_millis(3));
        times.add(Stage::Upload, Duration::from_millis(4));
        assert_eq!(times.get(Stage::Upload), Duration::from_millis(7));
        assert_eq!(times.get(Stage::Settle), Duration::ZERO);
        assert!(times.contains(Stage::Upload));
        assert!(!times.contains(Stage::Settle));
        assert_eq!(times.total(), Duration::from_millis(7));
        assert!((times.get_ms(Stage::Upload) - 7.0).abs() < 1e-9);
    }

    #[test]
    fn snapshot_sanity_and_coverage() {
        let snapshot = TelemetrySnapshot::from(&make_counters(), &make_timer());
        assert!(snapshot.sanity_check());
        assert!(snapshot.has_all_stages(&[Stage::Extract, Stage::Decompress]));
        assert!(!snapshot.has_all_stages(&[Stage::Upload]));
        assert_eq!(snapshot.total_stage_time(), Duration::from_millis(15));
        assert!(snapshot.elapsed >= Duration::from_millis(20));
    }

    #[test]
    fn counters_add_and_merge() {
        let mut counters = TelemetryCounters::default();
        counters.add_entry();
        counters.add_unpack(&UnpackStats { blocks_stored: 2, blocks_compressed: 1, bytes_in: 300, bytes_out: 900 });
        counters.add_upload(1500);

        let mut total = make_counters();
        total.merge(&counters);
        assert_eq!(total.entries_read, 4);
        assert_eq!(total.blocks_stored, 3);
        assert_eq!(total.blocks_compressed, 5);
        assert_eq!(total.bytes_compressed, 1100);
        assert_eq!(total.bytes_decompressed, 2900);
        assert_eq!(total.bytes_uploaded, 1500);

        let mut summed = make_counters();
        summed += counters;
        assert_eq!(summed, total);
    }

    #[test]
    fn stage_display_names() {
        let names: Vec<String> = [Stage::Extract, Stage::Decompress, Stage::Upload, Stage::Settle]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(names, ["extract", "decompress", "upload", "settle"]);
    }

    #[test]
    fn snapshot_serializes_to_json() {
        let snapshot = TelemetrySnapshot::from(&make_counters(), &make_timer());
        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["counters"]["entries_read"], 3);
        assert!(json["stage_times"]["times"]["Extract"].is_object());
    }
}
