mod common;

#[cfg(test)]
mod tests {
    use jzboot_core::package::{self, PackageError, Target, TARGETS};
    use jzboot_core::tar::TarError;
    use jzboot_core::telemetry::Stage;
    use jzboot_core::types::{BootError, ErrorKind};
    use jzboot_core::ucl::UclError;
    use jzboot_core::utils::compute_crc32;

    use super::common::{boot_image, package_archive, run_stream, stored_container, ucl_container, TarBuilder, TEST_BLOCK_SIZE};

    fn m3k() -> &'static Target {
        Target::by_name("m3k").unwrap()
    }

    #[test]
    fn loads_complete_package() {
        let spl = vec![0x5A; 3000];
        let image = boot_image(Some(0x8000_4000), 20_000);
        let archive = package_archive("m3k", b"9.9\n", &spl, "bootloader2.ucl", &stored_container(&image, TEST_BLOCK_SIZE));

        let pkg = package::load(&archive, m3k()).unwrap();
        assert_eq!(pkg.version(), "9.9");
        assert_eq!(pkg.spl_image(), &spl[..]);
        assert_eq!(pkg.boot_image(), &image[..]);
        assert_eq!(pkg.target().name, "m3k");
    }

    #[test]
    fn loads_legacy_package_with_compressed_block() {
        let spl = vec![0x22; 777];
        let stream = run_stream(b"boot", 4000);
        let ucl = ucl_container(TEST_BLOCK_SIZE, &[(4004, stream)]);
        let archive = package_archive("q1", b"9.9\n", &spl, "bootloader.ucl", &ucl);

        let pkg = package::load(&archive, Target::by_name("q1").unwrap()).unwrap();
        assert_eq!(pkg.version(), "9.9");
        assert_eq!(pkg.spl_image().len(), 777);
        assert_eq!(pkg.boot_image().len(), 4004);
        assert_eq!(&pkg.boot_image()[..4], b"boot");
        assert!(pkg.boot_image()[4..].iter().all(|&b| b == b't'));
    }

    #[test]
    fn version_is_first_line_only() {
        let archive = package_archive("q1", b"v1.0-rc2\r\nbuilt today\n", b"spl", "bootloader.ucl", &stored_container(b"img", 1024));
        let pkg = package::load(&archive, Target::by_name("q1").unwrap()).unwrap();
        assert_eq!(pkg.version(), "v1.0-rc2");

        let archive = package_archive("q1", b"bare", b"spl", "bootloader.ucl", &stored_container(b"img", 1024));
        let pkg = package::load(&archive, Target::by_name("q1").unwrap()).unwrap();
        assert_eq!(pkg.version(), "bare");
    }

    #[test]
    fn prefers_newer_bootloader_name() {
        let archive = TarBuilder::new()
            .file("bootloader-info.txt", b"2\n")
            .file("spl.m3k", b"spl")
            .file("bootloader.ucl", &stored_container(b"legacy", 1024))
            .file("bootloader2.ucl", &stored_container(b"newer", 1024))
            .finish();
        let pkg = package::load(&archive, m3k()).unwrap();
        assert_eq!(pkg.boot_image(), b"newer");
    }

    #[test]
    fn falls_back_to_legacy_bootloader_name() {
        let archive = package_archive("m3k", b"1\n", b"spl", "bootloader.ucl", &stored_container(b"legacy", 1024));
        let pkg = package::load(&archive, m3k()).unwrap();
        assert_eq!(pkg.boot_image(), b"legacy");
    }

    #[test]
    fn missing_bootloader_names_legacy_entry() {
        let archive = TarBuilder::new()
            .file("bootloader-info.txt", b"1\n")
            .file("spl.m3k", b"spl")
            .finish();
        let err = package::load(&archive, m3k()).unwrap_err();
        assert!(matches!(err, BootError::Tar(TarError::EntryNotFound { ref name }) if name == "bootloader.ucl"));
        assert_eq!(err.kind(), ErrorKind::EntryNotFound);
    }

    #[test]
    fn missing_version_is_entry_not_found() {
        let archive = TarBuilder::new()
            .file("spl.m3k", b"spl")
            .file("bootloader2.ucl", &stored_container(b"x", 1024))
            .finish();
        let err = package::load(&archive, m3k()).unwrap_err();
        assert!(matches!(err, BootError::Tar(TarError::EntryNotFound { ref name }) if name == "bootloader-info.txt"));
    }

    #[test]
    fn spl_for_other_target_is_not_used() {
        let archive = package_archive("q1", b"1\n", b"spl", "bootloader2.ucl", &stored_container(b"x", 1024));
        let err = package::load(&archive, m3k()).unwrap_err();
        assert!(matches!(err, BootError::Tar(TarError::EntryNotFound { ref name }) if name == "spl.m3k"));
    }

    #[test]
    fn corrupt_bootloader_container_reports_entry() {
        let mut ucl = stored_container(b"image", 1024);
        ucl[0] = 0x42;
        let archive = package_archive("m3k", b"1\n", b"spl", "bootloader2.ucl", &ucl);
        let err = package::load(&archive, m3k()).unwrap_err();
        assert!(matches!(
            err,
            BootError::Package(PackageError::Unpack { ref entry, source: UclError::BadMagic { .. } }) if entry == "bootloader2.ucl"
        ));
        assert_eq!(err.kind(), ErrorKind::MalformedContainer);
    }

    #[test]
    fn corrupt_archive_is_archive_corrupt() {
        let mut archive = package_archive("m3k", b"1\n", b"spl", "bootloader2.ucl", &stored_container(b"x", 1024));
        archive[0] ^= 0x20;
        let err = package::load(&archive, m3k()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ArchiveCorrupt);
    }

    #[test]
    fn summary_reports_sizes_checksums_and_load_address() {
        let spl = b"first stage".to_vec();
        let image = boot_image(Some(0x8010_0000), 4096);
        let archive = package_archive("m3k", b"3.1\n", &spl, "bootloader2.ucl", &stored_container(&image, 1024));
        let summary = package::load(&archive, m3k()).unwrap().summary();

        assert_eq!(summary.target, "m3k");
        assert_eq!(summary.version, "3.1");
        assert_eq!(summary.spl_size, spl.len());
        assert_eq!(summary.spl_crc32, compute_crc32(&spl));
        assert_eq!(summary.boot_size, 4096);
        assert_eq!(summary.boot_crc32, compute_crc32(&image));
        assert_eq!(summary.boot_load_address, Some(0x8010_0000));

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["version"], "3.1");
        assert_eq!(json["boot_load_address"], 0x8010_0000u32);
    }

    #[test]
    fn load_with_telemetry_counts_work() {
        let image = boot_image(None, 5000);
        let archive = package_archive("m3k", b"1\n", b"spl", "bootloader2.ucl", &stored_container(&image, 1024));
        let (pkg, telemetry) = package::load_with_telemetry(&archive, m3k()).unwrap();

        assert_eq!(pkg.boot_image().len(), 5000);
        assert_eq!(telemetry.counters.entries_read, 3);
        assert_eq!(telemetry.counters.blocks_stored, 5);
        assert_eq!(telemetry.counters.blocks_compressed, 0);
        assert_eq!(telemetry.counters.bytes_decompressed, 5000);
        assert_eq!(telemetry.counters.bytes_archive, archive.len() as u64);
        assert!(telemetry.has_all_stages(&[Stage::Extract, Stage::Decompress]));
        assert!(telemetry.sanity_check());
    }

    #[test]
    fn targets_registry() {
        assert_eq!(TARGETS.len(), 2);
        let q1 = Target::by_name("Q1").unwrap();
        assert_eq!(q1.description, "Shanling Q1");
        assert_eq!(q1.spl_entry(), "spl.q1");
        assert_eq!(q1.package_file_name(), "bootloader.q1");
        assert_eq!(m3k().boot_button, "Volume Down");
        assert_eq!((m3k().vendor_id, m3k().product_id), (0xA108, 0x1000));

        let err = Target::by_name("ipod").unwrap_err();
        assert!(matches!(err, PackageError::UnknownTarget { ref name } if name == "ipod"));
        assert_eq!(err.kind(), ErrorKind::InvalidTarget);
    }
}
