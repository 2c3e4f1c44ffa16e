//! Minimal stderr logger for the `log` facade.

use std::io::Write;

use log::{LevelFilter, Log, Metadata, Record};

pub struct StderrLogger;

static LOGGER: StderrLogger = StderrLogger;

/// Map `-v` repetitions and `--quiet` to a level. Warnings show by default.
pub fn level_for(verbose: u8, quiet: bool) -> LevelFilter {
    if quiet {
        return LevelFilter::Error;
    }
    match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Install the logger. A second call keeps the first logger and only
/// adjusts the level.
pub fn init(level: LevelFilter) {
    let _ = log::set_logger(&LOGGER);
    log::set_max_level(level);
}

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        // Format: "[LEVEL] target: message"
        let mut err = std::io::stderr().lock();
        let _ = writeln!(err, "[{}] {}: {}", record.level(), record.target(), record.args());
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}
