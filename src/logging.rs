//! Minimal run logger: everything goes to stderr, and is optionally
//! duplicated to a file when the curator passes `--write-log`.
//!
//! The teacher's bedtools commands had no logging layer of their own to
//! follow, so this is grounded in `log`'s own documented pattern for a
//! small custom `Log` implementor — the crate is declared for exactly
//! this purpose by `varfish-org-varfish-server-worker`'s Cargo.toml, the
//! closest thing in the retrieval pack to a precedent for this crate's
//! stack. `env_logger` is deliberately not pulled in: nothing in the
//! retrieved pack declares it as a dependency, only imports it from an
//! environment where it's presumably available transitively.

use std::fs::File;
use std::io::Write;
use std::sync::Mutex;

use log::{Level, LevelFilter, Log, Metadata, Record};

struct RunLogger {
    file: Mutex<Option<File>>,
}

impl Log for RunLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= Level::Debug
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = format!("{}: {}", record.level(), record.args());
        eprintln!("{line}");
        if let Ok(mut guard) = self.file.lock() {
            if let Some(file) = guard.as_mut() {
                let _ = writeln!(file, "{line}");
            }
        }
    }

    fn flush(&self) {
        if let Ok(mut guard) = self.file.lock() {
            if let Some(file) = guard.as_mut() {
                let _ = file.flush();
            }
        }
    }
}

/// Installs the global logger. `log_file` duplicates every message to a
/// file as well as stderr when `--write-log` was passed; failing to open
/// it is a warning, not a fatal error, since the run can still proceed
/// with stderr-only logging.
pub fn init(log_file: Option<&std::path::Path>) {
    let file = log_file.and_then(|path| match File::create(path) {
        Ok(f) => Some(f),
        Err(e) => {
            eprintln!("warning: could not open log file {}: {e}", path.display());
            None
        }
    });

    let logger = RunLogger { file: Mutex::new(file) };
    if log::set_boxed_logger(Box::new(logger)).is_ok() {
        log::set_max_level(LevelFilter::Debug);
    }
}
