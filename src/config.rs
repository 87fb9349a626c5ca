//! Run-global configuration.
//!
//! Follows the teacher's own `config.rs`: a small set of process-wide
//! statics set once at startup from CLI flags and read during the run,
//! instead of threading a config struct through every call site. What's
//! global here is the default autosome-naming prefix and whether the run
//! should also duplicate its log to a file — the teacher's bedtools
//! zero-length-interval flag has no counterpart in this domain and is
//! dropped.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;

static WRITE_LOG: AtomicBool = AtomicBool::new(false);
static AUTOSOME_PREFIX: RwLock<Option<String>> = RwLock::new(None);

/// Enable duplicating log output to a file alongside stderr.
#[inline]
pub fn set_write_log(enabled: bool) {
    WRITE_LOG.store(enabled, Ordering::Release);
}

#[inline]
pub fn write_log_enabled() -> bool {
    WRITE_LOG.load(Ordering::Acquire)
}

/// Overrides the default autosome prefix ("RL_") used when a
/// [`crate::chr_namer::ChrNamer`] is constructed without one explicitly
/// passed in.
pub fn set_default_autosome_prefix(prefix: impl Into<String>) {
    *AUTOSOME_PREFIX.write().unwrap() = Some(prefix.into());
}

pub fn default_autosome_prefix() -> String {
    AUTOSOME_PREFIX
        .read()
        .unwrap()
        .clone()
        .unwrap_or_else(|| "RL_".to_string())
}
