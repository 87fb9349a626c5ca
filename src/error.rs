//! Error types for the parsing and build stages.
//!
//! Follows the teacher's `BedError` pattern (`src/bed.rs`): one
//! `thiserror`-derived enum per concern, `#[from] io::Error` for I/O,
//! structured variants carrying enough context (line numbers, scaffold
//! names) to act on without re-parsing the message.

use std::io;
use thiserror::Error;

/// Errors raised while parsing format A (PretextView/AGP-like edit
/// assembly output) or format B (TPF input assembly).
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("{file}:{line}: {message}")]
    MalformedInput {
        file: String,
        line: usize,
        message: String,
    },
}

pub type ParseResult<T> = std::result::Result<T, ParseError>;

/// Errors raised by the build engine. Per spec, `MissingOverlap` is
/// deliberately absent here — a missing overlap is a logged warning, not
/// a fatal error, so it never reaches this enum.
#[derive(Error, Debug)]
pub enum BuildError {
    #[error(
        "inconsistent chromosome name in scaffold {scaffold}: found both '{first}' and '{second}'"
    )]
    InconsistentChrName {
        scaffold: String,
        first: String,
        second: String,
    },

    #[error(
        "inconsistent haplotype tag in scaffold {scaffold}: found both '{first}' and '{second}'"
    )]
    InconsistentHaplotype {
        scaffold: String,
        first: String,
        second: String,
    },

    #[error("fragment conservation violated while cutting {fragment}: {message}")]
    FragmentConservationViolation { fragment: String, message: String },
}

pub type BuildResult<T> = std::result::Result<T, BuildError>;
