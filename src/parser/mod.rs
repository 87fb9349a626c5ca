//! The two assembly text formats this crate reads and writes: format A
//! (PretextView's AGP-like export, read-only) and format B (TPF, read on
//! input and written on output).

pub mod format_a;
pub mod format_b;

pub use format_a::{parse_agp, write_agp};
pub use format_b::{parse_tpf, write_tpf};
