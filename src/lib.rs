// Clippy allows for the whole crate
#![allow(clippy::too_many_arguments)]
#![allow(clippy::should_implement_trait)]
#![allow(clippy::type_complexity)]

//! Reconciles a curator-edited genome assembly, as exported by a
//! contact-map editor working on a coarse pixel grid, against the
//! original input assembly it was derived from.
//!
//! # Pipeline
//!
//! [`build::BuildAssembly`] walks the edit assembly scaffold by scaffold,
//! finding each fragment's overlap against an
//! [`indexed_assembly::IndexedAssembly`] view of the input, repairing
//! pixel-grid boundary noise by dropping or cutting shared fragments,
//! naming and tagging the result via [`chr_namer::ChrNamer`], and
//! carrying over any input scaffold the edit never touched.
//!
//! # Example
//!
//! ```rust,no_run
//! use asmrebuild::build::BuildAssembly;
//! use asmrebuild::gap::Gap;
//! use asmrebuild::parser::{parse_agp, parse_tpf};
//! use std::fs::File;
//!
//! let prtxt = parse_agp(File::open("edit.agp").unwrap(), "edit").unwrap();
//! let input = parse_tpf(File::open("input.tpf").unwrap(), "input").unwrap();
//!
//! let mut build = BuildAssembly::new("rebuilt", Gap::new(200, "scaffold"), "RL_");
//! build.remap_to_input_assembly(&prtxt, &input).unwrap();
//! let outputs = build.assemblies_with_scaffolds_fused();
//! ```

pub mod assembly;
pub mod build;
pub mod chr_namer;
pub mod config;
pub mod error;
pub mod fragment;
pub mod gap;
pub mod indexed_assembly;
pub mod logging;
pub mod overhang;
pub mod overlap_result;
pub mod parser;
pub mod row;
pub mod scaffold;
pub mod stats;

pub use assembly::Assembly;
pub use build::BuildAssembly;
pub use error::{BuildError, BuildResult, ParseError, ParseResult};
pub use fragment::{Fragment, Strand};
pub use gap::Gap;
pub use scaffold::Scaffold;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
