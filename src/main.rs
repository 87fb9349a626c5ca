//! `asmrebuild`: reconciles a curator-edited genome assembly against the
//! input assembly it was derived from.
//!
//! Usage: asmrebuild --assembly input.tpf --pretext edit.agp --output rebuilt

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process;

use clap::Parser;

use asmrebuild::config;
use asmrebuild::error::{BuildError, ParseError};
use asmrebuild::gap::Gap;
use asmrebuild::parser::{parse_agp, parse_tpf, write_tpf};
use asmrebuild::{logging, BuildAssembly};

#[derive(Parser)]
#[command(name = "asmrebuild")]
#[command(author = "Manish Kumar Bobbili")]
#[command(version)]
#[command(
    about = "Reconciles a curator-edited genome assembly against its input assembly",
    long_about = None
)]
struct Cli {
    /// Input assembly (TPF, single-base resolution)
    #[arg(long)]
    assembly: PathBuf,

    /// Edit assembly exported from the contact-map viewer (AGP-like)
    #[arg(long)]
    pretext: PathBuf,

    /// Directory to write the rebuilt assemblies into (one TPF file per
    /// output assembly). Defaults to the current directory.
    #[arg(long)]
    output: Option<PathBuf>,

    /// Also duplicate log output to `<output>/asmrebuild.log`.
    #[arg(long)]
    write_log: bool,

    /// Prefix used for auto-numbered chromosome names (e.g. "RL_" yields
    /// RL_1, RL_2, ...).
    #[arg(long, default_value = "RL_")]
    autosome_prefix: String,

    /// Gap length and type spliced in where the original data had none.
    #[arg(long, default_value_t = 200)]
    default_gap_length: i64,

    #[arg(long, default_value = "scaffold")]
    default_gap_type: String,
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Build(#[from] BuildError),
    #[error(transparent)]
    Io(#[from] io::Error),
}

fn main() {
    let cli = Cli::parse();
    let output_dir = cli.output.clone().unwrap_or_else(|| PathBuf::from("."));

    if let Err(e) = run(cli, &output_dir) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run(cli: Cli, output_dir: &std::path::Path) -> Result<(), CliError> {
    fs::create_dir_all(output_dir)?;
    let log_path = output_dir.join("asmrebuild.log");
    config::set_write_log(cli.write_log);
    config::set_default_autosome_prefix(cli.autosome_prefix.clone());
    logging::init(cli.write_log.then_some(log_path.as_path()));

    let assembly_name = stem(&cli.assembly);
    let pretext_name = stem(&cli.pretext);

    let input_asm = parse_tpf(File::open(&cli.assembly)?, &assembly_name)?;
    let prtxt_asm = parse_agp(File::open(&cli.pretext)?, &pretext_name)?;

    let default_gap = Gap::new(cli.default_gap_length, cli.default_gap_type.clone());
    let mut build = BuildAssembly::new(assembly_name.clone(), default_gap, cli.autosome_prefix.clone());
    build.remap_to_input_assembly(&prtxt_asm, &input_asm)?;
    let assemblies = build.assemblies_with_scaffolds_fused();

    for asm in &assemblies {
        let path = output_dir.join(format!("{}.tpf", asm.name));
        let mut writer = BufWriter::new(File::create(&path)?);
        write_tpf(&mut writer, asm)?;
        writer.flush()?;
        log::info!("wrote {} ({} scaffolds) to {}", asm.name, asm.scaffolds.len(), path.display());
    }

    eprintln!("{}", build.stats);
    Ok(())
}

fn stem(path: &std::path::Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}
