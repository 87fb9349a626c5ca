//! `AssemblyStats`: tallies describing one rebuild run, printed at the end
//! so a curator can sanity-check what happened without re-reading the log.
//! Grounded in the `self.assembly_stats` bookkeeping referenced throughout
//! `build_assembly.py` — the stats class itself wasn't part of the
//! retrieved source, so its shape here is inferred from that usage.

use std::fmt;

use crate::assembly::Assembly;

#[derive(Debug, Clone, Default)]
pub struct OutputAssemblyStats {
    pub name: String,
    pub scaffold_count: usize,
    pub fragment_count: usize,
    pub gap_count: usize,
    pub total_length: i64,
}

#[derive(Debug, Clone, Default)]
pub struct AssemblyStats {
    pub autosome_prefix: String,
    pub cuts: u64,
    pub input_assembly_name: Option<String>,
    pub input_total_length: i64,
    pub per_output: Vec<OutputAssemblyStats>,
}

impl AssemblyStats {
    pub fn new(autosome_prefix: impl Into<String>) -> Self {
        Self {
            autosome_prefix: autosome_prefix.into(),
            ..Default::default()
        }
    }

    /// Summarizes each fused output assembly: scaffold/fragment/gap counts
    /// and total base length, so the run's conservation can be checked at
    /// a glance against `input_total_length`.
    pub fn make_stats(&mut self, assemblies: &[Assembly]) {
        self.per_output = assemblies
            .iter()
            .map(|asm| {
                let mut stats = OutputAssemblyStats {
                    name: asm.name.clone(),
                    scaffold_count: asm.scaffolds.len(),
                    ..Default::default()
                };
                for scaffold in &asm.scaffolds {
                    stats.total_length += scaffold.length();
                    for row in &scaffold.rows {
                        if row.is_gap() {
                            stats.gap_count += 1;
                        } else {
                            stats.fragment_count += 1;
                        }
                    }
                }
                stats
            })
            .collect();
    }

    pub fn output_total_length(&self) -> i64 {
        self.per_output.iter().map(|s| s.total_length).sum()
    }
}

impl fmt::Display for AssemblyStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "cuts made: {}", self.cuts)?;
        if let Some(name) = &self.input_assembly_name {
            writeln!(f, "input assembly: {name} ({} bp)", self.input_total_length)?;
        }
        for stats in &self.per_output {
            writeln!(
                f,
                "  {:<24} {:6} scaffolds  {:7} fragments  {:6} gaps  {:>14} bp",
                stats.name, stats.scaffold_count, stats.fragment_count, stats.gap_count, stats.total_length
            )?;
        }
        writeln!(f, "output total: {} bp", self.output_total_length())
    }
}
