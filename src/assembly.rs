//! `Assembly`: a named, ordered set of scaffolds plus any header
//! commentary carried through from the source document.

use std::fmt;

use crate::scaffold::Scaffold;

#[derive(Debug, Clone, Default)]
pub struct Assembly {
    pub name: String,
    pub header_lines: Vec<String>,
    pub scaffolds: Vec<Scaffold>,
    /// The edit tool's pixel resolution, in base pairs per texel. `None`
    /// until the first scaffold carrying a declared resolution is parsed.
    pub bp_per_texel: Option<f64>,
}

impl Assembly {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            header_lines: Vec::new(),
            scaffolds: Vec::new(),
            bp_per_texel: None,
        }
    }

    pub fn add_scaffold(&mut self, scaffold: Scaffold) {
        self.scaffolds.push(scaffold);
    }

    /// Orders scaffolds the way a curated assembly is conventionally
    /// presented: chromosome-named scaffolds first in ascending numeric
    /// order, each followed immediately by its unlocalised contigs in
    /// suffix order, then everything else (haplotigs, contaminants,
    /// scaffolds that never got a chromosome name) by length descending.
    pub fn smart_sort_scaffolds(&mut self, autosome_prefix: &str) {
        let key = |s: &Scaffold| sort_key(s, autosome_prefix);
        self.scaffolds.sort_by(|a, b| key(a).cmp(&key(b)));
    }
}

impl fmt::Display for Assembly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Assembly: {}", self.name)?;
        for line in &self.header_lines {
            writeln!(f, "  # {line}")?;
        }
        for scaffold in &self.scaffolds {
            for line in scaffold.to_string().lines() {
                writeln!(f, "  {line}")?;
            }
        }
        Ok(())
    }
}

/// Sort key: `(bucket, chr_number, unloc_suffix, Reverse(length))`, so
/// that within a bucket ties break by descending length.
fn sort_key(scaffold: &Scaffold, autosome_prefix: &str) -> (u8, i64, i64, std::cmp::Reverse<i64>) {
    let rev_len = std::cmp::Reverse(scaffold.length());
    if let Some((chr_num, unloc)) = parse_chr_and_unloc(&scaffold.name, autosome_prefix) {
        (0, chr_num, unloc, rev_len)
    } else {
        (1, 0, 0, rev_len)
    }
}

/// Parses `"{prefix}{n}"` or `"{prefix}{n}_unloc_{k}"` into `(n, 0)` or
/// `(n, k)` respectively. Chromosome names that don't carry the autosome
/// prefix (e.g. curator-assigned single letters like "X") still sort as
/// chromosomes, keyed on their own text compared numerically where
/// possible, falling back to a stable large sentinel otherwise.
fn parse_chr_and_unloc(name: &str, autosome_prefix: &str) -> Option<(i64, i64)> {
    let (base, unloc) = match name.split_once("_unloc_") {
        Some((base, suffix)) => (base, suffix.parse::<i64>().ok()?),
        None => (name, 0),
    };
    let numeric_part = base.strip_prefix(autosome_prefix).unwrap_or(base);
    let chr_num = numeric_part.parse::<i64>().ok().or_else(|| {
        // Single letter chromosome names (X, Y, W, Z, ...) sort after
        // numbered autosomes, in alphabetical order.
        if numeric_part.chars().all(|c| c.is_ascii_uppercase()) && !numeric_part.is_empty() {
            Some(1_000_000 + numeric_part.chars().next().unwrap() as i64)
        } else {
            None
        }
    })?;
    Some((chr_num, unloc))
}
