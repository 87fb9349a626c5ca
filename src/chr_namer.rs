//! Ports `ChrNamer` from the original curation pipeline's
//! `build_utils.py`: decides what each curator-edited scaffold should be
//! named and tagged as, as the build walks through the Pretext assembly
//! scaffold by scaffold.

use std::collections::BTreeSet;
use std::sync::OnceLock;

use regex::Regex;

use crate::build::BuiltRow;
use crate::error::{BuildError, BuildResult};
use crate::overlap_result::OverlapResult;
use crate::scaffold::Scaffold;

fn chr_tag_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Z]\d*$").unwrap())
}

fn haplotype_prefix_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^([^_]+)_").unwrap())
}

pub struct ChrNamer {
    pub autosome_prefix: String,
    chr_name_n: u32,
    pub current_chr_name: Option<String>,
    pub current_haplotype: Option<String>,
    haplotig_n: u32,
    haplotig_indices: Vec<usize>,
    unloc_n: u32,
    unloc_indices: Vec<usize>,
    haplotype_set: BTreeSet<String>,
}

impl ChrNamer {
    pub fn new(autosome_prefix: impl Into<String>) -> Self {
        Self {
            autosome_prefix: autosome_prefix.into(),
            chr_name_n: 0,
            current_chr_name: None,
            current_haplotype: None,
            haplotig_n: 0,
            haplotig_indices: Vec::new(),
            unloc_n: 0,
            unloc_indices: Vec::new(),
            haplotype_set: BTreeSet::new(),
        }
    }

    /// Works out what the chromosome name and haplotype for the scaffold's
    /// fragments should be, from the union of curator tags carried on it.
    /// Resets the unloc counter — unloc numbering restarts per scaffold,
    /// haplotig numbering does not.
    pub fn make_chr_name(&mut self, scaffold: &Scaffold) -> BuildResult<()> {
        let mut chr_name: Option<String> = None;
        let mut haplotype: Option<String> = None;
        let mut is_painted = false;

        for tag in scaffold.fragment_tags() {
            if tag == "Painted" {
                is_painted = true;
            } else if chr_tag_re().is_match(&tag) {
                if let Some(existing) = &chr_name {
                    if *existing != tag {
                        return Err(BuildError::InconsistentChrName {
                            scaffold: scaffold.name.clone(),
                            first: existing.clone(),
                            second: tag,
                        });
                    }
                } else {
                    chr_name = Some(tag);
                }
            } else if !matches!(tag.as_str(), "Contaminant" | "Cut" | "Haplotig" | "Unloc") {
                if let Some(existing) = &haplotype {
                    if *existing != tag {
                        return Err(BuildError::InconsistentHaplotype {
                            scaffold: scaffold.name.clone(),
                            first: existing.clone(),
                            second: tag,
                        });
                    }
                } else {
                    haplotype = Some(tag);
                }
            }
        }

        let chr_name = match chr_name {
            Some(name) => name,
            None if is_painted => self.autosome_name(),
            None => {
                // Unpainted scaffolds keep the name they had in the input
                // assembly.
                let name = scaffold
                    .fragments()
                    .next()
                    .map(|f| f.seq_name.clone())
                    .unwrap_or_default();
                // Does its name begin with the name of a haplotype already
                // seen? This fails if unplaced contigs from a haplotype
                // appear before the first scaffold assigned to it in the
                // Pretext assembly — inherited from the original pipeline,
                // not fixed here.
                if let Some(caps) = haplotype_prefix_re().captures(&name) {
                    let prefix = caps[1].to_string();
                    if self.haplotype_set.contains(&prefix) {
                        haplotype = Some(prefix);
                    }
                }
                name
            }
        };

        self.current_chr_name = Some(chr_name);
        self.current_haplotype = haplotype.clone();
        if let Some(hap) = haplotype {
            self.haplotype_set.insert(hap);
        }
        self.unloc_n = 0;
        self.unloc_indices.clear();
        Ok(())
    }

    /// Names and tags a single per-bait `OverlapResult`, based on the
    /// curator tags carried by the edit fragment it was found for.
    /// `index` is the slot this result will occupy in the build's
    /// scaffold list, recorded so a later size-based rename can find it.
    pub fn label_scaffold(
        &mut self,
        found: &mut OverlapResult,
        fragment_tags: &BTreeSet<String>,
        index: usize,
    ) {
        let mut name = self.current_chr_name.clone().unwrap_or_default();
        if fragment_tags.contains("Contaminant") {
            found.tag = Some("Contaminant".to_string());
        } else if fragment_tags.contains("Haplotig") {
            name = self.haplotig_name();
            found.tag = Some("Haplotig".to_string());
            self.haplotig_indices.push(index);
        } else if fragment_tags.contains("Unloc") {
            name = self.unloc_name();
            self.unloc_indices.push(index);
        }
        found.name = name;
        found.haplotype = self.current_haplotype.clone();
    }

    fn autosome_name(&mut self) -> String {
        self.chr_name_n += 1;
        format!("{}{}", self.autosome_prefix, self.chr_name_n)
    }

    fn haplotig_name(&mut self) -> String {
        self.haplotig_n += 1;
        format!("H_{}", self.haplotig_n)
    }

    fn unloc_name(&mut self) -> String {
        self.unloc_n += 1;
        format!(
            "{}_unloc_{}",
            self.current_chr_name.clone().unwrap_or_default(),
            self.unloc_n
        )
    }

    pub fn rename_haplotigs_by_size(&mut self, scaffolds: &mut [BuiltRow]) {
        let indices = self.haplotig_indices.clone();
        rename_by_size(&indices, scaffolds);
    }

    pub fn rename_unlocs_by_size(&mut self, scaffolds: &mut [BuiltRow]) {
        let indices = self.unloc_indices.clone();
        rename_by_size(&indices, scaffolds);
    }
}

/// Sorts the named slots by length descending, then reassigns the
/// *original* name list in that new order — so e.g. the largest unloc
/// contig always ends up `_unloc_1` regardless of the order fragments were
/// discovered in.
fn rename_by_size(indices: &[usize], scaffolds: &mut [BuiltRow]) {
    if indices.is_empty() {
        return;
    }
    let original_names: Vec<String> = indices.iter().map(|&i| scaffolds[i].name().to_string()).collect();
    let mut by_size = indices.to_vec();
    by_size.sort_by_key(|&i| std::cmp::Reverse(scaffolds[i].length()));
    for (&idx, name) in by_size.iter().zip(original_names) {
        scaffolds[idx].set_name(name);
    }
}
