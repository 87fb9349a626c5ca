//! `BuildAssembly`: reconciles a curator-edited assembly against the
//! input assembly it was derived from. Ported from `BuildAssembly` in the
//! original curation pipeline's `build_assembly.py`.
//!
//! Holds a list of mutable [`BuiltRow`]s rather than finished
//! [`Scaffold`]s, since the same curator-named chromosome is typically
//! assembled from several separately-found [`OverlapResult`]s (one per
//! Pretext fragment) that are only fused together at the very end by
//! [`BuildAssembly::assemblies_with_scaffolds_fused`].

use std::collections::HashMap;

use crate::assembly::Assembly;
use crate::chr_namer::ChrNamer;
use crate::error::{BuildError, BuildResult};
use crate::fragment::Fragment;
use crate::gap::Gap;
use crate::indexed_assembly::IndexedAssembly;
use crate::overhang::{resolve_premises, OverhangPremise};
use crate::overlap_result::{OverlapResult, Terminus};
use crate::row::Row;
use crate::scaffold::Scaffold;
use crate::stats::AssemblyStats;

/// A slot in [`BuildAssembly::scaffolds`]: either a freshly-found overlap
/// against one Pretext fragment, or a whole input scaffold carried across
/// unedited (see [`BuildAssembly::add_missing_scaffolds_from_input`]).
#[derive(Debug, Clone)]
pub enum BuiltRow {
    Found(OverlapResult),
    Carried(Scaffold),
}

impl BuiltRow {
    pub fn name(&self) -> &str {
        match self {
            BuiltRow::Found(r) => &r.name,
            BuiltRow::Carried(s) => &s.name,
        }
    }

    pub fn set_name(&mut self, name: String) {
        match self {
            BuiltRow::Found(r) => r.name = name,
            BuiltRow::Carried(s) => s.name = name,
        }
    }

    pub fn length(&self) -> i64 {
        match self {
            BuiltRow::Found(r) => r.length(),
            BuiltRow::Carried(s) => s.length(),
        }
    }

    pub fn haplotype(&self) -> Option<&str> {
        match self {
            BuiltRow::Found(r) => r.haplotype.as_deref(),
            BuiltRow::Carried(s) => s.haplotype.as_deref(),
        }
    }

    pub fn tag(&self) -> Option<&str> {
        match self {
            BuiltRow::Found(r) => r.tag.as_deref(),
            BuiltRow::Carried(s) => s.tag.as_deref(),
        }
    }

    pub fn rows_is_empty(&self) -> bool {
        match self {
            BuiltRow::Found(r) => r.is_empty(),
            BuiltRow::Carried(s) => s.is_empty(),
        }
    }
}

/// Tracks every input-assembly fragment that has been claimed by at least
/// one [`OverlapResult`], and which of [`BuildAssembly::scaffolds`] claim
/// it, keyed by the fragment's stable `origin_id` rather than its
/// coordinates — two `OverlapResult`s can independently clip a shared
/// fragment to different extents, which would hide the overlap from a
/// coordinate-keyed lookup.
struct FoundFragment {
    origin_id: u64,
    /// The fragment's true span as indexed from the input assembly —
    /// never a per-bait clipped copy — so `cut_fragments` has the real
    /// outer bounds to partition between claims.
    original: Fragment,
    scaffold_indices: Vec<usize>,
}

pub struct BuildAssembly {
    pub name: String,
    pub header_lines: Vec<String>,
    pub bp_per_texel: Option<f64>,
    pub default_gap: Gap,
    pub scaffolds: Vec<BuiltRow>,
    pub chr_namer: ChrNamer,
    pub stats: AssemblyStats,
    found_fragments: Vec<FoundFragment>,
    found_index: HashMap<u64, usize>,
}

impl BuildAssembly {
    pub fn new(name: impl Into<String>, default_gap: Gap, autosome_prefix: impl Into<String>) -> Self {
        let autosome_prefix = autosome_prefix.into();
        Self {
            name: name.into(),
            header_lines: Vec::new(),
            bp_per_texel: None,
            default_gap,
            scaffolds: Vec::new(),
            chr_namer: ChrNamer::new(autosome_prefix.clone()),
            stats: AssemblyStats::new(autosome_prefix),
            found_fragments: Vec::new(),
            found_index: HashMap::new(),
        }
    }

    /// Expected maximum noise from the Pretext pixel grid, in bases:
    /// `bp_per_texel` rounded up to the next whole base so a resolution
    /// like `2300.0` still yields an error margin strictly larger than the
    /// smallest texel.
    pub fn error_length(&self) -> i64 {
        1 + self.bp_per_texel.unwrap_or(0.0).floor() as i64
    }

    pub fn remap_to_input_assembly(&mut self, prtxt_asm: &Assembly, input_asm: &Assembly) -> BuildResult<()> {
        if self.bp_per_texel.is_none() {
            self.bp_per_texel = prtxt_asm.bp_per_texel;
        }
        self.stats.input_assembly_name = Some(input_asm.name.clone());
        self.stats.input_total_length = input_asm.scaffolds.iter().map(Scaffold::length).sum();

        let indexed = IndexedAssembly::from_assembly(input_asm);
        self.find_assembly_overlaps(prtxt_asm, &indexed)?;
        self.discard_overhanging_fragments();
        self.cut_remaining_overhangs()?;
        self.chr_namer.rename_haplotigs_by_size(&mut self.scaffolds);
        self.add_missing_scaffolds_from_input(input_asm)?;
        Ok(())
    }

    fn find_assembly_overlaps(&mut self, prtxt_asm: &Assembly, input_asm: &IndexedAssembly) -> BuildResult<()> {
        let err_length = self.error_length();
        log::info!(
            "Pretext resolution = {:.0} bp per texel",
            self.bp_per_texel.unwrap_or(0.0)
        );
        for prtxt_scaffold in &prtxt_asm.scaffolds {
            self.chr_namer.make_chr_name(prtxt_scaffold)?;
            for prtxt_frag in prtxt_scaffold.fragments() {
                if let Some(mut found) = input_asm.find_overlaps(prtxt_frag, err_length) {
                    let index = self.scaffolds.len();
                    self.chr_namer.label_scaffold(&mut found, &prtxt_frag.tags, index);
                    found.trim_large_overhangs(err_length);
                    if !found.is_empty() {
                        self.store_fragments_found(&found, index, input_asm);
                        self.scaffolds.push(BuiltRow::Found(found));
                    }
                } else {
                    log::warn!("No overlaps found for: {prtxt_frag}");
                }
            }
            self.chr_namer.rename_unlocs_by_size(&mut self.scaffolds);
        }
        Ok(())
    }

    /// Records that `found` (just placed at `index` in `self.scaffolds`)
    /// claims each of its rows. `original` is always looked up from
    /// `input_asm`'s pristine index rather than cloned from `found.rows`
    /// directly: by this point `found`'s terminal rows may already have
    /// been clipped to *this* bait's `± error_length` window, and that
    /// clipped copy is not the span `cut_fragments` must later partition.
    fn store_fragments_found(&mut self, found: &OverlapResult, index: usize, input_asm: &IndexedAssembly) {
        for frag in &found.rows {
            let origin_id = frag.origin_id();
            if let Some(&fi) = self.found_index.get(&origin_id) {
                self.found_fragments[fi].scaffold_indices.push(index);
            } else {
                let fi = self.found_fragments.len();
                let original = input_asm.original_fragment(origin_id).cloned().unwrap_or_else(|| frag.clone());
                self.found_fragments.push(FoundFragment {
                    origin_id,
                    original,
                    scaffold_indices: vec![index],
                });
                self.found_index.insert(origin_id, fi);
            }
        }
    }

    /// Repeatedly looks for input fragments claimed by more than one
    /// scaffold and, where dropping one claim's terminal row would
    /// genuinely shrink the overhang rather than trade it for a worse one,
    /// drops it — so trivial pixel-grid noise is resolved without cutting
    /// the underlying fragment.
    fn discard_overhanging_fragments(&mut self) {
        let err_length = self.error_length();
        loop {
            let multi: Vec<u64> = self
                .found_fragments
                .iter()
                .filter(|f| f.scaffold_indices.len() > 1)
                .map(|f| f.origin_id)
                .collect();
            if multi.is_empty() {
                break;
            }

            let mut fixes: Vec<(u64, usize)> = Vec::new();
            for origin_id in multi {
                let fi = self.found_index[&origin_id];
                let scaffold_indices = self.found_fragments[fi].scaffold_indices.clone();
                let mut candidates: Vec<(usize, OverhangPremise)> = Vec::new();
                for sidx in scaffold_indices {
                    if let BuiltRow::Found(result) = &self.scaffolds[sidx] {
                        if let Some(end) = result.terminal_end_for(origin_id) {
                            candidates.push((sidx, OverhangPremise::new(sidx, end, result)));
                        }
                    }
                }
                if candidates.len() < 2 {
                    continue;
                }
                let premises: Vec<OverhangPremise> = candidates.iter().map(|(_, p)| *p).collect();
                if let Some(winner) = resolve_premises(&premises, err_length) {
                    fixes.push((origin_id, candidates[winner].0));
                }
            }

            if fixes.is_empty() {
                break;
            }

            for (origin_id, sidx) in fixes {
                if let BuiltRow::Found(result) = &mut self.scaffolds[sidx] {
                    match result.terminal_end_for(origin_id) {
                        Some(Terminus::Start) => result.discard_start(),
                        Some(Terminus::End) => result.discard_end(),
                        None => {}
                    }
                }
                let fi = self.found_index[&origin_id];
                self.found_fragments[fi].scaffold_indices.retain(|&i| i != sidx);
            }
        }
    }

    /// Whatever sharing `discard_overhanging_fragments` couldn't resolve by
    /// dropping a claim outright gets physically cut: one new sub-fragment
    /// per claiming scaffold, partitioning the original fragment exactly.
    fn cut_remaining_overhangs(&mut self) -> BuildResult<()> {
        let multi: Vec<usize> = self
            .found_fragments
            .iter()
            .enumerate()
            .filter(|(_, f)| f.scaffold_indices.len() > 1)
            .map(|(i, _)| i)
            .collect();
        for fi in multi {
            self.cut_fragments(fi)?;
        }
        Ok(())
    }

    fn cut_fragments(&mut self, fi: usize) -> BuildResult<()> {
        let origin_id = self.found_fragments[fi].origin_id;
        let original = self.found_fragments[fi].original.clone();
        let mut scaffold_indices = self.found_fragments[fi].scaffold_indices.clone();
        scaffold_indices.sort_by_key(|&sidx| match &self.scaffolds[sidx] {
            BuiltRow::Found(r) => r.fragment_start_if_trimmed(origin_id).unwrap_or(original.start),
            BuiltRow::Carried(_) => original.start,
        });

        // Each claim's own row has already been independently clipped to
        // its own bait's `± error_length` window, so two neighbouring
        // claims' current bounds routinely overlap one another — they
        // can't be used directly as a shared cut boundary. Instead, find
        // where each pair of neighbours' claimed spans meet and split at
        // the midpoint, then carve the *original*, un-clipped fragment at
        // those boundaries: this always yields pieces that abut exactly
        // once each and partition the original with no gaps or overlaps.
        let n = scaffold_indices.len();
        let last_i = n.saturating_sub(1);
        let current_bounds: Vec<(i64, i64)> = scaffold_indices
            .iter()
            .map(|&sidx| match &self.scaffolds[sidx] {
                BuiltRow::Found(result) => {
                    let row_idx = result
                        .row_index_for(origin_id)
                        .expect("fragment claimed by this scaffold must still be present");
                    let row = &result.rows[row_idx];
                    (row.start, row.end)
                }
                BuiltRow::Carried(_) => (original.start, original.end),
            })
            .collect();

        let mut boundaries: Vec<i64> = Vec::with_capacity(n.saturating_sub(1));
        let mut prev_boundary = original.start - 1;
        for i in 0..n.saturating_sub(1) {
            let (_, end_i) = current_bounds[i];
            let (start_next, _) = current_bounds[i + 1];
            let midpoint = (end_i + start_next) / 2;
            let remaining_after = (last_i - i) as i64;
            let boundary = midpoint.max(prev_boundary + 1).min(original.end - remaining_after);
            boundaries.push(boundary);
            prev_boundary = boundary;
        }

        let mut sub_fragments = Vec::with_capacity(n);
        for (i, &sidx) in scaffold_indices.iter().enumerate() {
            let BuiltRow::Found(result) = &mut self.scaffolds[sidx] else {
                continue;
            };
            let row_idx = result
                .row_index_for(origin_id)
                .expect("fragment claimed by this scaffold must still be present");
            let current = result.rows[row_idx].clone();
            let new_start = if i == 0 { original.start } else { boundaries[i - 1] + 1 };
            let new_end = if i == last_i { original.end } else { boundaries[i] };
            let piece = original.trimmed_oriented(new_start, new_end, current.strand);
            result.replace_shared_fragment(origin_id, piece.clone());
            sub_fragments.push(piece);
        }

        self.qc_sub_fragments(&original, &sub_fragments)?;
        self.stats.cuts += sub_fragments.len().saturating_sub(1) as u64;

        log::warn!(
            "Contig:\n  {:>15}  {original}\ncut into:\n{}",
            original.length(),
            sub_fragments
                .iter()
                .map(|s| format!("  {:>15}  {s}\n", s.length()))
                .collect::<String>()
        );
        Ok(())
    }

    /// Checks that the cut sub-fragments partition the original fragment
    /// exactly: lengths sum to the original length, no pair overlaps, and
    /// exactly `n - 1` pairs abut (a clean left-to-right chain).
    fn qc_sub_fragments(&self, original: &Fragment, sub_fragments: &[Fragment]) -> BuildResult<()> {
        let n = sub_fragments.len();
        let mut abut_count = 0;
        let mut overlap_count = 0;
        for i in 0..n {
            for j in (i + 1)..n {
                if sub_fragments[i].abuts(&sub_fragments[j]) {
                    abut_count += 1;
                }
                if sub_fragments[i].overlaps(&sub_fragments[j]) {
                    overlap_count += 1;
                }
            }
        }

        let summed: i64 = sub_fragments.iter().map(Fragment::length).sum();
        let mut message = String::new();
        if summed != original.length() {
            message.push_str(&format!(
                "sum of fragment lengths {summed} does not match original fragment length {}\n",
                original.length()
            ));
        }
        if overlap_count != 0 {
            message.push_str(&format!("expecting 0 but got {overlap_count} overlaps in new sub fragments\n"));
        }
        if abut_count != n.saturating_sub(1) {
            message.push_str(&format!(
                "expecting {} abutting sub fragments but got {abut_count}\n",
                n.saturating_sub(1)
            ));
        }

        if message.is_empty() {
            Ok(())
        } else {
            Err(BuildError::FragmentConservationViolation {
                fragment: original.to_string(),
                message,
            })
        }
    }

    /// Input scaffolds (or runs of fragments within one) that no Pretext
    /// fragment ever overlapped get carried into the output verbatim,
    /// named as if they were their own unpainted scaffold.
    fn add_missing_scaffolds_from_input(&mut self, input_asm: &Assembly) -> BuildResult<()> {
        for scaffold in &input_asm.scaffolds {
            let mut new_scaffold: Option<Scaffold> = None;
            let mut last_added_i: Option<usize> = None;
            for (i, frag) in scaffold.idx_fragments() {
                if self.found_index.contains_key(&frag.origin_id()) {
                    continue;
                }
                let ns = new_scaffold.get_or_insert_with(|| Scaffold::new(scaffold.name.clone()));
                if let Some(last_i) = last_added_i {
                    if last_i + 1 != i {
                        match &scaffold.rows[i - 1] {
                            Row::Gap(g) => ns.append_row(Row::Gap(g.clone())),
                            Row::Fragment(_) => ns.append_row(Row::Gap(self.default_gap.clone())),
                        }
                    }
                }
                ns.append_row(Row::Fragment(frag.clone()));
                last_added_i = Some(i);
            }

            if let Some(mut ns) = new_scaffold {
                self.chr_namer.make_chr_name(&ns)?;
                ns.haplotype = self.chr_namer.current_haplotype.clone();
                self.scaffolds.push(BuiltRow::Carried(ns));
            }
        }
        Ok(())
    }

    /// Fuses consecutive `(haplotype, name)`-matching entries of
    /// `self.scaffolds` into whole [`Scaffold`]s, consuming `self.scaffolds`
    /// in the process.
    fn scaffolds_fused_by_name(&mut self) -> Vec<Scaffold> {
        let gap = self.default_gap.clone();
        let mut fused = Vec::new();
        let mut current: Option<Scaffold> = None;
        let mut current_hap_chr: Option<(Option<String>, String)> = None;

        for built in self.scaffolds.drain(..) {
            if built.rows_is_empty() {
                // discard_overhanging_fragments may have emptied this
                // OverlapResult entirely.
                continue;
            }

            let hap_chr = (built.haplotype().map(str::to_string), built.name().to_string());
            if current_hap_chr.as_ref() != Some(&hap_chr) {
                if let Some(finished) = current.take() {
                    fused.push(finished);
                }
                current = Some(Scaffold::with_tag(
                    hap_chr.1.clone(),
                    built.tag().map(str::to_string),
                    built.haplotype().map(str::to_string),
                ));
                current_hap_chr = Some(hap_chr);
            }

            let scaffold = current.as_mut().expect("just assigned above");
            match built {
                BuiltRow::Found(result) => scaffold.append_scaffold(result.to_scaffold(), &gap),
                BuiltRow::Carried(carried) => scaffold.append_scaffold(carried, &gap),
            }
        }

        if let Some(finished) = current.take() {
            fused.push(finished);
        }
        fused
    }

    /// Splits the fused scaffolds into one [`Assembly`] per tag/haplotype
    /// group (contaminants, each haplotig set, each haplotype's own
    /// assembly) plus the primary assembly for everything else, each
    /// smart-sorted and tallied into `self.stats`.
    pub fn assemblies_with_scaffolds_fused(&mut self) -> Vec<Assembly> {
        let autosome_prefix = self.chr_namer.autosome_prefix.clone();
        let base_name = self.name.clone();
        let mut order: Vec<Option<String>> = Vec::new();
        let mut assemblies: HashMap<Option<String>, Assembly> = HashMap::new();

        for scaffold in self.scaffolds_fused_by_name() {
            let (asm_key, asm_name) = if let Some(tag) = scaffold.tag.clone() {
                let name = format!("{base_name}_{tag}s");
                (Some(tag), name)
            } else if let Some(hap) = scaffold.haplotype.clone() {
                let name = format!("{base_name}_{hap}");
                (Some(hap), name)
            } else {
                (None, base_name.clone())
            };

            assemblies.entry(asm_key.clone()).or_insert_with(|| {
                order.push(asm_key.clone());
                Assembly::new(asm_name)
            });
            assemblies.get_mut(&asm_key).expect("just inserted").add_scaffold(scaffold);
        }

        let mut asm_list: Vec<Assembly> = order
            .into_iter()
            .map(|key| assemblies.remove(&key).expect("key came from this map"))
            .collect();
        for asm in &mut asm_list {
            asm.smart_sort_scaffolds(&autosome_prefix);
        }

        self.stats.make_stats(&asm_list);
        asm_list
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fragment::Strand;
    use crate::row::Row;

    fn input_assembly() -> Assembly {
        let mut asm = Assembly::new("input");
        let mut s = Scaffold::new("scaffold_1");
        s.append_row(Row::Fragment(Fragment::new("scaffold_1", 1, 1000, Strand::Plus)));
        asm.add_scaffold(s);
        asm
    }

    fn pretext_assembly(tags: &[&str]) -> Assembly {
        let mut asm = Assembly::new("pretext");
        asm.bp_per_texel = Some(10.0);
        let mut s = Scaffold::new("Scaffold_1");
        let mut frag = Fragment::new("scaffold_1", 1, 1000, Strand::Plus);
        frag.tags = tags.iter().map(|t| t.to_string()).collect();
        s.append_row(Row::Fragment(frag));
        asm.add_scaffold(s);
        asm
    }

    #[test]
    fn remap_carries_a_single_clean_fragment_through() {
        let input = input_assembly();
        let prtxt = pretext_assembly(&["Painted"]);
        let mut build = BuildAssembly::new("out", Gap::new(200, "scaffold"), "RL_");
        build.remap_to_input_assembly(&prtxt, &input).unwrap();
        let assemblies = build.assemblies_with_scaffolds_fused();
        assert_eq!(assemblies.len(), 1);
        assert_eq!(assemblies[0].scaffolds.len(), 1);
        assert_eq!(assemblies[0].scaffolds[0].name, "RL_1");
        assert_eq!(assemblies[0].scaffolds[0].length(), 1000);
    }

    #[test]
    fn unclaimed_input_scaffold_is_carried_over() {
        let mut input = input_assembly();
        let mut extra = Scaffold::new("scaffold_2");
        extra.append_row(Row::Fragment(Fragment::new("scaffold_2", 1, 500, Strand::Plus)));
        input.add_scaffold(extra);

        let prtxt = pretext_assembly(&["Painted"]);
        let mut build = BuildAssembly::new("out", Gap::new(200, "scaffold"), "RL_");
        build.remap_to_input_assembly(&prtxt, &input).unwrap();
        let assemblies = build.assemblies_with_scaffolds_fused();
        let names: Vec<_> = assemblies[0].scaffolds.iter().map(|s| s.name.clone()).collect();
        assert!(names.contains(&"scaffold_2".to_string()));
    }

    #[test]
    fn overlapping_claims_at_a_shared_boundary_get_cut() {
        let input = input_assembly();
        let mut prtxt = Assembly::new("pretext");
        prtxt.bp_per_texel = Some(1.0);
        let mut s = Scaffold::new("Scaffold_1");
        let mut a = Fragment::new("scaffold_1", 1, 520, Strand::Plus);
        a.tags.insert("Painted".to_string());
        let mut b = Fragment::new("scaffold_1", 480, 1000, Strand::Plus);
        b.tags.insert("Painted".to_string());
        s.append_row(Row::Fragment(a));
        s.append_row(Row::Fragment(b));
        prtxt.add_scaffold(s);

        let mut build = BuildAssembly::new("out", Gap::new(200, "scaffold"), "RL_");
        build.remap_to_input_assembly(&prtxt, &input).unwrap();
        let assemblies = build.assemblies_with_scaffolds_fused();
        let total: i64 = assemblies[0].scaffolds.iter().map(|s| s.length()).sum();
        assert_eq!(total, 1000);
    }
}
