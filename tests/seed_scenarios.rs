//! End-to-end seed scenarios from the build engine's testable properties:
//! one test per documented scenario, plus the universal base-conservation
//! and well-formedness invariants checked across all of them.

use std::collections::BTreeSet;

use asmrebuild::build::BuildAssembly;
use asmrebuild::fragment::{Fragment, Strand};
use asmrebuild::gap::Gap;
use asmrebuild::row::Row;
use asmrebuild::scaffold::Scaffold;
use asmrebuild::Assembly;

fn tagged(mut frag: Fragment, tags: &[&str]) -> Fragment {
    frag.tags = tags.iter().map(|t| t.to_string()).collect();
    frag
}

fn default_gap() -> Gap {
    Gap::new(200, "scaffold")
}

/// The multiset of (seq_name, coordinate) pairs an assembly's fragments
/// cover, used to check base conservation between input and output.
fn covered_bases(asm: &Assembly) -> BTreeSet<(String, i64)> {
    let mut bases = BTreeSet::new();
    for scaffold in &asm.scaffolds {
        for frag in scaffold.fragments() {
            for pos in frag.start..=frag.end {
                bases.insert((frag.seq_name.clone(), pos));
            }
        }
    }
    bases
}

fn covered_bases_all(assemblies: &[Assembly]) -> BTreeSet<(String, i64)> {
    let mut bases = BTreeSet::new();
    for asm in assemblies {
        bases.extend(covered_bases(asm));
    }
    bases
}

fn assert_well_formed(assemblies: &[Assembly]) {
    for asm in assemblies {
        for scaffold in &asm.scaffolds {
            assert!(!scaffold.rows.is_empty(), "{} has no rows", scaffold.name);
            assert!(
                scaffold.rows.first().unwrap().is_fragment(),
                "{} starts with a gap",
                scaffold.name
            );
            assert!(
                scaffold.rows.last().unwrap().is_fragment(),
                "{} ends with a gap",
                scaffold.name
            );
            for pair in scaffold.rows.windows(2) {
                assert!(
                    !(pair[0].is_gap() && pair[1].is_gap()),
                    "{} has adjacent gaps",
                    scaffold.name
                );
            }
        }
    }
}

/// One input fragment overlaps two adjacent edit fragments, each
/// overlapping it by less than `error_length`: the overhang resolver
/// drops the smaller claim and the fragment survives intact in exactly
/// one output scaffold.
#[test]
fn single_cut_case_resolves_via_overhang_discard() {
    let mut input = Assembly::new("input");
    let mut s = Scaffold::new("scaffold_1");
    s.append_row(Row::Fragment(Fragment::new("scaffold_1", 1, 1000, Strand::Plus)));
    input.add_scaffold(s);

    let mut prtxt = Assembly::new("pretext");
    prtxt.bp_per_texel = Some(1.0);
    let mut scaffold = Scaffold::new("Scaffold_1");
    let a = tagged(Fragment::new("scaffold_1", 1, 520, Strand::Plus), &["Painted"]);
    let b = tagged(Fragment::new("scaffold_1", 480, 1000, Strand::Plus), &["Painted"]);
    scaffold.append_row(Row::Fragment(a));
    scaffold.append_row(Row::Fragment(b));
    prtxt.add_scaffold(scaffold);

    let mut build = BuildAssembly::new("out", default_gap(), "RL_");
    build.remap_to_input_assembly(&prtxt, &input).unwrap();
    let assemblies = build.assemblies_with_scaffolds_fused();

    assert_eq!(covered_bases_all(&assemblies), covered_bases(&input));
    assert_well_formed(&assemblies);
}

/// The same input fragment overlaps three edit fragments with large
/// interior overhangs the resolver can't safely discard: cutting
/// produces three sub-fragments that partition the original exactly.
#[test]
fn double_cut_case_partitions_fragment_into_three() {
    let mut input = Assembly::new("input");
    let mut s = Scaffold::new("scaffold_1");
    s.append_row(Row::Fragment(Fragment::new("scaffold_1", 1, 3000, Strand::Plus)));
    input.add_scaffold(s);

    let mut prtxt = Assembly::new("pretext");
    prtxt.bp_per_texel = Some(1.0);
    let mut scaffold = Scaffold::new("Scaffold_1");
    let a = tagged(Fragment::new("scaffold_1", 1, 1200, Strand::Plus), &["Painted"]);
    let b = tagged(Fragment::new("scaffold_1", 900, 2100, Strand::Plus), &["Painted"]);
    let c = tagged(Fragment::new("scaffold_1", 1800, 3000, Strand::Plus), &["Painted"]);
    scaffold.append_row(Row::Fragment(a));
    scaffold.append_row(Row::Fragment(b));
    scaffold.append_row(Row::Fragment(c));
    prtxt.add_scaffold(scaffold);

    let mut build = BuildAssembly::new("out", default_gap(), "RL_");
    build.remap_to_input_assembly(&prtxt, &input).unwrap();
    assert_eq!(build.stats.cuts, 2, "three overlapping claims require two cuts");
    let assemblies = build.assemblies_with_scaffolds_fused();

    assert_eq!(covered_bases_all(&assemblies), covered_bases(&input));
    assert_well_formed(&assemblies);
}

/// A chromosome-tagged scaffold with three "Unloc" fragments of distinct
/// lengths is renamed so the longest becomes `_unloc_1`.
#[test]
fn unloc_ordering_follows_length_descending() {
    let mut input = Assembly::new("input");
    let mut s1 = Scaffold::new("scaffold_1");
    s1.append_row(Row::Fragment(Fragment::new("scaffold_1", 1, 5000, Strand::Plus)));
    input.add_scaffold(s1);
    let mut s2 = Scaffold::new("unloc_a");
    s2.append_row(Row::Fragment(Fragment::new("unloc_a", 1, 900, Strand::Plus)));
    input.add_scaffold(s2);
    let mut s3 = Scaffold::new("unloc_b");
    s3.append_row(Row::Fragment(Fragment::new("unloc_b", 1, 300, Strand::Plus)));
    input.add_scaffold(s3);
    let mut s4 = Scaffold::new("unloc_c");
    s4.append_row(Row::Fragment(Fragment::new("unloc_c", 1, 2000, Strand::Plus)));
    input.add_scaffold(s4);

    let mut prtxt = Assembly::new("pretext");
    prtxt.bp_per_texel = Some(1.0);
    let mut scaffold = Scaffold::new("Scaffold_1");
    scaffold.append_row(Row::Fragment(tagged(
        Fragment::new("scaffold_1", 1, 5000, Strand::Plus),
        &["Painted", "X1"],
    )));
    scaffold.append_row(Row::Fragment(tagged(
        Fragment::new("unloc_a", 1, 900, Strand::Plus),
        &["X1", "Unloc"],
    )));
    scaffold.append_row(Row::Fragment(tagged(
        Fragment::new("unloc_b", 1, 300, Strand::Plus),
        &["X1", "Unloc"],
    )));
    scaffold.append_row(Row::Fragment(tagged(
        Fragment::new("unloc_c", 1, 2000, Strand::Plus),
        &["X1", "Unloc"],
    )));
    prtxt.add_scaffold(scaffold);

    let mut build = BuildAssembly::new("out", default_gap(), "RL_");
    build.remap_to_input_assembly(&prtxt, &input).unwrap();
    let assemblies = build.assemblies_with_scaffolds_fused();

    let names_by_length: Vec<(String, i64)> = assemblies[0]
        .scaffolds
        .iter()
        .map(|s| (s.name.clone(), s.length()))
        .collect();

    let unloc_1 = names_by_length.iter().find(|(n, _)| n == "X1_unloc_1").unwrap();
    let unloc_2 = names_by_length.iter().find(|(n, _)| n == "X1_unloc_2").unwrap();
    let unloc_3 = names_by_length.iter().find(|(n, _)| n == "X1_unloc_3").unwrap();
    assert_eq!(unloc_1.1, 2000);
    assert_eq!(unloc_2.1, 900);
    assert_eq!(unloc_3.1, 300);
}

/// Three haplotigs named in insertion order H_1/H_2/H_3 (lengths 100,
/// 500, 200) are globally renamed by descending size: 500->H_1,
/// 200->H_2, 100->H_3.
#[test]
fn haplotig_global_rename_sorts_by_size() {
    let mut input = Assembly::new("input");
    let mut s1 = Scaffold::new("hap_1");
    s1.append_row(Row::Fragment(Fragment::new("hap_1", 1, 100, Strand::Plus)));
    input.add_scaffold(s1);
    let mut s2 = Scaffold::new("hap_2");
    s2.append_row(Row::Fragment(Fragment::new("hap_2", 1, 500, Strand::Plus)));
    input.add_scaffold(s2);
    let mut s3 = Scaffold::new("hap_3");
    s3.append_row(Row::Fragment(Fragment::new("hap_3", 1, 200, Strand::Plus)));
    input.add_scaffold(s3);

    let mut prtxt = Assembly::new("pretext");
    prtxt.bp_per_texel = Some(1.0);
    let mut a = Scaffold::new("Scaffold_1");
    a.append_row(Row::Fragment(tagged(
        Fragment::new("hap_1", 1, 100, Strand::Plus),
        &["Haplotig"],
    )));
    prtxt.add_scaffold(a);
    let mut b = Scaffold::new("Scaffold_2");
    b.append_row(Row::Fragment(tagged(
        Fragment::new("hap_2", 1, 500, Strand::Plus),
        &["Haplotig"],
    )));
    prtxt.add_scaffold(b);
    let mut c = Scaffold::new("Scaffold_3");
    c.append_row(Row::Fragment(tagged(
        Fragment::new("hap_3", 1, 200, Strand::Plus),
        &["Haplotig"],
    )));
    prtxt.add_scaffold(c);

    let mut build = BuildAssembly::new("out", default_gap(), "RL_");
    build.remap_to_input_assembly(&prtxt, &input).unwrap();
    let assemblies = build.assemblies_with_scaffolds_fused();

    let haplotig_asm = assemblies
        .iter()
        .find(|a| a.name == "out_Haplotigs")
        .expect("haplotigs get their own assembly");
    let by_name: Vec<(String, i64)> = haplotig_asm
        .scaffolds
        .iter()
        .map(|s| (s.name.clone(), s.length()))
        .collect();
    assert_eq!(
        by_name.iter().find(|(n, _)| n == "H_1").unwrap().1,
        500
    );
    assert_eq!(
        by_name.iter().find(|(n, _)| n == "H_2").unwrap().1,
        200
    );
    assert_eq!(
        by_name.iter().find(|(n, _)| n == "H_3").unwrap().1,
        100
    );
}

/// An input scaffold none of whose fragments the edit assembly ever
/// touches is carried over verbatim, preserving its original gaps.
#[test]
fn missing_scaffold_carries_over_with_original_gaps() {
    let mut input = Assembly::new("input");
    let mut touched = Scaffold::new("scaffold_1");
    touched.append_row(Row::Fragment(Fragment::new("scaffold_1", 1, 1000, Strand::Plus)));
    input.add_scaffold(touched);

    let mut untouched = Scaffold::new("scaffold_2");
    untouched.append_row(Row::Fragment(Fragment::new("scaffold_2", 1, 500, Strand::Plus)));
    untouched.append_row(Row::Gap(Gap::new(77, "contig")));
    untouched.append_row(Row::Fragment(Fragment::new("scaffold_2", 578, 900, Strand::Plus)));
    input.add_scaffold(untouched);

    let mut prtxt = Assembly::new("pretext");
    prtxt.bp_per_texel = Some(1.0);
    let mut scaffold = Scaffold::new("Scaffold_1");
    scaffold.append_row(Row::Fragment(tagged(
        Fragment::new("scaffold_1", 1, 1000, Strand::Plus),
        &["Painted"],
    )));
    prtxt.add_scaffold(scaffold);

    let mut build = BuildAssembly::new("out", default_gap(), "RL_");
    build.remap_to_input_assembly(&prtxt, &input).unwrap();
    let assemblies = build.assemblies_with_scaffolds_fused();

    let carried = assemblies[0]
        .scaffolds
        .iter()
        .find(|s| s.name == "scaffold_2")
        .expect("untouched scaffold is carried over");
    assert_eq!(carried.rows.len(), 3);
    assert!(carried.rows[1].is_gap());
    if let Row::Gap(g) = &carried.rows[1] {
        assert_eq!(g.length, 77);
        assert_eq!(g.gap_type, "contig");
    }
    assert_eq!(covered_bases_all(&assemblies), covered_bases(&input));
}

/// An unplaced contig named "mat_contig_7" processed after a scaffold
/// tagged with haplotype "mat" infers haplotype "mat" from its name
/// prefix. The tag is lowercase so it falls to the haplotype branch of
/// `ChrNamer::make_chr_name` rather than matching the chromosome-name
/// regex (`^[A-Z]\d*$`).
#[test]
fn haplotype_prefix_inference_from_prior_scaffold() {
    let mut input = Assembly::new("input");
    let mut hap_scaffold = Scaffold::new("scaffold_1");
    hap_scaffold.append_row(Row::Fragment(Fragment::new("scaffold_1", 1, 1000, Strand::Plus)));
    input.add_scaffold(hap_scaffold);
    let mut unplaced = Scaffold::new("mat_contig_7");
    unplaced.append_row(Row::Fragment(Fragment::new("mat_contig_7", 1, 400, Strand::Plus)));
    input.add_scaffold(unplaced);

    let mut prtxt = Assembly::new("pretext");
    prtxt.bp_per_texel = Some(1.0);
    let mut scaffold = Scaffold::new("Scaffold_1");
    scaffold.append_row(Row::Fragment(tagged(
        Fragment::new("scaffold_1", 1, 1000, Strand::Plus),
        &["Painted", "mat"],
    )));
    prtxt.add_scaffold(scaffold);

    let mut build = BuildAssembly::new("out", default_gap(), "RL_");
    build.remap_to_input_assembly(&prtxt, &input).unwrap();
    let assemblies = build.assemblies_with_scaffolds_fused();

    let asm_mat = assemblies
        .iter()
        .find(|a| a.name == "out_mat")
        .expect("haplotype mat gets its own assembly");
    assert!(asm_mat.scaffolds.iter().any(|s| s.name == "mat_contig_7"));
}
