//! `IndexedAssembly`: wraps the input assembly with per-sequence sorted
//! interval storage, exposing `find_overlaps` for the build engine.
//!
//! Mirrors the teacher's `IntervalIndex` (`src/index.rs`): a
//! `HashMap<String, Vec<Fragment>>` sorted by start, scanned from a
//! binary-search starting point with an early break once a candidate's
//! start passes the query's end.

use std::collections::HashMap;

use crate::assembly::Assembly;
use crate::fragment::{Fragment, Strand};
use crate::overlap_result::OverlapResult;

pub struct IndexedAssembly {
    pub name: String,
    by_seq: HashMap<String, Vec<Fragment>>,
    /// Every indexed fragment's true, un-clipped span, keyed by
    /// `origin_id`. `find_overlaps` only ever clips a *cloned* candidate
    /// row before handing it to an `OverlapResult`; the entries here are
    /// never touched by that clipping, so the build engine can recover a
    /// shared fragment's real bounds after two baits have each trimmed
    /// their own copy differently.
    by_id: HashMap<u64, Fragment>,
}

impl IndexedAssembly {
    /// Indexes every fragment row across every scaffold of `input_asm`.
    pub fn from_assembly(input_asm: &Assembly) -> Self {
        let mut by_seq: HashMap<String, Vec<Fragment>> = HashMap::new();
        let mut by_id: HashMap<u64, Fragment> = HashMap::new();
        for scaffold in &input_asm.scaffolds {
            for frag in scaffold.fragments() {
                by_seq
                    .entry(frag.seq_name.clone())
                    .or_default()
                    .push(frag.clone());
                by_id.insert(frag.origin_id(), frag.clone());
            }
        }
        for frags in by_seq.values_mut() {
            frags.sort_by(|a, b| a.start.cmp(&b.start).then(a.end.cmp(&b.end)));
        }
        Self {
            name: input_asm.name.clone(),
            by_seq,
            by_id,
        }
    }

    /// The fragment exactly as it was indexed, before any per-bait
    /// clipping a `find_overlaps` call applied to its copy. The build
    /// engine uses this as the true span to partition when a fragment
    /// ends up claimed by more than one `OverlapResult` and has to be cut.
    pub fn original_fragment(&self, origin_id: u64) -> Option<&Fragment> {
        self.by_id.get(&origin_id)
    }

    /// Finds every indexed fragment overlapping `bait`, in input
    /// coordinate order, and wraps them as an `OverlapResult`: terminal
    /// rows are clipped so they don't extend beyond the bait by more than
    /// `error_length` bases, rows are strand-flipped and order-reversed
    /// when the bait is on the minus strand, and the overhangs are
    /// derived from the (possibly clipped) outer rows.
    pub fn find_overlaps(&self, bait: &Fragment, error_length: i64) -> Option<OverlapResult> {
        let candidates = self.by_seq.get(&bait.seq_name)?;

        let start_idx = candidates.partition_point(|f| f.end < bait.start);
        let mut hits: Vec<Fragment> = Vec::new();
        for frag in &candidates[start_idx..] {
            if frag.start > bait.end {
                break;
            }
            if frag.overlaps(bait) {
                hits.push(frag.clone());
            }
        }

        if hits.is_empty() {
            return None;
        }

        clip_terminal_row(&mut hits[0], bait, error_length, Side::Start);
        let last = hits.len() - 1;
        clip_terminal_row(&mut hits[last], bait, error_length, Side::End);

        if bait.strand == Strand::Minus {
            hits.reverse();
            for frag in &mut hits {
                *frag = frag.reverse();
            }
        }

        Some(OverlapResult::new(bait.clone(), hits))
    }
}

enum Side {
    Start,
    End,
}

/// Pulls a terminal row's outward edge in to `bait ± error_length` when it
/// extends further than that. This is a soft clamp, not the noise-discard
/// `OverlapResult::trim_large_overhangs` later performs — a row can still
/// come out of this with an overhang of exactly `error_length`.
fn clip_terminal_row(frag: &mut Fragment, bait: &Fragment, error_length: i64, side: Side) {
    match side {
        Side::Start => {
            let floor = bait.start - error_length;
            if frag.start < floor {
                *frag = frag.trimmed(floor.max(frag.start), frag.end);
            }
        }
        Side::End => {
            let ceiling = bait.end + error_length;
            if frag.end > ceiling {
                *frag = frag.trimmed(frag.start, ceiling.min(frag.end));
            }
        }
    }
}
