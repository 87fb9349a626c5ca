//! `OverlapResult`: the input fragments overlapping one edit fragment
//! (the "bait"), plus bookkeeping of the start/end overhangs relative to
//! that bait.
//!
//! Unlike a general [`Scaffold`], every row here is a [`Fragment`] — the
//! index never produces gap rows, since a gap can't "overlap" a bait.

use crate::fragment::Fragment;
use crate::row::Row;
use crate::scaffold::Scaffold;

/// Which end of an `OverlapResult`'s row list a shared fragment occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Terminus {
    Start,
    End,
}

#[derive(Debug, Clone)]
pub struct OverlapResult {
    pub name: String,
    pub rows: Vec<Fragment>,
    pub haplotype: Option<String>,
    pub tag: Option<String>,
    pub bait: Fragment,
    pub start_overhang: i64,
    pub end_overhang: i64,
}

impl OverlapResult {
    /// Builds a fresh OverlapResult from fragments already ordered and
    /// trimmed by [`crate::indexed_assembly::IndexedAssembly::find_overlaps`].
    pub fn new(bait: Fragment, rows: Vec<Fragment>) -> Self {
        assert!(!rows.is_empty(), "OverlapResult must have at least one row");
        let mut result = Self {
            name: bait.seq_name.clone(),
            rows,
            haplotype: None,
            tag: None,
            bait,
            start_overhang: 0,
            end_overhang: 0,
        };
        result.recompute_start_overhang();
        result.recompute_end_overhang();
        result
    }

    pub fn length(&self) -> i64 {
        self.rows.iter().map(Fragment::length).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn recompute_start_overhang(&mut self) {
        self.start_overhang = match self.rows.first() {
            Some(first) => self.bait.start - first.start,
            None => 0,
        };
    }

    fn recompute_end_overhang(&mut self) {
        self.end_overhang = match self.rows.last() {
            Some(last) => last.end - self.bait.end,
            None => 0,
        };
    }

    /// Bases of overlap between the first row and the bait.
    pub fn start_row_bait_overlap(&self) -> i64 {
        self.rows
            .first()
            .map(|row| overlap_len(row, &self.bait))
            .unwrap_or(0)
    }

    /// Bases of overlap between the last row and the bait.
    pub fn end_row_bait_overlap(&self) -> i64 {
        self.rows
            .last()
            .map(|row| overlap_len(row, &self.bait))
            .unwrap_or(0)
    }

    /// What `start_overhang` would become if the first row were removed.
    /// Falls back to the current value when there's nothing left to fall
    /// back to (a single-row result) — `OverhangPremise::improves` always
    /// rejects that case anyway.
    pub fn overhang_if_start_removed(&self) -> i64 {
        match self.rows.get(1) {
            Some(next) => self.bait.start - next.start,
            None => self.start_overhang,
        }
    }

    /// What `end_overhang` would become if the last row were removed.
    pub fn overhang_if_end_removed(&self) -> i64 {
        if self.rows.len() > 1 {
            let penultimate = &self.rows[self.rows.len() - 2];
            penultimate.end - self.bait.end
        } else {
            self.end_overhang
        }
    }

    /// Removes the first row and recomputes `start_overhang`.
    pub fn discard_start(&mut self) {
        if !self.rows.is_empty() {
            self.rows.remove(0);
            self.recompute_start_overhang();
        }
    }

    /// Removes the last row and recomputes `end_overhang`.
    pub fn discard_end(&mut self) {
        if self.rows.pop().is_some() {
            self.recompute_end_overhang();
        }
    }

    /// Discards terminal rows that extend past the bait by more than
    /// `err_length` bases of undisputed noise, *provided* the row's inner
    /// boundary still lies inside the bait (so the row genuinely overlaps
    /// the bait; it isn't being thrown away wholesale). Interior rows are
    /// never touched.
    pub fn trim_large_overhangs(&mut self, err_length: i64) {
        if self.rows.len() > 1 && self.start_overhang > err_length {
            let inner = self.rows[0].end;
            if inner >= self.bait.start && inner <= self.bait.end {
                self.discard_start();
            }
        }
        if self.rows.len() > 1 && self.end_overhang > err_length {
            let last = self.rows.len() - 1;
            let inner = self.rows[last].start;
            if inner >= self.bait.start && inner <= self.bait.end {
                self.discard_end();
            }
        }
    }

    /// The row index currently standing in for the fragment with this
    /// `origin_id`, if this OverlapResult still claims it.
    pub fn row_index_for(&self, origin_id: u64) -> Option<usize> {
        self.rows.iter().position(|f| f.origin_id() == origin_id)
    }

    /// Which terminal end the row claiming `origin_id` currently occupies,
    /// if either — used to decide whether a shared fragment can be dropped
    /// from this OverlapResult at all (interior rows never compete for
    /// removal). A single-row result reports `Start`, matching the first
    /// check winning in the original `rows[0] is fragment` test.
    pub fn terminal_end_for(&self, origin_id: u64) -> Option<Terminus> {
        if self.rows.first().map(Fragment::origin_id) == Some(origin_id) {
            Some(Terminus::Start)
        } else if self.rows.last().map(Fragment::origin_id) == Some(origin_id) {
            Some(Terminus::End)
        } else {
            None
        }
    }

    /// Current start coordinate of the row claiming `origin_id`, used to
    /// order OverlapResults left-to-right before cutting a fragment they
    /// all share.
    pub fn fragment_start_if_trimmed(&self, origin_id: u64) -> Option<i64> {
        self.row_index_for(origin_id).map(|i| self.rows[i].start)
    }

    /// Replaces the row claiming `origin_id` with `replacement` in place.
    pub fn replace_shared_fragment(&mut self, origin_id: u64, replacement: Fragment) {
        if let Some(i) = self.row_index_for(origin_id) {
            self.rows[i] = replacement;
        }
    }

    /// Consumes this OverlapResult into a plain [`Scaffold`] carrying its
    /// rows — used once fusion has no more need of the overhang
    /// bookkeeping.
    pub fn to_scaffold(self) -> Scaffold {
        let mut scaffold = Scaffold::with_tag(self.name, self.tag, self.haplotype);
        for frag in self.rows {
            scaffold.append_row(Row::Fragment(frag));
        }
        scaffold
    }
}

fn overlap_len(a: &Fragment, b: &Fragment) -> i64 {
    let start = a.start.max(b.start);
    let end = a.end.min(b.end);
    (end - start + 1).max(0)
}
