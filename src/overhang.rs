//! Ports `OverhangPremise`/`OverhangResolver` from the original curation
//! pipeline's `build_utils.py`: when the same input fragment is claimed as
//! a terminal row by more than one [`crate::overlap_result::OverlapResult`],
//! decide which claim to drop rather than cutting the fragment outright.
//!
//! The Python original splits this into `StartOverhangPremise` and
//! `EndOverhangPremise` subclasses; here a single [`OverhangPremise`] struct
//! carries a [`Terminus`] selector instead, since the only difference
//! between the two is which end of the `OverlapResult` they read from.

use crate::overlap_result::{OverlapResult, Terminus};

#[derive(Debug, Clone, Copy)]
pub struct OverhangPremise {
    pub scaffold_idx: usize,
    pub end: Terminus,
    pub bait_overlap: i64,
    pub overhang_if_applied: i64,
    pub overhang_error_delta_if_applied: i64,
    rows_len: usize,
}

impl OverhangPremise {
    pub fn new(scaffold_idx: usize, end: Terminus, result: &OverlapResult) -> Self {
        let (bait_overlap, overhang_if_applied, current_overhang) = match end {
            Terminus::Start => (
                result.start_row_bait_overlap(),
                result.overhang_if_start_removed(),
                result.start_overhang,
            ),
            Terminus::End => (
                result.end_row_bait_overlap(),
                result.overhang_if_end_removed(),
                result.end_overhang,
            ),
        };
        Self {
            scaffold_idx,
            end,
            bait_overlap,
            overhang_if_applied,
            overhang_error_delta_if_applied: overhang_if_applied.abs() - current_overhang.abs(),
            rows_len: result.rows.len(),
        }
    }

    /// Would applying this premise actually help, or just trade one
    /// overhang for a worse one? The `-3 * err_length` guard stops a
    /// fragment from being dropped when doing so would leave a large
    /// negative overhang behind — that case should be cut, not discarded.
    pub fn improves(&self, err_length: i64) -> bool {
        if self.rows_len <= 1 {
            return false;
        }
        self.overhang_error_delta_if_applied < 0 && self.overhang_if_applied > -3 * err_length
    }

    pub fn makes_worse(&self, err_length: i64) -> bool {
        !self.improves(err_length)
    }
}

/// One round of comparing the premises competing for a single shared
/// fragment, returning the index into `premises` of the one to apply, if
/// any clearly helps.
pub fn resolve_premises(premises: &[OverhangPremise], err_length: i64) -> Option<usize> {
    log::debug!("overhang premises for shared fragment (err_length={err_length}): {premises:?}");

    if premises.len() == 2 {
        let (a, b) = (premises[0], premises[1]);
        if a.bait_overlap < err_length && b.bait_overlap < err_length {
            // Neither terminal row has much claim on the bait; drop
            // whichever barely touches it, to avoid leaving a sub-pixel
            // fragment behind after the other premise is applied instead.
            return Some(if a.bait_overlap < b.bait_overlap { 0 } else { 1 });
        }
    }

    if premises.len() > 1 {
        let mut order: Vec<usize> = (0..premises.len()).collect();
        order.sort_by_key(|&i| premises[i].overhang_error_delta_if_applied);
        let best = order[0];
        let next = order[1];
        if premises[best].improves(err_length) && premises[next].makes_worse(err_length) {
            return Some(best);
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fragment::{Fragment, Strand};

    fn frag(s: i64, e: i64) -> Fragment {
        Fragment::new("chr", s, e, Strand::Plus)
    }

    #[test]
    fn two_premises_with_small_overlap_drops_the_smaller() {
        let bait = frag(1000, 2000);
        let result = OverlapResult::new(bait.clone(), vec![frag(995, 1500), frag(1501, 2500)]);
        let a = OverhangPremise::new(0, Terminus::Start, &result);
        let result2 = OverlapResult::new(bait, vec![frag(999, 1500), frag(1501, 2500)]);
        let b = OverhangPremise::new(1, Terminus::Start, &result2);
        let winner = resolve_premises(&[a, b], 10);
        assert_eq!(winner, Some(0));
    }

    #[test]
    fn single_row_result_never_improves() {
        let bait = frag(1000, 2000);
        let result = OverlapResult::new(bait, vec![frag(1, 3000)]);
        let p = OverhangPremise::new(0, Terminus::Start, &result);
        assert!(!p.improves(10));
    }
}
