//! `Scaffold`: an ordered sequence of rows, each a fragment or a gap.

use std::fmt;

use crate::fragment::Fragment;
use crate::gap::Gap;
use crate::row::Row;

/// Invariants enforced by [`Scaffold::append_row`]: the first and last
/// rows are always fragments, and no two consecutive rows are both gaps.
#[derive(Debug, Clone, Default)]
pub struct Scaffold {
    pub name: String,
    pub rows: Vec<Row>,
    pub haplotype: Option<String>,
    pub tag: Option<String>,
}

impl Scaffold {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rows: Vec::new(),
            haplotype: None,
            tag: None,
        }
    }

    pub fn with_tag(name: impl Into<String>, tag: Option<String>, haplotype: Option<String>) -> Self {
        Self {
            name: name.into(),
            rows: Vec::new(),
            haplotype,
            tag,
        }
    }

    /// Appends a row, enforcing that a gap never leads the scaffold and
    /// that two gaps never sit adjacent. A gap offered in either of those
    /// positions is silently dropped, since it cannot be represented.
    pub fn append_row(&mut self, row: Row) {
        if row.is_gap() {
            if self.rows.is_empty() {
                return;
            }
            if self.rows.last().map(Row::is_gap).unwrap_or(false) {
                return;
            }
        }
        self.rows.push(row);
    }

    /// Appends every row from `other` onto this scaffold, inserting `gap`
    /// between the two runs when both are non-empty (used when fusing
    /// adjacent `OverlapResult`s and previously-separate scaffolds back
    /// into one by name).
    pub fn append_scaffold(&mut self, other: Scaffold, gap: &Gap) {
        if other.rows.is_empty() {
            return;
        }
        if !self.rows.is_empty() {
            self.append_row(Row::Gap(gap.clone()));
        }
        for row in other.rows {
            self.append_row(row);
        }
    }

    pub fn fragments(&self) -> impl Iterator<Item = &Fragment> {
        self.rows.iter().filter_map(Row::as_fragment)
    }

    /// Fragments paired with their row index, for callers that need to
    /// reconstruct which gaps sat between which kept fragments.
    pub fn idx_fragments(&self) -> impl Iterator<Item = (usize, &Fragment)> {
        self.rows
            .iter()
            .enumerate()
            .filter_map(|(i, row)| row.as_fragment().map(|f| (i, f)))
    }

    /// Union of tags across every fragment row.
    pub fn fragment_tags(&self) -> std::collections::BTreeSet<String> {
        let mut tags = std::collections::BTreeSet::new();
        for frag in self.fragments() {
            tags.extend(frag.tags.iter().cloned());
        }
        tags
    }

    pub fn length(&self) -> i64 {
        self.rows.iter().map(Row::length).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl fmt::Display for Scaffold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.name)?;
        let mut pos = 1i64;
        for row in &self.rows {
            let len = row.length();
            writeln!(f, "{:12} {:12}  {}", pos, pos + len - 1, row)?;
            pos += len;
        }
        Ok(())
    }
}
