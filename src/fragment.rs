//! The `Fragment`: a closed oriented interval on a named input sequence.
//! Coordinates are 1-based inclusive on both ends, matching the TPF/AGP
//! conventions this crate reconciles.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Stable identity for a [`Fragment`] that survives trimming, independent
/// of `key_tuple`. Trimmed copies of the same underlying input fragment
/// (produced when an `OverlapResult`'s terminal row is clipped to the
/// bait) keep the `origin_id` of the fragment they were cut from, so the
/// build engine can recognise "the same input fragment, claimed by two
/// OverlapResults" even after their coordinates have diverged. Does not
/// participate in equality or hashing — `key_tuple` alone defines that.
static NEXT_FRAGMENT_ID: AtomicU64 = AtomicU64::new(1);

fn next_fragment_id() -> u64 {
    NEXT_FRAGMENT_ID.fetch_add(1, Ordering::Relaxed)
}

/// Strand orientation of a fragment relative to its named sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strand {
    Plus,
    Minus,
    Unknown,
}

impl Strand {
    pub fn from_char(c: char) -> Self {
        match c {
            '+' => Strand::Plus,
            '-' => Strand::Minus,
            _ => Strand::Unknown,
        }
    }

    /// Parses TPF's `PLUS`/`MINUS` strand words.
    pub fn from_word(s: &str) -> Self {
        match s {
            "PLUS" => Strand::Plus,
            "MINUS" => Strand::Minus,
            _ => Strand::Unknown,
        }
    }

    /// The TPF strand word for this orientation, defaulting unknown
    /// orientation to `PLUS` since TPF has no third word for it.
    pub fn to_word(self) -> &'static str {
        match self {
            Strand::Plus | Strand::Unknown => "PLUS",
            Strand::Minus => "MINUS",
        }
    }

    /// Flip plus/minus; unknown orientation stays unknown.
    pub fn flipped(self) -> Self {
        match self {
            Strand::Plus => Strand::Minus,
            Strand::Minus => Strand::Plus,
            Strand::Unknown => Strand::Unknown,
        }
    }
}

impl fmt::Display for Strand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strand::Plus => write!(f, "+"),
            Strand::Minus => write!(f, "-"),
            Strand::Unknown => write!(f, "."),
        }
    }
}

/// A 1-based, fully-closed oriented interval on a named sequence, carrying
/// an open set of curator tags ("Painted", "Haplotig", chromosome names...).
///
/// Two fragments are equal, and hash equal, by `key_tuple`
/// `(seq_name, start, end, strand)` — tags do not participate in identity.
#[derive(Debug, Clone)]
pub struct Fragment {
    pub seq_name: String,
    pub start: i64,
    pub end: i64,
    pub strand: Strand,
    pub tags: BTreeSet<String>,
    pub(crate) origin_id: u64,
}

impl Fragment {
    /// Panics if `start < 1` or `end < start` — these are caller
    /// invariants enforced at every construction site (parsers, trims,
    /// cuts), never user-recoverable conditions.
    pub fn new(seq_name: impl Into<String>, start: i64, end: i64, strand: Strand) -> Self {
        assert!(start >= 1, "fragment start must be >= 1, got {start}");
        assert!(end >= start, "fragment end {end} < start {start}");
        Self {
            seq_name: seq_name.into(),
            start,
            end,
            strand,
            tags: BTreeSet::new(),
            origin_id: next_fragment_id(),
        }
    }

    #[inline]
    pub fn origin_id(&self) -> u64 {
        self.origin_id
    }

    pub fn with_tags(mut self, tags: BTreeSet<String>) -> Self {
        self.tags = tags;
        self
    }

    #[inline]
    pub fn length(&self) -> i64 {
        self.end - self.start + 1
    }

    #[inline]
    pub fn key_tuple(&self) -> (&str, i64, i64, Strand) {
        (&self.seq_name, self.start, self.end, self.strand)
    }

    /// Owned identity key, suitable for use as a hash map key.
    #[inline]
    pub fn key(&self) -> FragmentKey {
        FragmentKey {
            seq_name: self.seq_name.clone(),
            start: self.start,
            end: self.end,
            strand: self.strand,
        }
    }

    #[inline]
    pub fn overlaps(&self, other: &Fragment) -> bool {
        self.seq_name == other.seq_name && self.start <= other.end && other.start <= self.end
    }

    /// Contiguous on the same sequence: the end of one is immediately
    /// followed by the start of the other, in either order.
    #[inline]
    pub fn abuts(&self, other: &Fragment) -> bool {
        self.seq_name == other.seq_name
            && (self.end + 1 == other.start || other.end + 1 == self.start)
    }

    /// The same interval with strand flipped. Preserves `origin_id`: this
    /// is still conceptually the same underlying fragment, just viewed
    /// from the opposite orientation.
    pub fn reverse(&self) -> Fragment {
        Fragment {
            seq_name: self.seq_name.clone(),
            start: self.start,
            end: self.end,
            strand: self.strand.flipped(),
            tags: self.tags.clone(),
            origin_id: self.origin_id,
        }
    }

    /// A copy of this fragment trimmed to `[new_start, new_end]`, keeping
    /// `origin_id` so the build engine can still recognise it as a view
    /// onto the same underlying input fragment. Both bounds must lie
    /// within the original interval.
    pub fn trimmed(&self, new_start: i64, new_end: i64) -> Fragment {
        debug_assert!(new_start >= self.start && new_end <= self.end && new_start <= new_end);
        Fragment {
            seq_name: self.seq_name.clone(),
            start: new_start,
            end: new_end,
            strand: self.strand,
            tags: self.tags.clone(),
            origin_id: self.origin_id,
        }
    }

    /// Like `trimmed`, but also sets the orientation explicitly — used when
    /// cutting a fragment shared by scaffolds built from baits of different
    /// strands, where the kept piece must carry whichever scaffold's
    /// orientation it's being placed back into.
    pub fn trimmed_oriented(&self, new_start: i64, new_end: i64, strand: Strand) -> Fragment {
        let mut piece = self.trimmed(new_start, new_end);
        piece.strand = strand;
        piece
    }
}

impl PartialEq for Fragment {
    fn eq(&self, other: &Self) -> bool {
        self.key_tuple() == other.key_tuple()
    }
}

impl Eq for Fragment {}

impl fmt::Display for Fragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}-{}({})",
            self.seq_name, self.start, self.end, self.strand
        )?;
        for tag in &self.tags {
            write!(f, " {tag}")?;
        }
        Ok(())
    }
}

/// Owned identity key for a [`Fragment`], used wherever a fragment needs
/// to be looked up by value rather than by reference (`found_fragments`,
/// `multi` in the build engine).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FragmentKey {
    pub seq_name: String,
    pub start: i64,
    pub end: i64,
    pub strand: Strand,
}
