//! `Row`: a tagged union of [`Fragment`] or [`Gap`], the unit a
//! [`crate::scaffold::Scaffold`] is built from.
//!
//! Modelled as an enum rather than trait objects: the operations used on
//! rows are narrow, variant-specific, and known in full up front.

use std::fmt;

use crate::fragment::Fragment;
use crate::gap::Gap;

#[derive(Debug, Clone, PartialEq)]
pub enum Row {
    Fragment(Fragment),
    Gap(Gap),
}

impl Row {
    #[inline]
    pub fn is_gap(&self) -> bool {
        matches!(self, Row::Gap(_))
    }

    #[inline]
    pub fn is_fragment(&self) -> bool {
        matches!(self, Row::Fragment(_))
    }

    #[inline]
    pub fn as_fragment(&self) -> Option<&Fragment> {
        match self {
            Row::Fragment(f) => Some(f),
            Row::Gap(_) => None,
        }
    }

    #[inline]
    pub fn as_fragment_mut(&mut self) -> Option<&mut Fragment> {
        match self {
            Row::Fragment(f) => Some(f),
            Row::Gap(_) => None,
        }
    }

    /// Length contributed to the owning scaffold's total.
    pub fn length(&self) -> i64 {
        match self {
            Row::Fragment(f) => f.length(),
            Row::Gap(g) => g.length,
        }
    }
}

impl From<Fragment> for Row {
    fn from(f: Fragment) -> Self {
        Row::Fragment(f)
    }
}

impl From<Gap> for Row {
    fn from(g: Gap) -> Self {
        Row::Gap(g)
    }
}

impl fmt::Display for Row {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Row::Fragment(frag) => write!(f, "{frag}"),
            Row::Gap(gap) => write!(f, "{gap}"),
        }
    }
}
