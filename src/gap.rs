//! The `Gap`: a spacer row between two fragments in a scaffold.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Gap {
    pub length: i64,
    pub gap_type: String,
}

impl Gap {
    pub fn new(length: i64, gap_type: impl Into<String>) -> Self {
        assert!(length > 0, "gap length must be > 0, got {length}");
        Self {
            length,
            gap_type: gap_type.into(),
        }
    }
}

impl fmt::Display for Gap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Gap:{} {}", self.length, self.gap_type)
    }
}
