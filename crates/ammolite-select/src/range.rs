//! Mask-to-range compression
//!
//! Turns a boolean mask into the minimal set of disjoint contiguous index
//! ranges covering exactly its true positions. Single pass, O(N).

use serde::{Deserialize, Serialize};

use crate::mask::Mask;

/// A contiguous 1-based inclusive index range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IndexRange {
    /// First selected index (1-based, inclusive)
    pub first: usize,
    /// Last selected index (1-based, inclusive)
    pub last: usize,
}

impl IndexRange {
    /// Number of indices covered
    #[inline]
    pub fn len(&self) -> usize {
        self.last - self.first + 1
    }

    /// Ranges are never empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        false
    }
}

impl std::fmt::Display for IndexRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.first, self.last)
    }
}

/// Compress a mask into the minimal list of disjoint contiguous ranges
///
/// The boundaries are the positions where consecutive mask values differ.
/// A leading true run contributes an implicit boundary at 0, a trailing true
/// run one at N. Boundaries then alternate start/stop of true runs and are
/// paired into half-open 0-based intervals, rendered 1-based inclusive
/// (the exclusive stop needs no adjustment).
pub fn mask_to_ranges(mask: &Mask) -> Vec<IndexRange> {
    let n = mask.len();
    if n == 0 {
        return Vec::new();
    }

    let mut boundaries = Vec::new();
    if mask.get(0) {
        boundaries.push(0);
    }
    for i in 1..n {
        if mask.get(i - 1) != mask.get(i) {
            boundaries.push(i);
        }
    }
    if mask.get(n - 1) {
        boundaries.push(n);
    }

    debug_assert!(boundaries.len() % 2 == 0);
    boundaries
        .chunks_exact(2)
        .map(|pair| IndexRange {
            first: pair[0] + 1,
            last: pair[1],
        })
        .collect()
}
