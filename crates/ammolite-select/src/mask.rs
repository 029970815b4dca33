//! Boolean atom masks
//!
//! Provides the `Mask` type, a bitset aligned 1:1 with the atom order of an
//! atom array. Masks are produced by callers (e.g. from annotation
//! comparisons) and consumed by the selection compiler.

use bitvec::prelude::*;

/// A boolean per-atom selector aligned to atom table order
///
/// Uses a bitset for efficient storage and set operations.
/// Bit i corresponds to the atom at row i.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mask {
    bits: BitVec<u64, Lsb0>,
}

impl Mask {
    /// Create a mask with no atoms selected
    pub fn new(atom_count: usize) -> Self {
        Mask {
            bits: bitvec![u64, Lsb0; 0; atom_count],
        }
    }

    /// Create a mask with all atoms selected
    pub fn all(atom_count: usize) -> Self {
        Mask {
            bits: bitvec![u64, Lsb0; 1; atom_count],
        }
    }

    /// Create a mask from a boolean slice
    pub fn from_bools(values: &[bool]) -> Self {
        let mut mask = Mask::new(values.len());
        for (i, &value) in values.iter().enumerate() {
            if value {
                mask.set(i);
            }
        }
        mask
    }

    /// Create a mask from an iterator of selected atom indices
    pub fn from_indices(atom_count: usize, indices: impl IntoIterator<Item = usize>) -> Self {
        let mut mask = Mask::new(atom_count);
        for idx in indices {
            mask.set(idx);
        }
        mask
    }

    /// Length of the mask (the atom count it aligns with)
    #[inline]
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    /// Check if the mask covers zero atoms
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Check if the atom at `idx` is selected
    #[inline]
    pub fn get(&self, idx: usize) -> bool {
        self.bits.get(idx).map(|b| *b).unwrap_or(false)
    }

    /// Mark the atom at `idx` as selected
    #[inline]
    pub fn set(&mut self, idx: usize) {
        if let Some(mut bit) = self.bits.get_mut(idx) {
            *bit = true;
        }
    }

    /// Mark the atom at `idx` as deselected
    #[inline]
    pub fn unset(&mut self, idx: usize) {
        if let Some(mut bit) = self.bits.get_mut(idx) {
            *bit = false;
        }
    }

    /// Number of selected atoms
    pub fn count(&self) -> usize {
        self.bits.count_ones()
    }

    /// Check if any atom is selected
    #[inline]
    pub fn any(&self) -> bool {
        self.bits.any()
    }

    /// Iterate over the indices of selected atoms
    pub fn indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.bits.iter_ones()
    }

    /// Copy out the mask as a boolean vector
    pub fn to_bools(&self) -> Vec<bool> {
        self.bits.iter().map(|b| *b).collect()
    }

    /// Union of two masks (OR)
    pub fn union(&self, other: &Self) -> Self {
        assert_eq!(self.bits.len(), other.bits.len(), "Mask sizes must match");
        let mut result = self.clone();
        result.bits |= &other.bits;
        result
    }

    /// Intersection of two masks (AND)
    pub fn intersection(&self, other: &Self) -> Self {
        assert_eq!(self.bits.len(), other.bits.len(), "Mask sizes must match");
        let mut result = self.clone();
        result.bits &= &other.bits;
        result
    }

    /// Complement (NOT)
    pub fn complement(&self) -> Self {
        let mut result = self.clone();
        result.bits = !result.bits;
        result
    }
}

impl From<&[bool]> for Mask {
    fn from(values: &[bool]) -> Self {
        Mask::from_bools(values)
    }
}

impl std::fmt::Display for Mask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Mask({} of {} atoms)", self.count(), self.len())
    }
}
