//! Bond list data structures
//!
//! Provides the `BondType` enum and the `BondList` attached to an atom array.

use serde::{Deserialize, Serialize};

use crate::error::{MolError, MolResult};

/// Bond type enumeration
///
/// Distinguishes bond order and aromaticity. The visualization engine only
/// understands integer orders, so aromaticity is lost on export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum BondType {
    /// Unknown or unspecified bond
    #[default]
    Any = 0,
    /// Single bond
    Single = 1,
    /// Double bond
    Double = 2,
    /// Triple bond
    Triple = 3,
    /// Quadruple bond
    Quadruple = 4,
    /// Aromatic bond drawn single
    AromaticSingle = 5,
    /// Aromatic bond drawn double
    AromaticDouble = 6,
}

impl BondType {
    /// Integer order understood by the visualization engine
    #[inline]
    pub fn order(&self) -> u8 {
        match self {
            BondType::Any | BondType::Single | BondType::AromaticSingle => 1,
            BondType::Double | BondType::AromaticDouble => 2,
            BondType::Triple => 3,
            BondType::Quadruple => 4,
        }
    }

    /// Recover a bond type from an engine integer order
    ///
    /// Aromaticity cannot be recovered; orders outside 1..=4 map to `Any`.
    pub fn from_order(order: u8) -> Self {
        match order {
            1 => BondType::Single,
            2 => BondType::Double,
            3 => BondType::Triple,
            4 => BondType::Quadruple,
            _ => BondType::Any,
        }
    }

    /// Check if this bond is aromatic
    #[inline]
    pub fn is_aromatic(&self) -> bool {
        matches!(self, BondType::AromaticSingle | BondType::AromaticDouble)
    }

    /// Drop the aromaticity distinction, keeping the order
    pub fn without_aromaticity(&self) -> Self {
        match self {
            BondType::AromaticSingle => BondType::Single,
            BondType::AromaticDouble => BondType::Double,
            other => *other,
        }
    }
}

/// A single bond entry
///
/// By convention `atom1 < atom2` (indices are ordered on construction).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BondEntry {
    /// Index of the first atom (always atom1 < atom2)
    pub atom1: u32,
    /// Index of the second atom
    pub atom2: u32,
    /// Bond type
    pub bond_type: BondType,
}

impl BondEntry {
    /// Create a new entry with ordered atom indices
    pub fn new(a1: u32, a2: u32, bond_type: BondType) -> Self {
        let (atom1, atom2) = if a1 <= a2 { (a1, a2) } else { (a2, a1) };
        BondEntry {
            atom1,
            atom2,
            bond_type,
        }
    }
}

/// Bond list associated with an atom array
///
/// Records unordered atom-index pairs with a bond type. Indices refer to
/// row positions in the owning atom array and must stay within its length.
#[derive(Debug, Clone)]
pub struct BondList {
    atom_count: usize,
    bonds: Vec<BondEntry>,
}

impl BondList {
    /// Create an empty bond list covering `atom_count` atoms
    pub fn new(atom_count: usize) -> Self {
        BondList {
            atom_count,
            bonds: Vec::new(),
        }
    }

    /// Create a bond list from raw (i, j, type) triples
    pub fn from_bonds(
        atom_count: usize,
        bonds: impl IntoIterator<Item = (u32, u32, BondType)>,
    ) -> MolResult<Self> {
        let mut list = BondList::new(atom_count);
        for (i, j, bond_type) in bonds {
            list.add_bond(i, j, bond_type)?;
        }
        Ok(list)
    }

    /// Add a bond between two atoms
    pub fn add_bond(&mut self, atom1: u32, atom2: u32, bond_type: BondType) -> MolResult<()> {
        if atom1 as usize >= self.atom_count {
            return Err(MolError::AtomIndexOutOfBounds(atom1, self.atom_count));
        }
        if atom2 as usize >= self.atom_count {
            return Err(MolError::AtomIndexOutOfBounds(atom2, self.atom_count));
        }
        if atom1 == atom2 {
            return Err(MolError::InvalidBond(atom1, atom2));
        }
        let entry = BondEntry::new(atom1, atom2, bond_type);
        if self
            .bonds
            .iter()
            .any(|b| b.atom1 == entry.atom1 && b.atom2 == entry.atom2)
        {
            return Err(MolError::DuplicateBond(atom1, atom2));
        }
        self.bonds.push(entry);
        Ok(())
    }

    /// Number of atoms this bond list covers
    #[inline]
    pub fn atom_count(&self) -> usize {
        self.atom_count
    }

    /// Number of bonds
    #[inline]
    pub fn len(&self) -> usize {
        self.bonds.len()
    }

    /// Check if the list has no bonds
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bonds.is_empty()
    }

    /// Iterate over all bond entries
    pub fn iter(&self) -> impl Iterator<Item = &BondEntry> {
        self.bonds.iter()
    }

    /// Check if two atoms are bonded (in any order)
    pub fn contains(&self, a1: u32, a2: u32) -> bool {
        let probe = BondEntry::new(a1, a2, BondType::Any);
        self.bonds
            .iter()
            .any(|b| b.atom1 == probe.atom1 && b.atom2 == probe.atom2)
    }

    /// Restrict the bond list to the atoms where `keep` is true
    ///
    /// Surviving indices are remapped to the filtered row positions; bonds
    /// touching a removed atom are dropped.
    pub fn filtered(&self, keep: &[bool]) -> MolResult<BondList> {
        if keep.len() != self.atom_count {
            return Err(MolError::MaskMismatch {
                expected: self.atom_count,
                actual: keep.len(),
            });
        }
        // Old index -> new index for kept atoms
        let mut remap = vec![u32::MAX; self.atom_count];
        let mut next = 0u32;
        for (old, &kept) in keep.iter().enumerate() {
            if kept {
                remap[old] = next;
                next += 1;
            }
        }
        let mut filtered = BondList::new(next as usize);
        for bond in &self.bonds {
            let a1 = remap[bond.atom1 as usize];
            let a2 = remap[bond.atom2 as usize];
            if a1 != u32::MAX && a2 != u32::MAX {
                filtered.bonds.push(BondEntry::new(a1, a2, bond.bond_type));
            }
        }
        Ok(filtered)
    }

    /// Copy of the bond set with aromaticity normalized away, sorted
    ///
    /// Useful for comparing bond topology across a conversion round trip.
    pub fn normalized(&self) -> Vec<BondEntry> {
        let mut bonds: Vec<BondEntry> = self
            .bonds
            .iter()
            .map(|b| BondEntry::new(b.atom1, b.atom2, b.bond_type.without_aromaticity()))
            .collect();
        bonds.sort();
        bonds
    }
}

impl PartialEq for BondList {
    /// Bond lists are equal when they cover the same atoms and describe the
    /// same bond set, regardless of insertion order.
    fn eq(&self, other: &Self) -> bool {
        if self.atom_count != other.atom_count {
            return false;
        }
        let mut a = self.bonds.clone();
        let mut b = other.bonds.clone();
        a.sort();
        b.sort();
        a == b
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bond_type_order() {
        assert_eq!(BondType::Any.order(), 1);
        assert_eq!(BondType::Single.order(), 1);
        assert_eq!(BondType::AromaticSingle.order(), 1);
        assert_eq!(BondType::Double.order(), 2);
        assert_eq!(BondType::AromaticDouble.order(), 2);
        assert_eq!(BondType::Triple.order(), 3);
        assert_eq!(BondType::Quadruple.order(), 4);
    }

    #[test]
    fn test_bond_type_from_order() {
        assert_eq!(BondType::from_order(1), BondType::Single);
        assert_eq!(BondType::from_order(4), BondType::Quadruple);
        assert_eq!(BondType::from_order(0), BondType::Any);
        assert_eq!(BondType::from_order(9), BondType::Any);
    }

    #[test]
    fn test_aromaticity() {
        assert!(BondType::AromaticSingle.is_aromatic());
        assert!(!BondType::Double.is_aromatic());
        assert_eq!(
            BondType::AromaticDouble.without_aromaticity(),
            BondType::Double
        );
        assert_eq!(BondType::Triple.without_aromaticity(), BondType::Triple);
    }

    #[test]
    fn test_entry_ordering() {
        let entry = BondEntry::new(5, 3, BondType::Double);
        assert_eq!(entry.atom1, 3);
        assert_eq!(entry.atom2, 5);
    }

    #[test]
    fn test_add_and_contains() {
        let mut bonds = BondList::new(4);
        bonds.add_bond(0, 1, BondType::Single).unwrap();
        bonds.add_bond(3, 2, BondType::Double).unwrap();

        assert_eq!(bonds.len(), 2);
        assert!(bonds.contains(1, 0));
        assert!(bonds.contains(2, 3));
        assert!(!bonds.contains(0, 2));
    }

    #[test]
    fn test_out_of_range() {
        let mut bonds = BondList::new(2);
        assert_eq!(
            bonds.add_bond(0, 2, BondType::Single),
            Err(MolError::AtomIndexOutOfBounds(2, 2))
        );
    }

    #[test]
    fn test_self_loop() {
        let mut bonds = BondList::new(2);
        assert_eq!(
            bonds.add_bond(1, 1, BondType::Single),
            Err(MolError::InvalidBond(1, 1))
        );
    }

    #[test]
    fn test_duplicate() {
        let mut bonds = BondList::new(3);
        bonds.add_bond(0, 1, BondType::Single).unwrap();
        assert_eq!(
            bonds.add_bond(1, 0, BondType::Double),
            Err(MolError::DuplicateBond(1, 0))
        );
    }

    #[test]
    fn test_filtered_remaps() {
        let mut bonds = BondList::new(5);
        bonds.add_bond(0, 1, BondType::Single).unwrap();
        bonds.add_bond(1, 2, BondType::Double).unwrap();
        bonds.add_bond(3, 4, BondType::Single).unwrap();

        // Drop atom 2: the 1-2 bond disappears, 3-4 becomes 2-3
        let keep = [true, true, false, true, true];
        let filtered = bonds.filtered(&keep).unwrap();

        assert_eq!(filtered.atom_count(), 4);
        assert_eq!(filtered.len(), 2);
        assert!(filtered.contains(0, 1));
        assert!(filtered.contains(2, 3));
    }

    #[test]
    fn test_normalized_drops_aromaticity() {
        let mut a = BondList::new(3);
        a.add_bond(0, 1, BondType::AromaticSingle).unwrap();
        a.add_bond(1, 2, BondType::AromaticDouble).unwrap();

        let mut b = BondList::new(3);
        b.add_bond(1, 2, BondType::Double).unwrap();
        b.add_bond(0, 1, BondType::Single).unwrap();

        assert_eq!(a.normalized(), b.normalized());
    }
}
