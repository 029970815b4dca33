//! Ammolite-RS Atom Table
//!
//! This crate provides the structure-toolkit side of the ammolite bridge:
//!
//! - [`AtomArray`] - column-oriented atom table with optional annotations
//! - [`AtomArrayStack`] - multiple coordinate frames over one annotation template
//! - [`BondList`] / [`BondType`] - bond topology with order and aromaticity
//! - residue code tables for the single-letter annotation
//!
//! # Architecture
//!
//! Annotations are columns, not per-atom structs: an optional annotation is
//! present or absent for the whole table, which is what the conversion layer
//! keys its field-presence policy on. Atom order is significant everywhere
//! and is never reordered.
//!
//! # Example
//!
//! ```rust
//! use ammolite_mol::{AtomArray, BondList, BondType};
//! use lin_alg::f32::Vec3;
//!
//! let mut array = AtomArray::new();
//! array.chain_id = vec!["A".into(), "A".into()];
//! array.res_id = vec![1, 1];
//! array.ins_code = vec![' ', ' '];
//! array.res_name = vec!["GLY".into(), "GLY".into()];
//! array.atom_name = vec!["N".into(), "CA".into()];
//! array.element = vec!["N".into(), "C".into()];
//! array.hetero = vec![false, false];
//! array.coord = vec![Vec3::new(0.0, 0.0, 0.0), Vec3::new(1.5, 0.0, 0.0)];
//!
//! let mut bonds = BondList::new(2);
//! bonds.add_bond(0, 1, BondType::Single).unwrap();
//! array.bonds = Some(bonds);
//!
//! assert!(array.validate().is_ok());
//! ```

mod array;
mod bond;
mod error;
mod residue;

pub use array::{AtomArray, AtomArrayStack};
pub use bond::{BondEntry, BondList, BondType};
pub use error::{MolError, MolResult};
pub use residue::{residue_code, three_to_one, UNKNOWN_RESIDUE_CODE};

#[cfg(test)]
mod tests {
    use super::*;
    use lin_alg::f32::Vec3;

    #[test]
    fn test_table_with_bonds() {
        let mut array = AtomArray::new();
        array.chain_id = vec!["A".into(); 3];
        array.res_id = vec![1; 3];
        array.ins_code = vec![' '; 3];
        array.res_name = vec!["HOH".into(); 3];
        array.atom_name = vec!["O".into(), "H1".into(), "H2".into()];
        array.element = vec!["O".into(), "H".into(), "H".into()];
        array.hetero = vec![true; 3];
        array.coord = vec![Vec3::new(0.0, 0.0, 0.0); 3];

        let mut bonds = BondList::new(3);
        bonds.add_bond(0, 1, BondType::Single).unwrap();
        bonds.add_bond(0, 2, BondType::Single).unwrap();
        array.bonds = Some(bonds);

        assert!(array.validate().is_ok());
        assert_eq!(array.bonds.as_ref().unwrap().len(), 2);
    }

    #[test]
    fn test_unknown_residue_sentinel() {
        assert_eq!(residue_code("XYZ"), UNKNOWN_RESIDUE_CODE);
    }
}
