//! Atom array and atom array stack
//!
//! The atom table is column-oriented: each annotation is a full column over
//! all atoms, and optional annotations are present or absent for the table
//! as a whole. Row order is significant and is preserved exactly by every
//! operation here.

use lin_alg::f32::Vec3;

use crate::bond::BondList;
use crate::error::{MolError, MolResult};

/// Column-oriented table of N atoms with one coordinate per atom
///
/// Required columns always have the table length. The optional annotation
/// columns (`b_factor`, `occupancy`, `charge`, `altloc_id`) are either
/// absent or full-length; consumers must not assume their presence.
#[derive(Debug, Clone, Default)]
pub struct AtomArray {
    /// Chain identifier per atom (e.g. "A")
    pub chain_id: Vec<String>,
    /// Residue sequence number per atom
    pub res_id: Vec<i32>,
    /// Insertion code per atom (' ' if none)
    pub ins_code: Vec<char>,
    /// Residue name per atom (e.g. "ALA")
    pub res_name: Vec<String>,
    /// Atom name per atom (e.g. "CA")
    pub atom_name: Vec<String>,
    /// Element symbol per atom (e.g. "C")
    pub element: Vec<String>,
    /// Hetero flag per atom
    pub hetero: Vec<bool>,
    /// Coordinates, one per atom
    pub coord: Vec<Vec3>,

    /// B-factor annotation column
    pub b_factor: Option<Vec<f32>>,
    /// Occupancy annotation column
    pub occupancy: Option<Vec<f32>>,
    /// Formal charge annotation column
    pub charge: Option<Vec<i32>>,
    /// Alternate location id annotation column (' ' for none)
    pub altloc_id: Option<Vec<char>>,

    /// Associated bond list, if any
    pub bonds: Option<BondList>,
}

impl AtomArray {
    /// Create an empty atom array
    pub fn new() -> Self {
        AtomArray::default()
    }

    /// Number of atoms in the table
    #[inline]
    pub fn array_length(&self) -> usize {
        self.chain_id.len()
    }

    /// Names of the optional annotation columns that are present
    pub fn annotation_categories(&self) -> Vec<&'static str> {
        let mut categories = Vec::new();
        if self.b_factor.is_some() {
            categories.push("b_factor");
        }
        if self.occupancy.is_some() {
            categories.push("occupancy");
        }
        if self.charge.is_some() {
            categories.push("charge");
        }
        if self.altloc_id.is_some() {
            categories.push("altloc_id");
        }
        categories
    }

    /// Check that every column and the bond list match the table length
    pub fn validate(&self) -> MolResult<()> {
        let n = self.array_length();

        fn check(category: &'static str, expected: usize, actual: usize) -> MolResult<()> {
            if actual != expected {
                return Err(MolError::AnnotationMismatch {
                    category,
                    expected,
                    actual,
                });
            }
            Ok(())
        }

        check("res_id", n, self.res_id.len())?;
        check("ins_code", n, self.ins_code.len())?;
        check("res_name", n, self.res_name.len())?;
        check("atom_name", n, self.atom_name.len())?;
        check("element", n, self.element.len())?;
        check("hetero", n, self.hetero.len())?;
        if self.coord.len() != n {
            return Err(MolError::CoordinateMismatch {
                expected: n,
                actual: self.coord.len(),
            });
        }
        if let Some(col) = &self.b_factor {
            check("b_factor", n, col.len())?;
        }
        if let Some(col) = &self.occupancy {
            check("occupancy", n, col.len())?;
        }
        if let Some(col) = &self.charge {
            check("charge", n, col.len())?;
        }
        if let Some(col) = &self.altloc_id {
            check("altloc_id", n, col.len())?;
        }
        if let Some(bonds) = &self.bonds {
            if bonds.atom_count() != n {
                return Err(MolError::AnnotationMismatch {
                    category: "bonds",
                    expected: n,
                    actual: bonds.atom_count(),
                });
            }
        }
        Ok(())
    }

    /// Keep only the rows where `keep` is true
    ///
    /// Every column is filtered in order; the bond list is remapped to the
    /// surviving row positions.
    pub fn filtered(&self, keep: &[bool]) -> MolResult<AtomArray> {
        let n = self.array_length();
        if keep.len() != n {
            return Err(MolError::MaskMismatch {
                expected: n,
                actual: keep.len(),
            });
        }

        fn take<T: Clone>(column: &[T], keep: &[bool]) -> Vec<T> {
            column
                .iter()
                .zip(keep)
                .filter(|(_, &kept)| kept)
                .map(|(value, _)| value.clone())
                .collect()
        }

        Ok(AtomArray {
            chain_id: take(&self.chain_id, keep),
            res_id: take(&self.res_id, keep),
            ins_code: take(&self.ins_code, keep),
            res_name: take(&self.res_name, keep),
            atom_name: take(&self.atom_name, keep),
            element: take(&self.element, keep),
            hetero: take(&self.hetero, keep),
            coord: take(&self.coord, keep),
            b_factor: self.b_factor.as_deref().map(|col| take(col, keep)),
            occupancy: self.occupancy.as_deref().map(|col| take(col, keep)),
            charge: self.charge.as_deref().map(|col| take(col, keep)),
            altloc_id: self.altloc_id.as_deref().map(|col| take(col, keep)),
            bonds: match &self.bonds {
                Some(bonds) => Some(bonds.filtered(keep)?),
                None => None,
            },
        })
    }
}

/// A stack of coordinate frames sharing one annotation template
///
/// Frame 0 lives in the embedded [`AtomArray`]; further frames are stored as
/// plain coordinate arrays. Every frame has exactly the template's length.
#[derive(Debug, Clone)]
pub struct AtomArrayStack {
    array: AtomArray,
    rest: Vec<Vec<Vec3>>,
}

impl AtomArrayStack {
    /// Create a depth-1 stack from a single atom array
    pub fn new(array: AtomArray) -> Self {
        AtomArrayStack {
            array,
            rest: Vec::new(),
        }
    }

    /// Build a stack from an annotation template and per-frame coordinates
    ///
    /// The template's own coordinates are replaced by the first frame.
    /// Fails if `frames` is empty or any frame length deviates.
    pub fn from_template(template: AtomArray, frames: Vec<Vec<Vec3>>) -> MolResult<Self> {
        let n = template.array_length();
        let mut frames = frames.into_iter();
        let first = frames.next().ok_or(MolError::FrameOutOfBounds(0, 0))?;
        if first.len() != n {
            return Err(MolError::CoordinateMismatch {
                expected: n,
                actual: first.len(),
            });
        }
        let mut array = template;
        array.coord = first;
        let mut stack = AtomArrayStack {
            array,
            rest: Vec::new(),
        };
        for frame in frames {
            stack.push_frame(frame)?;
        }
        Ok(stack)
    }

    /// Append a coordinate frame
    pub fn push_frame(&mut self, coords: Vec<Vec3>) -> MolResult<()> {
        let n = self.array_length();
        if coords.len() != n {
            return Err(MolError::CoordinateMismatch {
                expected: n,
                actual: coords.len(),
            });
        }
        self.rest.push(coords);
        Ok(())
    }

    /// Number of atoms shared by all frames
    #[inline]
    pub fn array_length(&self) -> usize {
        self.array.array_length()
    }

    /// Number of frames
    #[inline]
    pub fn depth(&self) -> usize {
        1 + self.rest.len()
    }

    /// The annotation template (frame 0 as an atom array)
    #[inline]
    pub fn template(&self) -> &AtomArray {
        &self.array
    }

    /// Coordinates of one frame
    pub fn frame_coords(&self, index: usize) -> MolResult<&[Vec3]> {
        if index == 0 {
            Ok(&self.array.coord)
        } else {
            self.rest
                .get(index - 1)
                .map(Vec::as_slice)
                .ok_or(MolError::FrameOutOfBounds(index, self.depth()))
        }
    }

    /// Extract one frame as a standalone atom array
    pub fn frame(&self, index: usize) -> MolResult<AtomArray> {
        let coords = self.frame_coords(index)?.to_vec();
        let mut array = self.array.clone();
        array.coord = coords;
        Ok(array)
    }

    /// Keep only the rows where `keep` is true, across every frame
    pub fn filtered(&self, keep: &[bool]) -> MolResult<AtomArrayStack> {
        let array = self.array.filtered(keep)?;
        let rest = self
            .rest
            .iter()
            .map(|frame| {
                frame
                    .iter()
                    .zip(keep)
                    .filter(|(_, &kept)| kept)
                    .map(|(coord, _)| *coord)
                    .collect()
            })
            .collect();
        Ok(AtomArrayStack { array, rest })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bond::BondType;

    fn two_atom_array() -> AtomArray {
        AtomArray {
            chain_id: vec!["A".to_string(), "A".to_string()],
            res_id: vec![1, 1],
            ins_code: vec![' ', ' '],
            res_name: vec!["ALA".to_string(), "ALA".to_string()],
            atom_name: vec!["N".to_string(), "CA".to_string()],
            element: vec!["N".to_string(), "C".to_string()],
            hetero: vec![false, false],
            coord: vec![Vec3::new(0.0, 0.0, 0.0), Vec3::new(1.5, 0.0, 0.0)],
            ..Default::default()
        }
    }

    #[test]
    fn test_length_and_categories() {
        let mut array = two_atom_array();
        assert_eq!(array.array_length(), 2);
        assert!(array.annotation_categories().is_empty());

        array.b_factor = Some(vec![10.0, 12.0]);
        array.altloc_id = Some(vec![' ', ' ']);
        assert_eq!(array.annotation_categories(), vec!["b_factor", "altloc_id"]);
    }

    #[test]
    fn test_validate() {
        let mut array = two_atom_array();
        assert!(array.validate().is_ok());

        array.b_factor = Some(vec![10.0]);
        assert_eq!(
            array.validate(),
            Err(MolError::AnnotationMismatch {
                category: "b_factor",
                expected: 2,
                actual: 1,
            })
        );
    }

    #[test]
    fn test_filtered() {
        let mut array = two_atom_array();
        array.b_factor = Some(vec![10.0, 12.0]);
        let mut bonds = BondList::new(2);
        bonds.add_bond(0, 1, BondType::Single).unwrap();
        array.bonds = Some(bonds);

        let kept = array.filtered(&[false, true]).unwrap();
        assert_eq!(kept.array_length(), 1);
        assert_eq!(kept.atom_name, vec!["CA".to_string()]);
        assert_eq!(kept.b_factor, Some(vec![12.0]));
        // The bond lost one endpoint and disappears
        assert!(kept.bonds.unwrap().is_empty());
    }

    #[test]
    fn test_filtered_length_mismatch() {
        let array = two_atom_array();
        assert!(matches!(
            array.filtered(&[true]),
            Err(MolError::MaskMismatch {
                expected: 2,
                actual: 1
            })
        ));
    }

    #[test]
    fn test_stack_from_template() {
        let template = two_atom_array();
        let frames = vec![
            template.coord.clone(),
            vec![Vec3::new(0.1, 0.0, 0.0), Vec3::new(1.6, 0.0, 0.0)],
        ];
        let stack = AtomArrayStack::from_template(template, frames).unwrap();
        assert_eq!(stack.depth(), 2);
        assert_eq!(stack.array_length(), 2);

        let frame1 = stack.frame(1).unwrap();
        assert!((frame1.coord[0].x - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_stack_frame_mismatch() {
        let template = two_atom_array();
        let mut stack = AtomArrayStack::new(template);
        assert_eq!(
            stack.push_frame(vec![Vec3::new(0.0, 0.0, 0.0)]),
            Err(MolError::CoordinateMismatch {
                expected: 2,
                actual: 1
            })
        );
    }

    #[test]
    fn test_stack_frame_out_of_bounds() {
        let stack = AtomArrayStack::new(two_atom_array());
        assert!(matches!(
            stack.frame(1),
            Err(MolError::FrameOutOfBounds(1, 1))
        ));
    }

    #[test]
    fn test_stack_filtered() {
        let template = two_atom_array();
        let mut stack = AtomArrayStack::new(template);
        stack
            .push_frame(vec![Vec3::new(2.0, 0.0, 0.0), Vec3::new(3.0, 0.0, 0.0)])
            .unwrap();

        let kept = stack.filtered(&[true, false]).unwrap();
        assert_eq!(kept.array_length(), 1);
        assert_eq!(kept.depth(), 2);
        assert!((kept.frame_coords(1).unwrap()[0].x - 2.0).abs() < 1e-6);
    }
}
