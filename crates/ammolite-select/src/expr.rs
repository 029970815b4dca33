//! Selection expression rendering
//!
//! Renders compressed ranges as an engine selection string scoped to one
//! named object, and defines the mask-or-expression input accepted by the
//! wrapper commands.

use crate::error::{SelectError, SelectResult};
use crate::mask::Mask;
use crate::range::mask_to_ranges;

/// Selection input for wrapper commands: a mask or a raw sub-expression
///
/// A raw expression is ANDed with the object scope unchanged; a mask is
/// compressed into index ranges first.
#[derive(Debug, Clone)]
pub enum SelectionSpec {
    /// A boolean mask aligned with the object's atom order
    Mask(Mask),
    /// An already-formed selection sub-expression
    Expr(String),
}

impl From<Mask> for SelectionSpec {
    fn from(mask: Mask) -> Self {
        SelectionSpec::Mask(mask)
    }
}

impl From<&Mask> for SelectionSpec {
    fn from(mask: &Mask) -> Self {
        SelectionSpec::Mask(mask.clone())
    }
}

impl From<&str> for SelectionSpec {
    fn from(expr: &str) -> Self {
        SelectionSpec::Expr(expr.to_string())
    }
}

impl From<String> for SelectionSpec {
    fn from(expr: String) -> Self {
        SelectionSpec::Expr(expr)
    }
}

/// Compile a mask into a selection expression scoped to `object_name`
///
/// Selects exactly the atoms at the 1-based positions where the mask is
/// true, using the minimum number of disjoint ranges. An all-false mask
/// compiles to the `none` clause, which is well-formed and matches zero
/// atoms.
pub fn selection_expression(object_name: &str, mask: &Mask) -> String {
    let ranges = mask_to_ranges(mask);
    let clause = if ranges.is_empty() {
        "none".to_string()
    } else {
        ranges
            .iter()
            .map(|range| format!("index {range}"))
            .collect::<Vec<_>>()
            .join(" or ")
    };
    format!("model {object_name} and ({clause})")
}

/// Compile a selection spec against a named object with a known atom count
///
/// A missing spec selects the whole object. Mask lengths are checked
/// against `atom_count` before compression; raw expressions pass through
/// unchanged.
pub fn compile(
    object_name: &str,
    spec: Option<&SelectionSpec>,
    atom_count: usize,
) -> SelectResult<String> {
    match spec {
        None => Ok(format!("model {object_name}")),
        Some(SelectionSpec::Expr(expr)) => Ok(format!("model {object_name} and ({expr})")),
        Some(SelectionSpec::Mask(mask)) => {
            if mask.len() != atom_count {
                return Err(SelectError::LengthMismatch {
                    expected: atom_count,
                    actual: mask.len(),
                });
            }
            Ok(selection_expression(object_name, mask))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expression_shape() {
        let mask = Mask::from_bools(&[false, true, true, false, true]);
        assert_eq!(
            selection_expression("m", &mask),
            "model m and (index 2-3 or index 5-5)"
        );
    }

    #[test]
    fn test_all_true() {
        let mask = Mask::all(20);
        assert_eq!(selection_expression("obj", &mask), "model obj and (index 1-20)");
    }

    #[test]
    fn test_all_false() {
        let mask = Mask::new(5);
        assert_eq!(selection_expression("obj", &mask), "model obj and (none)");
    }

    #[test]
    fn test_idempotence() {
        let mask = Mask::from_bools(&[true, false, true, true]);
        assert_eq!(
            selection_expression("m", &mask),
            selection_expression("m", &mask)
        );
    }

    #[test]
    fn test_compile_default_is_whole_object() {
        assert_eq!(compile("m", None, 10).unwrap(), "model m");
    }

    #[test]
    fn test_compile_raw_expression() {
        let spec = SelectionSpec::from("resi 1-10");
        assert_eq!(
            compile("m", Some(&spec), 10).unwrap(),
            "model m and (resi 1-10)"
        );
    }

    #[test]
    fn test_compile_checks_length() {
        let spec = SelectionSpec::from(Mask::new(4));
        assert_eq!(
            compile("m", Some(&spec), 10),
            Err(SelectError::LengthMismatch {
                expected: 10,
                actual: 4
            })
        );
    }
}
