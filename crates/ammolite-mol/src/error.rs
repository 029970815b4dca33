//! Error types for the atom table
//!
//! Provides error types for operations on atom arrays, stacks and bond lists.

use thiserror::Error;

/// Errors that can occur when working with atom tables
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MolError {
    /// Atom index is out of bounds
    #[error("Atom index {0} is out of bounds (max: {1})")]
    AtomIndexOutOfBounds(u32, usize),

    /// A bond connects an atom to itself
    #[error("Invalid bond: atom1={0}, atom2={1}")]
    InvalidBond(u32, u32),

    /// Attempting to add a duplicate bond
    #[error("Duplicate bond between atoms {0} and {1}")]
    DuplicateBond(u32, u32),

    /// Coordinate count doesn't match atom count
    #[error("Coordinate count mismatch: expected {expected}, got {actual}")]
    CoordinateMismatch { expected: usize, actual: usize },

    /// An annotation column doesn't match the table length
    #[error("Annotation '{category}' has length {actual}, table has {expected} atoms")]
    AnnotationMismatch {
        category: &'static str,
        expected: usize,
        actual: usize,
    },

    /// A filter mask doesn't match the table length
    #[error("Filter mask has length {actual}, table has {expected} atoms")]
    MaskMismatch { expected: usize, actual: usize },

    /// Frame index is out of bounds
    #[error("Frame index {0} is out of bounds (depth: {1})")]
    FrameOutOfBounds(usize, usize),
}

/// Result type for atom table operations
pub type MolResult<T> = Result<T, MolError>;
