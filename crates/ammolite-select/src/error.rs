//! Error types for mask operations

use thiserror::Error;

/// Errors that can occur when compiling masks to selections
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SelectError {
    /// Mask length doesn't match the atom count it is applied to
    #[error("Mask has length {actual}, but the object has {expected} atoms")]
    LengthMismatch { expected: usize, actual: usize },
}

/// Result type for mask operations
pub type SelectResult<T> = Result<T, SelectError>;
