//! Error types for the bridge layer
//!
//! One enum covers the whole taxonomy: fatal classes (staleness,
//! nonexistence, shape mismatches, invalid arguments, duplicate session)
//! are surfaced immediately and never retried; the non-fatal conditions
//! (unresolvable residue codes, missing bonds) never reach this type.

use thiserror::Error;

use crate::engine::EngineError;
use ammolite_mol::MolError;
use ammolite_select::SelectError;

/// Result type for bridge operations
pub type BridgeResult<T> = Result<T, BridgeError>;

/// Errors that can occur in the bridge layer
#[derive(Debug, Error)]
pub enum BridgeError {
    /// The named engine object does not exist (anymore)
    #[error("A PyMOL object with the name '{0}' does not exist")]
    NonexistentObject(String),

    /// The engine object's live atom count diverged from the captured count
    #[error(
        "The number of atoms in object '{name}' changed from the original \
         {expected} atoms to {actual} atoms"
    )]
    ModifiedObject {
        name: String,
        expected: usize,
        actual: usize,
    },

    /// Per-state coordinate counts disagree across states
    #[error("The states have different numbers of atoms: expected {expected}, got {actual}")]
    InconsistentStates { expected: usize, actual: usize },

    /// Unknown altloc policy name
    #[error("'{0}' is not a valid altloc policy (expected 'all', 'first' or 'occupancy')")]
    InvalidAltloc(String),

    /// Unknown extra annotation field name
    #[error("'{0}' is not a valid annotation field (expected 'b_factor', 'occupancy' or 'charge')")]
    InvalidField(String),

    /// Unknown representation name
    #[error("unknown representation: {0}")]
    InvalidRepresentation(String),

    /// Unknown color name or malformed color value
    #[error("unknown color: {0}")]
    InvalidColor(String),

    /// Unknown wrapper command name
    #[error("unknown command: {0}")]
    UnknownCommand(String),

    /// A command requires a value that was not provided
    #[error("missing required argument: {0}")]
    MissingArgument(&'static str),

    /// Invalid argument provided to a command
    #[error("invalid argument '{name}': {reason}")]
    InvalidArgument { name: String, reason: String },

    /// A second live session was requested for this process
    #[error("A PyMOL instance is already running")]
    DuplicateSession,

    /// Atom table error (shape mismatches, bond indices out of range)
    #[error(transparent)]
    Mol(#[from] MolError),

    /// Mask compilation error (mask length vs atom count)
    #[error(transparent)]
    Select(#[from] SelectError),

    /// Error reported by the engine
    #[error("engine error: {0}")]
    Engine(#[from] EngineError),
}

impl BridgeError {
    /// Create an invalid argument error
    pub fn invalid_arg(name: impl Into<String>, reason: impl Into<String>) -> Self {
        BridgeError::InvalidArgument {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = BridgeError::ModifiedObject {
            name: "obj".to_string(),
            expected: 20,
            actual: 18,
        };
        assert_eq!(
            format!("{}", err),
            "The number of atoms in object 'obj' changed from the original \
             20 atoms to 18 atoms"
        );

        let err = BridgeError::InvalidAltloc("best".to_string());
        assert!(format!("{}", err).contains("'best'"));
    }

    #[test]
    fn test_from_select_error() {
        let err: BridgeError = SelectError::LengthMismatch {
            expected: 10,
            actual: 4,
        }
        .into();
        assert!(matches!(err, BridgeError::Select(_)));
    }
}
