//! Engine abstraction
//!
//! The visualization engine is an external collaborator. This trait captures
//! exactly the capabilities the bridge consumes: model/coordinate loading,
//! per-state snapshots, existence and count queries, and command execution.
//! States are 1-based at this interface, matching the engine convention.

use crate::chempy::IndexedModel;
use crate::command::CommandSpec;
use thiserror::Error;

/// Errors reported by an engine implementation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EngineError {
    /// Named object not found
    #[error("object not found: {0}")]
    ObjectNotFound(String),

    /// State index out of bounds for the named object
    #[error("state {state} out of bounds for '{name}' ({count} states)")]
    StateOutOfBounds {
        name: String,
        state: usize,
        count: usize,
    },

    /// Coordinate count doesn't match the object's atom count
    #[error("coordinate count mismatch: expected {expected}, got {actual}")]
    CoordinateMismatch { expected: usize, actual: usize },

    /// Selection string could not be parsed or evaluated
    #[error("selection error: {0}")]
    Selection(String),

    /// Generic execution error
    #[error("{0}")]
    Execution(String),
}

/// Result type for engine operations
pub type EngineResult<T> = Result<T, EngineError>;

/// Trait for types that can serve as the visualization engine backend
///
/// Implementations are assumed non-reentrant and single-threaded from the
/// caller's perspective; callers must not invoke these operations
/// concurrently without external synchronization.
pub trait EngineLike {
    /// Register a named object from an indexed model
    ///
    /// Loading under an existing name replaces that object.
    fn load_model(&mut self, model: IndexedModel, name: &str) -> EngineResult<()>;

    /// Append one coordinate state to an existing named object
    fn load_coordset(&mut self, coords: Vec<[f32; 3]>, name: &str) -> EngineResult<()>;

    /// Snapshot one state of a named object as an indexed model
    fn get_model(&self, name: &str, state: usize) -> EngineResult<IndexedModel>;

    /// Retrieve one state's coordinates
    fn get_coordset(&self, name: &str, state: usize) -> EngineResult<Vec<[f32; 3]>>;

    /// Number of coordinate states of a named object
    fn count_states(&self, name: &str) -> EngineResult<usize>;

    /// Number of atoms matching a selection expression
    fn count_atoms(&self, selection: &str) -> EngineResult<usize>;

    /// Names of all objects currently registered
    fn object_names(&self) -> Vec<String>;

    /// Apply a wrapper command to its selection
    fn execute(&mut self, spec: &CommandSpec) -> EngineResult<()>;

    /// Set an engine parameter
    fn set_parameter(&mut self, name: &str, value: &str) -> EngineResult<()>;

    /// Remove a named object
    fn delete_object(&mut self, name: &str) -> EngineResult<()>;

    /// Drop all objects and reset parameters to defaults
    fn reinitialize(&mut self) -> EngineResult<()>;
}
