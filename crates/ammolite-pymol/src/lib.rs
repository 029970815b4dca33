//! Ammolite-RS PyMOL Bridge
//!
//! This crate connects the ammolite atom table to a PyMOL-style
//! visualization engine:
//!
//! - [`IndexedModel`] - the engine's own atom+bond record
//! - [`convert_to_model`] / [`convert_to_atom_array`] - bidirectional
//!   structure conversion with altloc resolution
//! - [`PymolSession`] - the process-wide engine session
//! - [`PymolObject`] - wrapper around a named engine object that compiles
//!   boolean masks into selection expressions and dispatches commands
//! - [`HeadlessEngine`] - in-process [`EngineLike`] backend
//!
//! # Example
//!
//! ```rust,ignore
//! use ammolite_pymol::{CommandKind, ConvertOptions, HeadlessEngine, PymolObject, PymolSession};
//! use ammolite_select::Mask;
//!
//! let session = PymolSession::launch(HeadlessEngine::new())?;
//! let object = PymolObject::from_structure(&session, &array, None, true)?;
//!
//! // Address atoms with a boolean mask instead of a selection string
//! let mask = Mask::from_bools(&[false, true, true, false, true]);
//! object.apply(CommandKind::Show, Some("sticks"), Some(mask.into()), None)?;
//!
//! let restored = object.to_array(1, &ConvertOptions::everything())?;
//! ```

mod chempy;
mod command;
mod convert;
mod engine;
mod error;
mod headless;
mod object;
mod session;

pub use chempy::{IndexedModel, ModelAtom, ModelBond};
pub use command::{is_cartoon_type, parse_color, parse_representation, CommandKind, CommandSpec};
pub use convert::{
    convert_to_atom_array, convert_to_model, AltlocPolicy, ConvertOptions, ExtraField,
};
pub use engine::{EngineError, EngineLike, EngineResult};
pub use error::{BridgeError, BridgeResult};
pub use headless::HeadlessEngine;
pub use object::PymolObject;
pub use session::{is_launched, PymolSession};

// Re-export the table and mask types for convenience
pub use ammolite_mol::{AtomArray, AtomArrayStack, BondList, BondType};
pub use ammolite_select::{Mask, SelectionSpec};
