//! Wrapped engine objects
//!
//! A `PymolObject` binds a name in the engine's namespace to the atom count
//! captured when the object was wrapped. Compiled index selections are only
//! valid while the engine object keeps that exact atom count, so every
//! operation revalidates existence and count first and fails rather than
//! operate on stale indices.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use lin_alg::f32::Vec3;
use parking_lot::RwLock;

use ammolite_mol::{AtomArray, AtomArrayStack};
use ammolite_select::{compile, Mask, SelectionSpec};

use crate::command::{validate_value, CommandKind, CommandSpec};
use crate::convert::{
    altloc_keep, apply_field_selection, convert_to_atom_array, convert_to_model,
    model_to_full_array, AltlocPolicy, ConvertOptions,
};
use crate::engine::EngineLike;
use crate::error::{BridgeError, BridgeResult};
use crate::session::PymolSession;

/// Counter for auto-generated object names
static OBJECT_COUNTER: AtomicUsize = AtomicUsize::new(0);

fn generated_name() -> String {
    let n = OBJECT_COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("ammolite_obj_{n}")
}

/// A wrapper around a named engine object
///
/// Usually created by [`PymolObject::from_structure`] or
/// [`PymolObject::from_stack`]. The wrapper caches the object's atom count
/// at wrap time; when atoms are added to or deleted from the underlying
/// engine object every subsequent operation fails with
/// [`BridgeError::ModifiedObject`], and once the engine object is gone with
/// [`BridgeError::NonexistentObject`].
///
/// Unless marked non-owning, dropping the wrapper deletes the underlying
/// engine object.
pub struct PymolObject<E: EngineLike> {
    name: String,
    engine: Arc<RwLock<E>>,
    atom_count: usize,
    delete_on_drop: bool,
}

impl<E: EngineLike> PymolObject<E> {
    /// Wrap a pre-existing named engine object
    ///
    /// Captures the object's current atom count. `delete` controls whether
    /// dropping the wrapper removes the engine object.
    pub fn wrap(session: &PymolSession<E>, name: &str, delete: bool) -> BridgeResult<Self> {
        let mut object = PymolObject {
            name: name.to_string(),
            engine: session.engine(),
            atom_count: 0,
            delete_on_drop: delete,
        };
        object.check_existence()?;
        object.atom_count = object
            .engine
            .read()
            .count_atoms(&format!("model {name}"))?;
        Ok(object)
    }

    /// Load an atom array into the engine and wrap the new object
    ///
    /// A unique `ammolite_obj_<n>` name is generated when `name` is omitted.
    pub fn from_structure(
        session: &PymolSession<E>,
        atoms: &AtomArray,
        name: Option<&str>,
        delete: bool,
    ) -> BridgeResult<Self> {
        let model = convert_to_model(atoms)?;
        let name = name.map(str::to_string).unwrap_or_else(generated_name);
        session.engine().write().load_model(model, &name)?;
        Self::wrap(session, &name, delete)
    }

    /// Load an atom array stack into the engine and wrap the new object
    ///
    /// Frame 0 defines atoms and bonds; every following frame is appended
    /// as an additional coordinate state.
    pub fn from_stack(
        session: &PymolSession<E>,
        stack: &AtomArrayStack,
        name: Option<&str>,
        delete: bool,
    ) -> BridgeResult<Self> {
        let model = convert_to_model(stack.template())?;
        let name = name.map(str::to_string).unwrap_or_else(generated_name);
        {
            let engine = session.engine();
            let mut engine = engine.write();
            engine.load_model(model, &name)?;
            for state in 1..stack.depth() {
                let coords = stack
                    .frame_coords(state)?
                    .iter()
                    .map(|v| [v.x, v.y, v.z])
                    .collect();
                engine.load_coordset(coords, &name)?;
            }
        }
        Self::wrap(session, &name, delete)
    }

    /// The engine object's name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The atom count captured at wrap time
    pub fn atom_count(&self) -> usize {
        self.atom_count
    }

    /// Control whether dropping the wrapper deletes the engine object
    pub fn set_owning(&mut self, owning: bool) {
        self.delete_on_drop = owning;
    }

    /// Check whether the engine object still exists
    pub fn exists(&self) -> bool {
        self.engine
            .read()
            .object_names()
            .iter()
            .any(|n| n == &self.name)
    }

    fn check_existence(&self) -> BridgeResult<()> {
        if !self.exists() {
            return Err(BridgeError::NonexistentObject(self.name.clone()));
        }
        Ok(())
    }

    /// Fail if the engine object is gone or its atom count diverged
    fn revalidate(&self) -> BridgeResult<()> {
        self.check_existence()?;
        let live = self
            .engine
            .read()
            .count_atoms(&format!("model {}", self.name))?;
        if live != self.atom_count {
            return Err(BridgeError::ModifiedObject {
                name: self.name.clone(),
                expected: self.atom_count,
                actual: live,
            });
        }
        Ok(())
    }

    /// Convert a boolean mask into a selection expression for this object
    ///
    /// The mask must have exactly the captured atom count.
    pub fn where_mask(&self, mask: &Mask) -> BridgeResult<String> {
        self.selection(Some(&SelectionSpec::from(mask)))
    }

    /// Compile a mask or raw sub-expression scoped to this object
    ///
    /// A missing spec selects the whole object.
    pub fn selection(&self, spec: Option<&SelectionSpec>) -> BridgeResult<String> {
        self.revalidate()?;
        compile(&self.name, spec, self.atom_count).map_err(Into::into)
    }

    /// Convert one state of this object into an atom array
    pub fn to_array(&self, state: usize, options: &ConvertOptions) -> BridgeResult<AtomArray> {
        self.revalidate()?;
        let model = self.engine.read().get_model(&self.name, state)?;
        convert_to_atom_array(&model, options)
    }

    /// Convert all states of this object into an atom array stack
    ///
    /// State 1 provides the shared template; every state's coordinates are
    /// read against it and must have the template's atom count.
    pub fn to_stack(&self, options: &ConvertOptions) -> BridgeResult<AtomArrayStack> {
        self.revalidate()?;

        let (template, frames) = {
            let engine = self.engine.read();
            let model = engine.get_model(&self.name, 1)?;
            let template = model_to_full_array(&model, options.include_bonds)?;
            let n = template.array_length();

            let states = engine.count_states(&self.name)?;
            let mut frames: Vec<Vec<Vec3>> = Vec::with_capacity(states);
            for state in 1..=states {
                let coords = engine.get_coordset(&self.name, state)?;
                if coords.len() != n {
                    return Err(BridgeError::InconsistentStates {
                        expected: n,
                        actual: coords.len(),
                    });
                }
                frames.push(
                    coords
                        .iter()
                        .map(|c| Vec3::new(c[0], c[1], c[2]))
                        .collect(),
                );
            }
            (template, frames)
        };

        let (mut template, frames) = if options.altloc == AltlocPolicy::All {
            (template, frames)
        } else {
            let keep = altloc_keep(&template, options.altloc);
            let template = template.filtered(&keep)?;
            let frames = frames
                .into_iter()
                .map(|frame| {
                    frame
                        .into_iter()
                        .zip(&keep)
                        .filter(|(_, &kept)| kept)
                        .map(|(coord, _)| coord)
                        .collect()
                })
                .collect();
            (template, frames)
        };
        apply_field_selection(&mut template, options);

        AtomArrayStack::from_template(template, frames).map_err(Into::into)
    }

    /// Apply a wrapper command to a selection of this object
    ///
    /// The uniform dispatch for every supported command kind: the value is
    /// validated against the command's closed value table, the selection is
    /// compiled, and the resulting record is handed to the engine in one
    /// call. Validation failures are raised before any engine mutation.
    pub fn apply(
        &self,
        kind: CommandKind,
        value: Option<&str>,
        selection: Option<SelectionSpec>,
        state: Option<usize>,
    ) -> BridgeResult<()> {
        self.revalidate()?;
        let value = validate_value(kind, value)?;
        let selection = compile(&self.name, selection.as_ref(), self.atom_count)?;
        let spec = CommandSpec {
            kind,
            value,
            selection,
            state,
        };
        self.engine.write().execute(&spec).map_err(Into::into)
    }
}

impl<E: EngineLike> Drop for PymolObject<E> {
    fn drop(&mut self) {
        if self.delete_on_drop {
            if let Err(err) = self.engine.write().delete_object(&self.name) {
                log::debug!("could not delete object '{}': {err}", self.name);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::HeadlessEngine;
    use crate::testing::SESSION_GUARD;
    use lin_alg::f32::Vec3;

    fn small_array(n: usize) -> AtomArray {
        AtomArray {
            chain_id: vec!["A".into(); n],
            res_id: (0..n as i32).map(|i| i + 1).collect(),
            ins_code: vec![' '; n],
            res_name: vec!["GLY".into(); n],
            atom_name: vec!["CA".into(); n],
            element: vec!["C".into(); n],
            hetero: vec![false; n],
            coord: (0..n).map(|i| Vec3::new(i as f32, 0.0, 0.0)).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_generated_names_are_unique() {
        let a = generated_name();
        let b = generated_name();
        assert_ne!(a, b);
        assert!(a.starts_with("ammolite_obj_"));
    }

    #[test]
    fn test_wrap_captures_count() {
        let _guard = SESSION_GUARD.lock();
        let session = PymolSession::launch(HeadlessEngine::new()).unwrap();
        let object =
            PymolObject::from_structure(&session, &small_array(4), Some("obj"), true).unwrap();

        assert_eq!(object.name(), "obj");
        assert_eq!(object.atom_count(), 4);
        assert!(object.exists());
    }

    #[test]
    fn test_wrap_nonexistent_fails() {
        let _guard = SESSION_GUARD.lock();
        let session = PymolSession::launch(HeadlessEngine::new()).unwrap();
        assert!(matches!(
            PymolObject::wrap(&session, "ghost", false),
            Err(BridgeError::NonexistentObject(_))
        ));
    }

    #[test]
    fn test_drop_deletes_owned_object() {
        let _guard = SESSION_GUARD.lock();
        let session = PymolSession::launch(HeadlessEngine::new()).unwrap();
        {
            let _object =
                PymolObject::from_structure(&session, &small_array(2), Some("owned"), true)
                    .unwrap();
        }
        assert!(session.engine().read().object_names().is_empty());
    }

    #[test]
    fn test_drop_keeps_non_owning_object() {
        let _guard = SESSION_GUARD.lock();
        let session = PymolSession::launch(HeadlessEngine::new()).unwrap();
        {
            let _object =
                PymolObject::from_structure(&session, &small_array(2), Some("kept"), false)
                    .unwrap();
        }
        assert_eq!(session.engine().read().object_names(), ["kept"]);
    }

    #[test]
    fn test_mask_length_mismatch() {
        let _guard = SESSION_GUARD.lock();
        let session = PymolSession::launch(HeadlessEngine::new()).unwrap();
        let object =
            PymolObject::from_structure(&session, &small_array(5), None, true).unwrap();

        let result = object.where_mask(&Mask::all(3));
        assert!(matches!(
            result,
            Err(BridgeError::Select(
                ammolite_select::SelectError::LengthMismatch {
                    expected: 5,
                    actual: 3,
                }
            ))
        ));
    }

    #[test]
    fn test_apply_validates_before_dispatch() {
        let _guard = SESSION_GUARD.lock();
        let session = PymolSession::launch(HeadlessEngine::new()).unwrap();
        let object =
            PymolObject::from_structure(&session, &small_array(3), None, true).unwrap();

        assert!(matches!(
            object.apply(CommandKind::Color, Some("ultraviolet"), None, None),
            Err(BridgeError::InvalidColor(_))
        ));
        // Nothing was dispatched
        assert!(session.engine().read().history().is_empty());
    }
}
